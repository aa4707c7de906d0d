//! 仪表盘上的商品卡片

use leptos::prelude::*;
use pricedrop_shared::Product;

use crate::components::icons::{Bell, ChartColumn, Pause, Play, Trash2};
use crate::format::{format_date_time, format_price, truncate_text};
use crate::web;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn ProductCard(
    product: Product,
    #[prop(into)] on_delete: Callback<i64>,
    #[prop(into)] on_toggle: Callback<(i64, bool)>,
) -> impl IntoView {
    let router = use_router();

    let id = product.id;
    let is_active = product.is_active;
    let name = truncate_text(product.name.as_deref().unwrap_or("未命名商品"), 60);
    let price = format_price(product.current_price, product.currency.as_deref());
    let alert_count = product.alert_count.unwrap_or(0);
    let checked_label = format!(
        "上次抓取 {}",
        format_date_time(product.last_checked_at)
    );
    let interval_label = format!("每 {} 分钟", product.check_interval_minutes);
    let image_url = product.image_url.clone();
    let image_alt = name.clone();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <Show when={
                let image_url = image_url.clone();
                move || image_url.is_some()
            }>
                <figure class="h-40 bg-base-200">
                    <img
                        src=image_url.clone().unwrap_or_default()
                        alt=image_alt.clone()
                        class="object-contain h-full"
                    />
                </figure>
            </Show>
            <div class="card-body gap-3">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="card-title text-base leading-snug">{name.clone()}</h3>
                    {if is_active {
                        view! { <span class="badge badge-success badge-sm shrink-0">"追踪中"</span> }
                    } else {
                        view! { <span class="badge badge-ghost badge-sm shrink-0">"已暂停"</span> }
                    }}
                </div>

                <div class="text-2xl font-bold text-primary font-mono">{price}</div>

                <div class="flex items-center gap-4 text-xs text-base-content/50">
                    <span class="flex items-center gap-1">
                        <Bell attr:class="h-3 w-3" /> {alert_count} " 条提醒"
                    </span>
                    <span>{interval_label}</span>
                </div>
                <div class="text-xs text-base-content/50">{checked_label}</div>

                <div class="card-actions justify-end items-center pt-2 border-t border-base-200">
                    <button
                        class="btn btn-ghost btn-sm gap-1"
                        on:click=move |_| router.navigate(AppRoute::ProductDetail(id))
                    >
                        <ChartColumn attr:class="h-4 w-4" /> "详情"
                    </button>
                    <button
                        class="btn btn-ghost btn-sm"
                        title=if is_active { "暂停追踪" } else { "恢复追踪" }
                        on:click=move |_| on_toggle.run((id, !is_active))
                    >
                        {if is_active {
                            view! { <Pause attr:class="h-4 w-4" /> }.into_any()
                        } else {
                            view! { <Play attr:class="h-4 w-4" /> }.into_any()
                        }}
                    </button>
                    <button
                        class="btn btn-ghost btn-sm text-error"
                        on:click=move |_| {
                            if web::confirm("确定删除该商品及其全部提醒与历史吗？") {
                                on_delete.run(id);
                            }
                        }
                    >
                        <Trash2 attr:class="h-4 w-4" />
                    </button>
                </div>
            </div>
        </div>
    }
}
