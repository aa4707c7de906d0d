//! 价格提醒表单与列表

use leptos::prelude::*;
use pricedrop_shared::PriceAlert;

use crate::components::icons::{Bell, Trash2};
use crate::format::{format_date_time, format_price};
use crate::web;

/// 新建提醒：只收一个目标价
#[component]
pub fn AlertForm(#[prop(into)] on_submit: Callback<f64>) -> impl IntoView {
    let (target_price, set_target_price) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match target_price.get().trim().parse::<f64>() {
            Ok(price) if price > 0.0 => {
                set_error_msg.set(None);
                set_target_price.set(String::new());
                on_submit.run(price);
            }
            _ => {
                set_error_msg.set(Some("请输入有效的目标价".to_string()));
            }
        }
    };

    view! {
        <form class="flex flex-col gap-2" on:submit=handle_submit>
            <div class="join w-full">
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="目标价"
                    class="input input-bordered join-item w-full"
                    prop:value=target_price
                    on:input=move |ev| set_target_price.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary join-item gap-2">
                    <Bell attr:class="h-4 w-4" /> "添加提醒"
                </button>
            </div>
            <Show when=move || error_msg.get().is_some()>
                <p class="text-error text-sm">{move || error_msg.get().unwrap()}</p>
            </Show>
        </form>
    }
}

#[component]
pub fn AlertList(
    #[prop(into)] alerts: Signal<Vec<PriceAlert>>,
    currency: Option<String>,
    #[prop(into)] on_delete: Callback<i64>,
    #[prop(into)] on_toggle: Callback<(i64, bool)>,
) -> impl IntoView {
    view! {
        <Show
            when=move || !alerts.with(|a| a.is_empty())
            fallback=|| view! {
                <p class="text-base-content/50 text-sm py-4">"还没有价格提醒。"</p>
            }
        >
            <ul class="divide-y divide-base-200">
                <For
                    each=move || alerts.get()
                    key=|alert| (alert.id, alert.is_active, alert.triggered_at)
                    children={
                        let currency = currency.clone();
                        move |alert| {
                            let id = alert.id;
                            let is_active = alert.is_active;
                            let is_triggered = alert.is_triggered();
                            let badge = if is_triggered {
                                view! { <span class="badge badge-success badge-sm">"已触发"</span> }
                            } else if is_active {
                                view! { <span class="badge badge-info badge-sm">"活跃"</span> }
                            } else {
                                view! { <span class="badge badge-ghost badge-sm">"已停用"</span> }
                            };
                            let sub_label = match alert.triggered_at {
                                Some(at) => format!("触发于 {}", format_date_time(Some(at))),
                                None => {
                                    format!("创建于 {}", format_date_time(Some(alert.created_at)))
                                }
                            };
                            let target_label =
                                format_price(Some(alert.target_price), currency.as_deref());

                            view! {
                                <li class="flex items-center justify-between py-3 gap-2">
                                    <div class="flex flex-col">
                                        <span class="font-mono font-semibold">{target_label}</span>
                                        <span class="text-xs text-base-content/50">{sub_label}</span>
                                    </div>
                                    <div class="flex items-center gap-2">
                                        {badge}
                                        // 已触发的提醒是终态，不再提供启停
                                        <Show when=move || !is_triggered>
                                            <button
                                                class="btn btn-ghost btn-xs"
                                                on:click=move |_| on_toggle.run((id, !is_active))
                                            >
                                                {if is_active { "停用" } else { "启用" }}
                                            </button>
                                        </Show>
                                        <button
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| {
                                                if web::confirm("确定删除这条价格提醒吗？") {
                                                    on_delete.run(id);
                                                }
                                            }
                                        >
                                            <Trash2 attr:class="h-4 w-4" />
                                        </button>
                                    </div>
                                </li>
                            }
                        }
                    }
                />
            </ul>
        </Show>
    }
}
