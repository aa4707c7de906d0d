//! 商品详情页：价格走势 + 提醒管理

use leptos::prelude::*;
use leptos::task::spawn_local;
use pricedrop_shared::{
    CreateAlertRequest, HistoryQuery, PriceAlert, PricePoint, Product, UpdateAlertRequest,
    UpdateProductRequest,
};

use crate::components::alerts::{AlertForm, AlertList};
use crate::components::chart::PriceHistoryChart;
use crate::components::icons::{ArrowLeft, ExternalLink, Pause, Play};
use crate::components::layout::PageShell;
use crate::format::{format_date_time, format_price};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn ProductDetailPage(id: i64) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (product, set_product) = signal(Option::<Product>::None);
    let (alerts, set_alerts) = signal(Vec::<PriceAlert>::new());
    let (history, set_history) = signal(Vec::<PricePoint>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 三个视图数据并发拉取，整体提交：部分成功的结果不单独上屏，
    // 避免出现"有图没提醒"的半截状态
    let load_all = {
        let session = session.clone();
        move || {
            let api = session.gateway();
            set_loading.set(true);
            spawn_local(async move {
                let results = futures::join!(
                    api.get_product(id),
                    api.get_alerts(id),
                    api.get_price_history(id, HistoryQuery::default()),
                );

                match results {
                    (Ok(p), Ok(a), Ok(h)) => {
                        set_product.set(Some(p));
                        set_alerts.set(a);
                        set_history.set(h);
                    }
                    (product_res, alerts_res, history_res) => {
                        let msg = product_res
                            .err()
                            .or(alerts_res.err())
                            .or(history_res.err())
                            .map(|e| e.to_string())
                            .unwrap_or_default();
                        set_notification
                            .set(Some((format!("加载商品详情失败: {}", msg), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    Effect::new({
        let load_all = load_all.clone();
        move |_| {
            load_all();
        }
    });

    let handle_add_alert = Callback::new({
        let session = session.clone();
        let load_all = load_all.clone();
        move |target_price: f64| {
            let api = session.gateway();
            let load_all = load_all.clone();
            spawn_local(async move {
                match api
                    .create_alert(id, CreateAlertRequest { target_price })
                    .await
                {
                    Ok(_) => {
                        set_notification.set(Some(("提醒已创建".to_string(), false)));
                        // 提醒数量会影响商品卡片与目标线，整页重新拉取
                        load_all();
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("创建提醒失败: {}", e), true)));
                    }
                }
            });
        }
    });

    let handle_delete_alert = Callback::new({
        let session = session.clone();
        move |alert_id: i64| {
            let api = session.gateway();
            spawn_local(async move {
                match api.delete_alert(alert_id).await {
                    Ok(()) => {
                        set_alerts.update(|list| list.retain(|a| a.id != alert_id));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("删除提醒失败: {}", e), true)));
                    }
                }
            });
        }
    });

    let handle_toggle_alert = Callback::new({
        let session = session.clone();
        move |(alert_id, is_active): (i64, bool)| {
            let api = session.gateway();
            spawn_local(async move {
                match api
                    .update_alert(alert_id, UpdateAlertRequest::set_active(is_active))
                    .await
                {
                    Ok(updated) => {
                        set_alerts.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|a| a.id == alert_id) {
                                *slot = updated;
                            }
                        });
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("更新提醒失败: {}", e), true)));
                    }
                }
            });
        }
    });

    let handle_toggle_product = {
        let session = session.clone();
        move |is_active: bool| {
            let api = session.gateway();
            spawn_local(async move {
                match api
                    .update_product(id, UpdateProductRequest::set_active(is_active))
                    .await
                {
                    Ok(updated) => set_product.set(Some(updated)),
                    Err(e) => {
                        set_notification.set(Some((format!("更新商品失败: {}", e), true)));
                    }
                }
            });
        }
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let currency = move || product.get().and_then(|p| p.currency);

    view! {
        <PageShell>
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let (_, is_err) = notification.get().unwrap();
                        if is_err {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().unwrap().0}</span>
                    </div>
                </div>
            </Show>

            <button
                class="btn btn-ghost btn-sm gap-2 w-fit"
                on:click=move |_| router.navigate(AppRoute::Dashboard)
            >
                <ArrowLeft attr:class="h-4 w-4" /> "返回仪表盘"
            </button>

            <Show when=move || loading.get() && product.get().is_none()>
                <div class="flex justify-center py-16">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>

            <Show when=move || product.get().is_some()>
                {
                    let handle_toggle_product = handle_toggle_product.clone();
                    move || {
                        let p = product.get().unwrap();
                        let is_active = p.is_active;
                        let handle_toggle_product = handle_toggle_product.clone();
                        view! {
                            <div class="card bg-base-100 shadow-md">
                                <div class="card-body gap-3">
                                    <div class="flex items-start justify-between gap-4">
                                        <div class="space-y-1">
                                            <h2 class="text-xl font-bold">
                                                {p.name.clone().unwrap_or_else(|| "未命名商品".to_string())}
                                            </h2>
                                            <a
                                                href=p.url.clone()
                                                target="_blank"
                                                rel="noopener noreferrer"
                                                class="link link-primary text-sm inline-flex items-center gap-1"
                                            >
                                                "前往商品页" <ExternalLink attr:class="h-3 w-3" />
                                            </a>
                                        </div>
                                        <button
                                            class="btn btn-outline btn-sm gap-2"
                                            on:click=move |_| handle_toggle_product(!is_active)
                                        >
                                            {if is_active {
                                                view! { <Pause attr:class="h-4 w-4" /> "暂停追踪" }
                                                    .into_any()
                                            } else {
                                                view! { <Play attr:class="h-4 w-4" /> "恢复追踪" }
                                                    .into_any()
                                            }}
                                        </button>
                                    </div>

                                    <div class="flex items-baseline gap-4">
                                        <span class="text-3xl font-bold text-primary font-mono">
                                            {format_price(p.current_price, p.currency.as_deref())}
                                        </span>
                                        <span class="text-xs text-base-content/50">
                                            "上次抓取 " {format_date_time(p.last_checked_at)}
                                        </span>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                }
            </Show>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
                <div class="card bg-base-100 shadow-md lg:col-span-2">
                    <div class="card-body">
                        <h3 class="card-title text-base">"价格走势"</h3>
                        {move || {
                            view! {
                                <PriceHistoryChart
                                    history=history.get()
                                    alerts=alerts.get()
                                    currency=currency()
                                />
                            }
                        }}
                    </div>
                </div>

                <div class="card bg-base-100 shadow-md">
                    <div class="card-body gap-4">
                        <h3 class="card-title text-base">"价格提醒"</h3>
                        <AlertForm on_submit=handle_add_alert />
                        {move || {
                            view! {
                                <AlertList
                                    alerts=alerts
                                    currency=currency()
                                    on_delete=handle_delete_alert
                                    on_toggle=handle_toggle_alert
                                />
                            }
                        }}
                    </div>
                </div>
            </div>
        </PageShell>
    }
}
