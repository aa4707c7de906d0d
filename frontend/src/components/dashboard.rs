//! 仪表盘：商品列表与入口操作

use leptos::prelude::*;
use leptos::task::spawn_local;
use pricedrop_shared::{Product, UpdateProductRequest};

use crate::components::add_product_dialog::AddProductDialog;
use crate::components::icons::RefreshCw;
use crate::components::layout::PageShell;
use crate::components::product_card::ProductCard;
use crate::session::use_session;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();

    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading_products, set_loading_products) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load_products = {
        let session = session.clone();
        move || {
            let api = session.gateway();
            set_loading_products.set(true);
            spawn_local(async move {
                match api.get_products().await {
                    Ok(data) => set_products.set(data),
                    Err(e) => {
                        set_notification.set(Some((format!("加载商品失败: {}", e), true)));
                    }
                }
                set_loading_products.set(false);
            });
        }
    };

    // 初始加载（守卫保证进到这里时已认证）
    Effect::new({
        let load_products = load_products.clone();
        move |_| {
            load_products();
        }
    });

    let handle_added = Callback::new({
        let load_products = load_products.clone();
        move |_: ()| {
            set_notification.set(Some(("商品添加成功".to_string(), false)));
            // 创建后的完整状态（名称、价格、图片）以后端为准，重新拉取
            load_products();
        }
    });

    // Callback 是 Copy 的，可以安全地传进 For 的每一行
    let handle_delete = Callback::new({
        let session = session.clone();
        move |id: i64| {
            let api = session.gateway();
            spawn_local(async move {
                match api.delete_product(id).await {
                    Ok(()) => {
                        set_notification.set(Some(("商品已删除".to_string(), false)));
                        set_products.update(|list| list.retain(|p| p.id != id));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("删除商品失败: {}", e), true)));
                    }
                }
            });
        }
    });

    let handle_toggle = Callback::new({
        let session = session.clone();
        move |(id, is_active): (i64, bool)| {
            let api = session.gateway();
            spawn_local(async move {
                match api
                    .update_product(id, UpdateProductRequest::set_active(is_active))
                    .await
                {
                    Ok(updated) => {
                        set_products.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|p| p.id == id) {
                                *slot = updated;
                            }
                        });
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("更新商品失败: {}", e), true)));
                    }
                }
            });
        }
    });

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let total_products = move || products.with(|p| p.len());

    view! {
        <PageShell>
            // 通知提示框
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

            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"我的商品"</h2>
                    <p class="text-base-content/70 text-sm">
                        "正在追踪 " {total_products} " 件商品"
                    </p>
                </div>
                <div class="flex items-center gap-2">
                    <button
                        class="btn btn-ghost btn-circle"
                        disabled=move || loading_products.get()
                        on:click={
                            let load_products = load_products.clone();
                            move |_| load_products()
                        }
                    >
                        <RefreshCw attr:class=move || {
                            if loading_products.get() {
                                "h-5 w-5 animate-spin"
                            } else {
                                "h-5 w-5"
                            }
                        } />
                    </button>
                    <AddProductDialog on_added=handle_added />
                </div>
            </div>

            <Show when=move || loading_products.get() && total_products() == 0>
                <div class="flex justify-center py-16">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>

            <Show when=move || !loading_products.get() && total_products() == 0>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body items-center text-center py-16 text-base-content/50">
                        <p class="text-lg">"还没有追踪任何商品"</p>
                        <p class="text-sm">"粘贴一个商品链接开始追踪价格。"</p>
                    </div>
                </div>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                <For
                    each=move || products.get()
                    key=|p| (p.id, p.is_active, p.updated_at)
                    children=move |product| {
                        view! {
                            <ProductCard
                                product=product
                                on_delete=handle_delete
                                on_toggle=handle_toggle
                            />
                        }
                    }
                />
            </div>
        </PageShell>
    }
}
