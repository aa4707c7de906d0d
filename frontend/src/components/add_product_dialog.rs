//! 添加商品对话框
//!
//! 常规路径只需要 URL + 目标价；当后端抓不到价格时会返回带
//! `manual_price` 字样的 400，此时展开手动录入区让用户补全后重试。

use leptos::prelude::*;
use leptos::task::spawn_local;
use pricedrop_shared::{CreateProductRequest, MIN_CHECK_INTERVAL_MINUTES};

use crate::components::icons::{Plus, X};
use crate::session::use_session;

#[component]
pub fn AddProductDialog(#[prop(into)] on_added: Callback<()>) -> impl IntoView {
    let session = use_session();

    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 表单字段
    let (url, set_url) = signal(String::new());
    let (target_price, set_target_price) = signal(String::new());
    let (check_interval, set_check_interval) = signal("60".to_string());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 手动录入回退区
    let (show_manual, set_show_manual) = signal(false);
    let (manual_price, set_manual_price) = signal(String::new());
    let (manual_name, set_manual_name) = signal(String::new());
    let (manual_currency, set_manual_currency) = signal("USD".to_string());

    let reset_form = move || {
        set_url.set(String::new());
        set_target_price.set(String::new());
        set_check_interval.set("60".to_string());
        set_error_msg.set(None);
        set_show_manual.set(false);
        set_manual_price.set(String::new());
        set_manual_name.set(String::new());
        set_manual_currency.set("USD".to_string());
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let url_value = url.get().trim().to_string();
        if url_value.is_empty() {
            set_error_msg.set(Some("请输入商品链接".to_string()));
            return;
        }
        let Ok(price) = target_price.get().trim().parse::<f64>() else {
            set_error_msg.set(Some("请输入有效的目标价".to_string()));
            return;
        };
        let interval = match check_interval.get().trim().parse::<u32>() {
            Ok(v) if v >= MIN_CHECK_INTERVAL_MINUTES => v,
            _ => {
                set_error_msg.set(Some(format!(
                    "抓取间隔最少 {} 分钟",
                    MIN_CHECK_INTERVAL_MINUTES
                )));
                return;
            }
        };

        let mut req = CreateProductRequest::new(url_value, price);
        req.check_interval_minutes = interval;

        if show_manual.get() {
            let Ok(m_price) = manual_price.get().trim().parse::<f64>() else {
                set_error_msg.set(Some("请输入有效的商品价格".to_string()));
                return;
            };
            let m_name = manual_name.get().trim().to_string();
            if m_name.is_empty() {
                set_error_msg.set(Some("请输入商品名称".to_string()));
                return;
            }
            req = req.with_manual_entry(m_price, m_name, manual_currency.get());
        }

        set_loading.set(true);
        set_error_msg.set(None);

        let api = session.gateway();
        spawn_local(async move {
            match api.create_product(req).await {
                Ok(_) => {
                    reset_form();
                    set_open.set(false);
                    on_added.run(());
                }
                Err(e) => {
                    let msg = e.to_string();
                    // 后端抓取失败时提示手动补全
                    if msg.contains("manual_price") {
                        set_show_manual.set(true);
                        set_error_msg.set(Some(
                            "无法自动获取价格，请手动填写商品信息。".to_string(),
                        ));
                    } else {
                        set_error_msg.set(Some(format!("添加商品失败: {}", msg)));
                    }
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <button class="btn btn-primary gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" /> "添加商品"
        </button>

        <dialog node_ref=dialog_ref class="modal">
            <div class="modal-box max-w-lg">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-lg">"添加追踪商品"</h3>
                    <button
                        class="btn btn-ghost btn-sm btn-circle"
                        on:click=move |_| {
                            reset_form();
                            set_open.set(false);
                        }
                    >
                        <X attr:class="h-4 w-4" />
                    </button>
                </div>

                <form class="space-y-3" on:submit=on_submit>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap()}</span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label" for="product-url">
                            <span class="label-text">"商品链接"</span>
                        </label>
                        <input
                            id="product-url"
                            type="url"
                            placeholder="https://www.example.com/item/..."
                            class="input input-bordered w-full"
                            prop:value=url
                            on:input=move |ev| set_url.set(event_target_value(&ev))
                            required
                        />
                    </div>

                    <div class="grid grid-cols-2 gap-3">
                        <div class="form-control">
                            <label class="label" for="target-price">
                                <span class="label-text">"目标价"</span>
                            </label>
                            <input
                                id="target-price"
                                type="number"
                                step="0.01"
                                min="0"
                                class="input input-bordered w-full"
                                prop:value=target_price
                                on:input=move |ev| set_target_price.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="check-interval">
                                <span class="label-text">"抓取间隔（分钟）"</span>
                            </label>
                            <input
                                id="check-interval"
                                type="number"
                                min=MIN_CHECK_INTERVAL_MINUTES
                                class="input input-bordered w-full"
                                prop:value=check_interval
                                on:input=move |ev| set_check_interval.set(event_target_value(&ev))
                            />
                        </div>
                    </div>

                    <Show when=move || show_manual.get()>
                        <div class="rounded-box bg-base-200 p-3 space-y-3">
                            <p class="text-sm text-base-content/70">"手动录入商品信息"</p>
                            <div class="form-control">
                                <label class="label" for="manual-name">
                                    <span class="label-text">"商品名称"</span>
                                </label>
                                <input
                                    id="manual-name"
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=manual_name
                                    on:input=move |ev| set_manual_name.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="grid grid-cols-2 gap-3">
                                <div class="form-control">
                                    <label class="label" for="manual-price">
                                        <span class="label-text">"当前价格"</span>
                                    </label>
                                    <input
                                        id="manual-price"
                                        type="number"
                                        step="0.01"
                                        min="0"
                                        class="input input-bordered w-full"
                                        prop:value=manual_price
                                        on:input=move |ev| {
                                            set_manual_price.set(event_target_value(&ev))
                                        }
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="manual-currency">
                                        <span class="label-text">"货币"</span>
                                    </label>
                                    <select
                                        id="manual-currency"
                                        class="select select-bordered w-full"
                                        prop:value=manual_currency
                                        on:change=move |ev| {
                                            set_manual_currency.set(event_target_value(&ev))
                                        }
                                    >
                                        <option value="USD">"USD"</option>
                                        <option value="EUR">"EUR"</option>
                                        <option value="GBP">"GBP"</option>
                                        <option value="JPY">"JPY"</option>
                                        <option value="INR">"INR"</option>
                                    </select>
                                </div>
                            </div>
                        </div>
                    </Show>

                    <div class="modal-action">
                        <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                            <Show when=move || loading.get()>
                                <span class="loading loading-spinner loading-sm"></span>
                            </Show>
                            "开始追踪"
                        </button>
                    </div>
                </form>
            </div>
        </dialog>
    }
}
