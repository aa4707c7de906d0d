//! 登录页
//!
//! 登录本身由后端托管的 Google OAuth 完成，这里只提供入口链接；
//! 已登录用户访问本页会被直接送回仪表盘。

use leptos::prelude::*;

use crate::api;
use crate::components::icons::Tag;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = session.state;

    // 已认证则重定向（hydrate 完成后才会触发）
    Effect::new(move |_| {
        let snapshot = state.get();
        if !snapshot.is_loading && snapshot.token.is_some() {
            router.replace(AppRoute::auth_success_redirect());
        }
    });

    let is_loading = move || state.get().is_loading;

    view! {
        <Show
            when=move || !is_loading()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <div class="flex flex-col items-center gap-2">
                            <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                <Tag attr:class="h-8 w-8" />
                            </div>
                            <h1 class="text-3xl font-bold">"PriceDrop"</h1>
                            <p class="text-base-content/70">"追踪商品价格，降价即时提醒"</p>
                        </div>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <div class="card-body items-center gap-4">
                            <ul class="text-sm text-base-content/70 space-y-2 self-start">
                                <li>"· 粘贴商品链接即可开始追踪"</li>
                                <li>"· 价格历史一目了然"</li>
                                <li>"· 自定义目标价提醒"</li>
                                <li>"· 降价时邮件通知"</li>
                            </ul>
                            // 整页跳转到后端 OAuth 入口，不走 fetch
                            <a class="btn btn-primary w-full" href=api::login_url()>
                                "使用 Google 登录"
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        </Show>
    }
}
