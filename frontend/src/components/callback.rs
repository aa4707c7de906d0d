//! OAuth 回调页
//!
//! 后端完成认证后重定向到 `/callback?token=...`。本页把 token
//! 交给会话层换取用户信息，然后进入仪表盘；任何失败都回登录页。

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::console;

use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn CallbackPage(token: Option<String>) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    spawn_local(async move {
        match token {
            // replace 而不是 navigate：回调页不应留在历史记录里
            None => router.replace(AppRoute::auth_failure_redirect()),
            Some(token) => match session.login(token).await {
                Ok(()) => router.replace(AppRoute::auth_success_redirect()),
                Err(e) => {
                    console::error_1(&format!("[Auth] Login failed: {}", e).into());
                    router.replace(AppRoute::auth_failure_redirect());
                }
            },
        }
    });

    view! {
        <div class="flex flex-col items-center justify-center min-h-screen bg-base-200 gap-4">
            <span class="loading loading-spinner loading-lg text-primary"></span>
            <p class="text-base-content/70">"正在完成登录..."</p>
        </div>
    }
}
