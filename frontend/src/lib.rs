//! PriceDrop 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理（token 持久化与恢复）
//! - `guard`: 受保护视图的路由守卫
//! - `api`: 后端资源网关
//! - `components`: UI 组件层

mod api;
mod components {
    mod add_product_dialog;
    mod alerts;
    pub mod callback;
    mod chart;
    pub mod dashboard;
    mod icons;
    mod layout;
    pub mod login;
    mod product_card;
    pub mod product_detail;
}
mod format;
mod guard;
mod session;

// 原生 Web API 封装模块
pub(crate) mod web;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::callback::CallbackPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::product_detail::ProductDetailPage;
use crate::guard::RequireAuth;
use crate::session::SessionContext;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Callback { token } => view! { <CallbackPage token=token /> }.into_any(),
        AppRoute::Dashboard => view! {
            <RequireAuth>
                <DashboardPage />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::ProductDetail(id) => view! {
            <RequireAuth>
                <ProductDetailPage id=id />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let session = SessionContext::new();
    provide_context(session.clone());

    // 2. 恢复会话（从 LocalStorage 读 token 并校验）
    spawn_local({
        let session = session.clone();
        async move {
            session.hydrate().await;
        }
    });

    // 3. 取出会话信号，注入路由服务（解耦！）
    let is_loading = session.is_loading_signal();
    let has_token = session.has_token_signal();

    view! {
        // 4. 路由器组件：注入会话信号实现守卫
        <Router is_loading=is_loading has_token=has_token>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
