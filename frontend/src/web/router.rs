//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。
//!
//! 守卫是感知会话加载态的：会话恢复（hydrate）尚未结束时不做任何
//! 重定向，避免刷新受保护页面时闪现登录页。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径（含查询串，回调页需要）
fn current_path() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话状态信号实现与会话系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话是否还在恢复中（注入的信号）
    is_loading: Signal<bool>,
    /// 是否持有会话 token（注入的信号）
    has_token: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `is_loading` / `has_token` - 会话状态信号，由外部注入实现解耦
    fn new(is_loading: Signal<bool>, has_token: Signal<bool>) -> Self {
        // 初始化当前路由（从 URL 解析）
        let initial_route = AppRoute::from_url(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_loading,
            has_token,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 以替换方式导航（重定向，不产生历史记录）
    pub fn replace(&self, route: AppRoute) {
        self.navigate_to_route(route, false);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let is_loading = self.is_loading.get_untracked();
        let has_token = self.has_token.get_untracked();

        // --- Step 1: 验证目标路由 ---
        // 会话恢复完成后，目标需要认证但没有 token
        if target_route.requires_auth() && !is_loading && !has_token {
            web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
            self.apply(AppRoute::auth_failure_redirect(), use_push);
            return;
        }

        // 已认证用户访问登录页，重定向到面板
        if target_route.should_redirect_when_authenticated() && !is_loading && has_token {
            web_sys::console::log_1(
                &"[Router] Already authenticated. Redirecting to dashboard.".into(),
            );
            self.apply(AppRoute::auth_success_redirect(), use_push);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        self.apply(target_route, use_push);
    }

    fn apply(&self, route: AppRoute, use_push: bool) {
        let path = route.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_loading = self.is_loading;
        let has_token = self.has_token;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_url(&current_path());

            // popstate 时也执行守卫逻辑
            if target_route.requires_auth()
                && !is_loading.get_untracked()
                && !has_token.get_untracked()
            {
                let redirect = AppRoute::auth_failure_redirect();
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
            } else {
                set_route.set(target_route);
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置会话状态变化时的自动重定向
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_loading = self.is_loading;
        let has_token = self.has_token;

        // 使用 Effect 监听会话状态变化
        Effect::new(move |_| {
            let loading = is_loading.get();
            let authed = has_token.get();

            // hydrate 未结束前不做判断
            if loading {
                return;
            }

            let route = current_route.get_untracked();

            if authed {
                // 用户刚登录，如果在登录页则重定向到面板
                if route.should_redirect_when_authenticated() {
                    let redirect = AppRoute::auth_success_redirect();
                    push_history_state(&redirect.to_path());
                    set_route.set(redirect);
                    web_sys::console::log_1(
                        &"[Router] Session changed: logged in, redirecting to dashboard.".into(),
                    );
                }
            } else if route.requires_auth() {
                // 用户登出（或 token 被拒），离开受保护页面
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
                web_sys::console::log_1(
                    &"[Router] Session changed: logged out, redirecting to login.".into(),
                );
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_loading: Signal<bool>, has_token: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_loading, has_token);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话恢复中信号
    is_loading: Signal<bool>,
    /// 会话 token 存在信号
    has_token: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(is_loading, has_token);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
