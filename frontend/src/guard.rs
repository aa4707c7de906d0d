//! 路由守卫
//!
//! 包裹任意受保护视图的通用组件。会话恢复期间渲染中性加载态
//! （避免 hydrate 时闪现登录页），未认证时重定向到登录页
//! （不保留原始目标地址），持有 token 时放行。

use leptos::prelude::*;

use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 守卫对会话状态的三种裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// 会话还在恢复中：渲染加载态，暂不渲染受保护内容
    Loading,
    /// 恢复已结束且没有 token：重定向到登录页
    RedirectToLogin,
    /// 持有 token：渲染被包裹的视图
    Allow,
}

impl GuardOutcome {
    /// **核心守卫逻辑**：由会话状态直接推导
    pub fn evaluate(is_loading: bool, has_token: bool) -> Self {
        if is_loading {
            Self::Loading
        } else if has_token {
            Self::Allow
        } else {
            Self::RedirectToLogin
        }
    }
}

/// 受保护视图的包装组件
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = session.state;

    // 重定向放在 Effect 里，渲染闭包只负责画
    Effect::new(move |_| {
        let snapshot = state.get();
        if GuardOutcome::evaluate(snapshot.is_loading, snapshot.token.is_some())
            == GuardOutcome::RedirectToLogin
        {
            router.replace(AppRoute::auth_failure_redirect());
        }
    });

    move || {
        let snapshot = state.get();
        match GuardOutcome::evaluate(snapshot.is_loading, snapshot.token.is_some()) {
            GuardOutcome::Allow => children().into_any(),
            // 重定向生效前同样只给加载态
            GuardOutcome::Loading | GuardOutcome::RedirectToLogin => view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
        }
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_state_blocks_content() {
        // 恢复期间既不放行也不重定向
        assert_eq!(GuardOutcome::evaluate(true, false), GuardOutcome::Loading);
        assert_eq!(GuardOutcome::evaluate(true, true), GuardOutcome::Loading);
    }

    #[test]
    fn test_missing_token_redirects_to_login() {
        assert_eq!(
            GuardOutcome::evaluate(false, false),
            GuardOutcome::RedirectToLogin
        );
    }

    #[test]
    fn test_token_allows_protected_content() {
        assert_eq!(GuardOutcome::evaluate(false, true), GuardOutcome::Allow);
    }
}
