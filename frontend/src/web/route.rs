//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// OAuth 回调页面，token 由后端通过查询参数带回
    Callback { token: Option<String> },
    /// 商品面板 (需要认证；也是根路径 `/` 的落点)
    #[default]
    Dashboard,
    /// 商品详情 (需要认证)
    ProductDetail(i64),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL（path 加可选查询串）解析为路由枚举
    pub fn from_url(url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        match path {
            "/" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/callback" => Self::Callback {
                token: query_param(query, "token"),
            },
            _ => match path.strip_prefix("/product/") {
                Some(id) => match id.parse::<i64>() {
                    Ok(id) => Self::ProductDetail(id),
                    Err(_) => Self::NotFound,
                },
                None => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Callback { .. } => "/callback".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::ProductDetail(id) => format!("/product/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::ProductDetail(_))
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 从查询串中取出指定参数；空值按缺失处理
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_lands_on_dashboard() {
        assert_eq!(AppRoute::from_url("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_url("/dashboard"), AppRoute::Dashboard);
    }

    #[test]
    fn test_known_paths() {
        assert_eq!(AppRoute::from_url("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_url("/product/42"), AppRoute::ProductDetail(42));
        assert_eq!(AppRoute::from_url("/product/abc"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_url("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn test_callback_token_extraction() {
        assert_eq!(
            AppRoute::from_url("/callback?token=abc123"),
            AppRoute::Callback {
                token: Some("abc123".to_string())
            }
        );
        // 多个参数时按名取值
        assert_eq!(
            AppRoute::from_url("/callback?state=x&token=t1"),
            AppRoute::Callback {
                token: Some("t1".to_string())
            }
        );
        // 缺失或为空都视为没有 token
        assert_eq!(
            AppRoute::from_url("/callback"),
            AppRoute::Callback { token: None }
        );
        assert_eq!(
            AppRoute::from_url("/callback?token="),
            AppRoute::Callback { token: None }
        );
    }

    #[test]
    fn test_protected_routes() {
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::ProductDetail(1).requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Callback { token: None }.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
    }

    #[test]
    fn test_redirect_targets() {
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
        assert_eq!(AppRoute::auth_success_redirect(), AppRoute::Dashboard);
    }

    #[test]
    fn test_to_path_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::ProductDetail(7),
        ] {
            assert_eq!(AppRoute::from_url(&route.to_path()), route);
        }
    }
}
