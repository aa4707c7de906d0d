//! LocalStorage 封装模块
//!
//! 整个应用只在本地持久化一样东西：会话 token。
//! 键不存在即视为未登录，登出或服务端拒绝时删除。

/// 会话 token 的持久化接口
///
/// 会话逻辑只依赖这个接口，具体实现通过注入替换，
/// 因此核心流程可以在非浏览器环境下测试。
pub trait TokenStore {
    /// 读取已持久化的 token；不存在或读取出错返回 `None`
    fn load(&self) -> Option<String>;

    /// 持久化 token，返回操作是否成功
    fn save(&self, token: &str) -> bool;

    /// 删除已持久化的 token，返回操作是否成功
    fn clear(&self) -> bool;
}

/// LocalStorage 中保存会话 token 的键
const STORAGE_TOKEN_KEY: &str = "pricedrop_token";

/// 基于浏览器 LocalStorage 的生产实现
pub struct BrowserTokenStore;

impl BrowserTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(STORAGE_TOKEN_KEY).ok()?
    }

    fn save(&self, token: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(STORAGE_TOKEN_KEY, token).ok())
            .is_some()
    }

    fn clear(&self) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(STORAGE_TOKEN_KEY).ok())
            .is_some()
    }
}
