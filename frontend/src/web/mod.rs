//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
//! 以减小 WASM 二进制体积。

pub mod http;
pub mod route;
pub mod router;
pub mod storage;

/// 弹出浏览器原生确认框
///
/// 非浏览器环境（或用户取消）一律按 `false` 处理。
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
