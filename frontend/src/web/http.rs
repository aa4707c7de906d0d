//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 提供简洁的 HTTP 客户端接口。
//! 客户端只负责拼接地址、附加认证头和把失败转成带标签的错误类型；
//! 401 之后的重定向策略属于会话/路由层，不在这里处理。

use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 带标签的请求错误
///
/// 调用方通过模式匹配区分错误类别，而不是去试探可选字段。
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 传输层失败，没有收到任何响应
    Network(String),
    /// 收到了非 2xx 响应；`detail` 为后端附带的说明（如果有）
    Status { code: u16, detail: Option<String> },
    /// 请求体或响应体的 JSON 编解码失败
    Decode(String),
}

impl ApiError {
    /// 后端附带的 detail 说明（仅 `Status` 错误可能携带）
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "网络错误: {}", msg),
            ApiError::Status {
                code,
                detail: Some(detail),
            } => write!(f, "请求失败 (HTTP {}): {}", code, detail),
            ApiError::Status { code, detail: None } => write!(f, "请求失败 (HTTP {})", code),
            ApiError::Decode(msg) => write!(f, "数据解析失败: {}", msg),
        }
    }
}

/// 后端错误响应体的形状：`{"detail": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// 从错误响应体中提取 detail 说明
///
/// 响应体不是标准形状时退回原始文本，空响应体返回 `None`。
fn extract_detail(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json_wasm::from_str::<ErrorBody>(body) {
        return Some(parsed.detail);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 面向后端 API 的 HTTP 客户端
///
/// 持有基础地址与当前会话 token；token 存在时每个请求都会带上
/// `Authorization: Bearer` 头。客户端本身无状态，只读 token、从不写。
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求，返回响应体文本
    ///
    /// 非 2xx 响应统一转成 [`ApiError::Status`]，不做重试。
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let headers = Headers::new()
            .map_err(|e| ApiError::Network(format!("创建 Headers 失败: {:?}", e)))?;

        if let Some(token) = &self.token {
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(|e| ApiError::Network(format!("设置认证头失败: {:?}", e)))?;
        }
        if body.is_some() {
            headers
                .set("Content-Type", "application/json")
                .map_err(|e| ApiError::Network(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&self.url(path), &opts)
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Network(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let text = read_text(response).await?;

        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(ApiError::Status {
                code: status,
                detail: extract_detail(&text),
            })
        }
    }
}

/// 读取响应体文本
async fn read_text(response: Response) -> Result<String, ApiError> {
    let promise = response
        .text()
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    let text = JsFuture::from(promise)
        .await
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| ApiError::Decode("无法转换为字符串".to_string()))
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_path() {
        let client = ApiClient::new("https://api.example.com/", None);
        assert_eq!(client.url("/products"), "https://api.example.com/products");
        assert_eq!(client.url("products"), "https://api.example.com/products");
    }

    #[test]
    fn test_extract_detail_from_backend_body() {
        assert_eq!(
            extract_detail(r#"{"detail":"Could not fetch price, manual_price required"}"#),
            Some("Could not fetch price, manual_price required".to_string())
        );
        // 非标准形状时退回原始文本
        assert_eq!(
            extract_detail("Internal Server Error"),
            Some("Internal Server Error".to_string())
        );
        assert_eq!(extract_detail("   "), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn test_status_error_display_carries_detail() {
        // 界面靠这个 detail 串里的 "manual_price" 来触发手动录入表单
        let err = ApiError::Status {
            code: 400,
            detail: Some("Could not fetch price, manual_price required".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("manual_price"));

        let bare = ApiError::Status {
            code: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "请求失败 (HTTP 502)");
    }

    #[test]
    fn test_error_detail_accessor() {
        let err = ApiError::Status {
            code: 400,
            detail: Some("bad url".to_string()),
        };
        assert_eq!(err.detail(), Some("bad url"));
        assert_eq!(ApiError::Network("timeout".to_string()).detail(), None);
    }
}
