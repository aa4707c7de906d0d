//! 后端资源网关
//!
//! 每个方法都是"HTTP 动词 + 路径 + 可选请求体"的直接映射，
//! 返回解码后的载荷或原样上抛 [`ApiError`]。
//! 不做重试、不做缓存、不做批量：每次调用就是一次往返，
//! 变更后的数据一致性由调用方重新拉取来保证。

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::web::http::{ApiClient, ApiError, HttpMethod};
use pricedrop_shared::{
    API_BASE_URL, CreateAlertRequest, CreateProductRequest, HistoryQuery, PriceAlert, PricePoint,
    Product, UpdateAlertRequest, UpdateProductRequest, User,
};

/// 登录入口：由后端托管的 OAuth 跳转地址
///
/// 登录不是 API 调用，而是整页跳转；后端完成认证后会带着 token
/// 重定向回 `/callback`。
pub fn login_url() -> String {
    format!("{}/auth/login", API_BASE_URL)
}

/// PriceDrop 后端 API 客户端
#[derive(Clone, Debug, PartialEq)]
pub struct PriceDropApi {
    client: ApiClient,
}

impl PriceDropApi {
    /// 以当前会话 token（可能还没有）创建网关
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: ApiClient::new(API_BASE_URL, token),
        }
    }

    // ---------------------------------------------------------
    // 路径构造（纯函数）
    // ---------------------------------------------------------

    fn product_path(id: i64) -> String {
        format!("/products/{}", id)
    }

    fn alerts_path(product_id: i64) -> String {
        format!("/products/{}/alerts", product_id)
    }

    fn alert_path(alert_id: i64) -> String {
        format!("/alerts/{}", alert_id)
    }

    fn history_path(product_id: i64, query: &HistoryQuery) -> String {
        format!("/products/{}/history{}", product_id, query.to_query_string())
    }

    // ---------------------------------------------------------
    // 认证
    // ---------------------------------------------------------

    /// 获取当前登录用户（同时用于校验 token 是否有效）
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    // ---------------------------------------------------------
    // 商品
    // ---------------------------------------------------------

    /// 获取商品列表（按 token 隐式限定到当前用户）
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.get_json(&Self::product_path(id)).await
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> Result<Product, ApiError> {
        self.send_json(HttpMethod::Post, "/products", &req).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        req: UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        self.send_json(HttpMethod::Patch, &Self::product_path(id), &req)
            .await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .request(HttpMethod::Delete, &Self::product_path(id), None)
            .await?;
        Ok(())
    }

    // ---------------------------------------------------------
    // 价格提醒
    // ---------------------------------------------------------

    pub async fn get_alerts(&self, product_id: i64) -> Result<Vec<PriceAlert>, ApiError> {
        self.get_json(&Self::alerts_path(product_id)).await
    }

    pub async fn create_alert(
        &self,
        product_id: i64,
        req: CreateAlertRequest,
    ) -> Result<PriceAlert, ApiError> {
        self.send_json(HttpMethod::Post, &Self::alerts_path(product_id), &req)
            .await
    }

    pub async fn update_alert(
        &self,
        alert_id: i64,
        req: UpdateAlertRequest,
    ) -> Result<PriceAlert, ApiError> {
        self.send_json(HttpMethod::Patch, &Self::alert_path(alert_id), &req)
            .await
    }

    pub async fn delete_alert(&self, alert_id: i64) -> Result<(), ApiError> {
        self.client
            .request(HttpMethod::Delete, &Self::alert_path(alert_id), None)
            .await?;
        Ok(())
    }

    // ---------------------------------------------------------
    // 价格历史
    // ---------------------------------------------------------

    /// 查询价格历史；未提供的时间边界不会出现在请求里
    pub async fn get_price_history(
        &self,
        product_id: i64,
        query: HistoryQuery,
    ) -> Result<Vec<PricePoint>, ApiError> {
        self.get_json(&Self::history_path(product_id, &query)).await
    }

    // ---------------------------------------------------------
    // 内部工具
    // ---------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.client.request(HttpMethod::Get, path, None).await?;
        decode(&body)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        req: &B,
    ) -> Result<T, ApiError> {
        let body = encode(req)?;
        let resp = self.client.request(method, path, Some(body)).await?;
        decode(&resp)
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json_wasm::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json_wasm::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_login_url() {
        assert_eq!(login_url(), "https://api.pricedrop24.shop/auth/login");
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(PriceDropApi::product_path(3), "/products/3");
        assert_eq!(PriceDropApi::alerts_path(3), "/products/3/alerts");
        assert_eq!(PriceDropApi::alert_path(9), "/alerts/9");
    }

    #[test]
    fn test_history_path_without_bounds_has_no_params() {
        // 不允许出现空字符串参数
        assert_eq!(
            PriceDropApi::history_path(5, &HistoryQuery::default()),
            "/products/5/history"
        );
    }

    #[test]
    fn test_history_path_with_bounds() {
        let query = HistoryQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0),
            end_date: None,
        };
        assert_eq!(
            PriceDropApi::history_path(5, &query),
            "/products/5/history?start_date=2025-01-01T00:00:00"
        );
    }

    #[test]
    fn test_create_product_request_encoding() {
        // 创建商品的默认请求体：url + 目标价 + 默认间隔
        let req = CreateProductRequest::new("https://example.com/x", 99.99);
        let body: serde_json::Value = serde_json::from_str(&encode(&req).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "url": "https://example.com/x",
                "target_price": 99.99,
                "check_interval_minutes": 60,
            })
        );
    }
}
