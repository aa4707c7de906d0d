use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 后端 API 的固定地址
pub const API_BASE_URL: &str = "https://api.pricedrop24.shop";

/// 默认抓取间隔（分钟）
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u32 = 60;

/// 后端允许的最小抓取间隔（分钟）
pub const MIN_CHECK_INTERVAL_MINUTES: u32 = 15;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 当前登录用户（来自 `GET /auth/me`）
///
/// 客户端从不在本地修改用户记录，只会在重新校验 token 时整体替换。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub google_id: String,
    pub profile_picture: Option<String>,
    pub created_at: NaiveDateTime,
}

impl User {
    /// 界面上展示的名称：有昵称用昵称，否则退回邮箱
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}

/// 被追踪的商品
///
/// 商品的真实状态由后端维护，客户端只持有按视图缓存的只读副本，
/// 变更后通过重新拉取保持一致。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub check_interval_minutes: u32,
    pub last_checked_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub alert_count: Option<u32>,
}

/// 价格提醒
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceAlert {
    pub id: i64,
    pub product_id: i64,
    pub target_price: f64,
    pub is_active: bool,
    pub triggered_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl PriceAlert {
    /// 已触发的提醒对界面来说是终态：不再提供启用/停用操作
    pub fn is_triggered(&self) -> bool {
        self.triggered_at.is_some()
    }

    /// 是否应该在价格走势图上画出目标线
    pub fn shows_target_line(&self) -> bool {
        self.is_active && !self.is_triggered()
    }
}

/// 价格历史采样点（只读、只追加）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricePoint {
    pub id: i64,
    pub product_id: i64,
    pub price: f64,
    pub recorded_at: NaiveDateTime,
}

// =========================================================
// 请求载荷 (Request Payloads)
// =========================================================

/// 创建商品请求
///
/// `manual_*` 字段只在后端无法自动抓取价格/名称时由用户手动补全，
/// 缺省时不应出现在请求体中。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub url: String,
    pub target_price: f64,
    pub check_interval_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_currency: Option<String>,
}

impl CreateProductRequest {
    /// 以默认抓取间隔构造请求
    pub fn new(url: impl Into<String>, target_price: f64) -> Self {
        Self {
            url: url.into(),
            target_price,
            check_interval_minutes: DEFAULT_CHECK_INTERVAL_MINUTES,
            manual_price: None,
            manual_name: None,
            manual_currency: None,
        }
    }

    /// 附加手动录入的回退字段
    pub fn with_manual_entry(mut self, price: f64, name: String, currency: String) -> Self {
        self.manual_price = Some(price);
        self.manual_name = Some(name);
        self.manual_currency = Some(currency);
        self
    }
}

/// 部分更新商品：间隔和/或启用状态
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    pub fn set_active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

/// 创建价格提醒：只需要目标价
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreateAlertRequest {
    pub target_price: f64,
}

/// 部分更新价格提醒
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UpdateAlertRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateAlertRequest {
    pub fn set_active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

// =========================================================
// 历史查询 (History Query)
// =========================================================

/// 价格历史的可选时间范围
///
/// 未提供的边界完全不出现在查询串里，不允许发送空字符串参数。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl HistoryQuery {
    /// 生成查询串，包含前导 `?`；无任何边界时返回空字符串
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(format!("start_date={}", start.format("%Y-%m-%dT%H:%M:%S")));
        }
        if let Some(end) = self.end_date {
            params.push(format!("end_date={}", end.format("%Y-%m-%dT%H:%M:%S")));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}
