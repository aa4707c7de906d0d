//! 展示格式化工具
//!
//! 价格、日期与文本截断。缺失的值一律显示为 "N/A"。

use chrono::NaiveDateTime;

/// 已知货币代码对应的符号
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// 格式化价格；货币缺省按 USD 处理
pub fn format_price(amount: Option<f64>, currency: Option<&str>) -> String {
    let Some(amount) = amount else {
        return "N/A".to_string();
    };
    let code = currency.unwrap_or("USD");
    match currency_symbol(code) {
        Some(symbol) => format!("{}{:.2}", symbol, amount),
        // 不认识的代码放在数字后面，避免猜符号
        None => format!("{:.2} {}", amount, code),
    }
}

/// 日期（不含时间）
pub fn format_date(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "N/A".to_string(),
    }
}

/// 日期 + 时分
pub fn format_date_time(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

/// 按字符数截断，超长时追加省略号
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(99.99), Some("USD")), "$99.99");
        assert_eq!(format_price(Some(10.0), Some("EUR")), "€10.00");
        assert_eq!(format_price(Some(10.0), None), "$10.00");
        assert_eq!(format_price(Some(5.5), Some("SEK")), "5.50 SEK");
        assert_eq!(format_price(None, Some("USD")), "N/A");
    }

    #[test]
    fn test_format_dates() {
        let dt = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(format_date(Some(dt)), "2025-03-09");
        assert_eq!(format_date_time(Some(dt)), "2025-03-09 14:05");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date_time(None), "N/A");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a very long product name", 6), "a very...");
        // 按字符截断而不是字节，多字节文本不能截出半个字符
        assert_eq!(truncate_text("价格追踪器", 2), "价格...");
    }
}
