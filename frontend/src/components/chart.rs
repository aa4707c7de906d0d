//! 价格走势图
//!
//! 纯 SVG 绘制，不引入图表库。采样点在时间轴上按序号等距摆放
//! （抓取间隔本身近似均匀），活跃未触发的提醒画虚线目标线。
//! 几何换算全部是纯函数，便于脱离浏览器测试。

use leptos::prelude::*;
use pricedrop_shared::{PriceAlert, PricePoint};

use crate::format::{format_date, format_price};

// 视口与内边距（viewBox 坐标系）
const VIEW_W: f64 = 640.0;
const VIEW_H: f64 = 280.0;
const PAD_X: f64 = 48.0;
const PAD_Y: f64 = 24.0;

/// 纵轴取值范围：历史价格与目标线都要落在可见区域内
fn value_range(history: &[PricePoint], alerts: &[PriceAlert]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in history {
        min = min.min(point.price);
        max = max.max(point.price);
    }
    for alert in alerts.iter().filter(|a| a.shows_target_line()) {
        min = min.min(alert.target_price);
        max = max.max(alert.target_price);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    // 所有值相同时撑开一个区间，避免除零
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// 第 index 个采样点的横坐标；单点时居中
fn x_at(index: usize, len: usize) -> f64 {
    if len <= 1 {
        return VIEW_W / 2.0;
    }
    PAD_X + (VIEW_W - 2.0 * PAD_X) * index as f64 / (len - 1) as f64
}

/// 价格对应的纵坐标（SVG 的 y 轴向下，需要翻转）
fn y_at(value: f64, min: f64, max: f64) -> f64 {
    let ratio = (value - min) / (max - min);
    VIEW_H - PAD_Y - (VIEW_H - 2.0 * PAD_Y) * ratio
}

/// 折线的 points 属性值
fn polyline_points(history: &[PricePoint], min: f64, max: f64) -> String {
    history
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x_at(i, history.len()), y_at(p.price, min, max)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
pub fn PriceHistoryChart(
    history: Vec<PricePoint>,
    alerts: Vec<PriceAlert>,
    currency: Option<String>,
) -> impl IntoView {
    let mut history = history;
    // 展示顺序由客户端保证，不依赖后端的返回顺序
    history.sort_by_key(|p| p.recorded_at);

    if history.is_empty() {
        return view! {
            <div class="flex items-center justify-center h-48 text-base-content/50">
                "还没有价格历史数据"
            </div>
        }
        .into_any();
    }

    let (min, max) = value_range(&history, &alerts);
    let points = polyline_points(&history, min, max);
    let len = history.len();
    let currency_code = currency.clone();

    let dots = history
        .iter()
        .enumerate()
        .map(|(i, p)| {
            view! {
                <circle
                    cx=format!("{:.1}", x_at(i, len))
                    cy=format!("{:.1}", y_at(p.price, min, max))
                    r="3"
                    class="fill-primary"
                >
                    <title>
                        {format!(
                            "{} · {}",
                            format_price(Some(p.price), currency_code.as_deref()),
                            format_date(Some(p.recorded_at)),
                        )}
                    </title>
                </circle>
            }
        })
        .collect_view();

    let target_lines = alerts
        .iter()
        .filter(|a| a.shows_target_line())
        .map(|alert| {
            let y = format!("{:.1}", y_at(alert.target_price, min, max));
            view! {
                <line
                    x1=format!("{}", PAD_X)
                    y1=y.clone()
                    x2=format!("{}", VIEW_W - PAD_X)
                    y2=y.clone()
                    stroke-dasharray="5 5"
                    class="stroke-error"
                />
                <text
                    x=format!("{}", VIEW_W - PAD_X)
                    y=y
                    dy="-4"
                    text-anchor="end"
                    class="fill-error text-xs"
                >
                    {format_price(Some(alert.target_price), currency.as_deref())}
                </text>
            }
        })
        .collect_view();

    let first_label = format_date(history.first().map(|p| p.recorded_at));
    let last_label = format_date(history.last().map(|p| p.recorded_at));

    view! {
        <svg
            viewBox=format!("0 0 {} {}", VIEW_W, VIEW_H)
            class="w-full h-auto"
            preserveAspectRatio="xMidYMid meet"
        >
            <polyline points=points fill="none" stroke-width="2" class="stroke-primary" />
            {dots}
            {target_lines}
            <text x=format!("{}", PAD_X) y=format!("{}", VIEW_H - 4.0) class="fill-base-content/50 text-xs">
                {first_label}
            </text>
            <text
                x=format!("{}", VIEW_W - PAD_X)
                y=format!("{}", VIEW_H - 4.0)
                text-anchor="end"
                class="fill-base-content/50 text-xs"
            >
                {last_label}
            </text>
        </svg>
    }
    .into_any()
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(id: i64, price: f64, day: u32) -> PricePoint {
        PricePoint {
            id,
            product_id: 1,
            price,
            recorded_at: NaiveDate::from_ymd_opt(2025, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn alert(target_price: f64, is_active: bool, triggered: bool) -> PriceAlert {
        PriceAlert {
            id: 1,
            product_id: 1,
            target_price,
            is_active,
            triggered_at: triggered.then(|| {
                NaiveDate::from_ymd_opt(2025, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_value_range_includes_target_lines() {
        let history = vec![point(1, 50.0, 1), point(2, 60.0, 2)];
        // 活跃提醒的目标价要拉低下界
        let (min, max) = value_range(&history, &[alert(40.0, true, false)]);
        assert_eq!((min, max), (40.0, 60.0));

        // 已触发/已停用的提醒不画线，也不影响范围
        let (min, max) = value_range(&history, &[alert(40.0, true, true)]);
        assert_eq!((min, max), (50.0, 60.0));
    }

    #[test]
    fn test_value_range_pads_flat_series() {
        let history = vec![point(1, 25.0, 1), point(2, 25.0, 2)];
        assert_eq!(value_range(&history, &[]), (24.0, 26.0));
        assert_eq!(value_range(&[], &[]), (0.0, 1.0));
    }

    #[test]
    fn test_x_positions_are_evenly_spaced() {
        assert_eq!(x_at(0, 1), VIEW_W / 2.0);
        assert_eq!(x_at(0, 3), PAD_X);
        assert_eq!(x_at(2, 3), VIEW_W - PAD_X);
        assert_eq!(x_at(1, 3), VIEW_W / 2.0);
    }

    #[test]
    fn test_y_axis_is_inverted() {
        // 高价靠上（y 小），低价靠下（y 大）
        assert_eq!(y_at(100.0, 0.0, 100.0), PAD_Y);
        assert_eq!(y_at(0.0, 0.0, 100.0), VIEW_H - PAD_Y);
    }

    #[test]
    fn test_polyline_points_format() {
        let history = vec![point(1, 0.0, 1), point(2, 100.0, 2)];
        assert_eq!(
            polyline_points(&history, 0.0, 100.0),
            format!("{:.1},{:.1} {:.1},{:.1}", PAD_X, VIEW_H - PAD_Y, VIEW_W - PAD_X, PAD_Y)
        );
    }
}
