// crates/mh_sealevel/src/units.rs

//! SLR 单位换算
//!
//! 宿主每年只模拟若干个满槽流量日（bankfull discharge day），
//! 因此 mm/年 需要换算为“每满槽秒”的米数：
//!
//! ```text
//! SLR [m/s] = SLR_mm / 1000 / 10 / 24 / 60 / 60
//! ```
//!
//! 每年 10 个满槽日是固定的领域假设，不可配置。

/// 每米毫米数
pub const MM_PER_M: f64 = 1000.0;

/// 每年满槽流量日数
pub const BANKFULL_DAYS_PER_YEAR: f64 = 10.0;

/// 每日小时数
pub const HOURS_PER_DAY: f64 = 24.0;

/// 每小时分钟数
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// 每分钟秒数
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// mm/年 -> 模拟单位 (m/s)
///
/// 逐项相除，与宿主的换算顺序一致，保证结果逐位相同。
#[inline]
pub fn mm_per_year_to_model_rate(slr_mm: f64) -> f64 {
    slr_mm / MM_PER_M / BANKFULL_DAYS_PER_YEAR / HOURS_PER_DAY / MINUTES_PER_HOUR / SECONDS_PER_MINUTE
}

/// 模拟单位 (m/s) -> mm/年
#[inline]
pub fn model_rate_to_mm_per_year(rate: f64) -> f64 {
    rate * SECONDS_PER_MINUTE * MINUTES_PER_HOUR * HOURS_PER_DAY * BANKFULL_DAYS_PER_YEAR * MM_PER_M
}
