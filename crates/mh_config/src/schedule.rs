// crates/mh_config/src/schedule.rs

//! 运行时长与切换点
//!
//! gradual 与 abrupt 两种类型都依赖“总运行步数”。宿主的运行时长配置
//! 不直接暴露给扩展，因此这里单独配置，默认值对应 12100 步、中点切换。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认总步数
pub const DEFAULT_TOTAL_STEPS: u64 = 12100;

/// 默认切换点（占总步数的比例）
pub const DEFAULT_SWITCH_FRACTION: f64 = 0.5;

/// 运行时长配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSchedule {
    /// 假定的总运行步数
    #[serde(rename = "SLR_total_steps", default = "default_total_steps")]
    pub total_steps: u64,

    /// abrupt 切换点占总步数的比例 [0, 1]
    #[serde(rename = "SLR_switch_fraction", default = "default_switch_fraction")]
    pub switch_fraction: f64,
}

fn default_total_steps() -> u64 { DEFAULT_TOTAL_STEPS }
fn default_switch_fraction() -> f64 { DEFAULT_SWITCH_FRACTION }

impl Default for RunSchedule {
    fn default() -> Self {
        Self {
            total_steps: default_total_steps(),
            switch_fraction: default_switch_fraction(),
        }
    }
}

impl RunSchedule {
    /// 创建运行时长配置
    pub fn new(total_steps: u64, switch_fraction: f64) -> Self {
        Self { total_steps, switch_fraction }
    }

    /// abrupt 切换的时间步索引（四舍五入）
    ///
    /// 默认配置下为 6050。
    pub fn switch_step(&self) -> u64 {
        (self.total_steps as f64 * self.switch_fraction).round() as u64
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_steps == 0 {
            return Err(ConfigError::invalid(
                "SLR_total_steps",
                self.total_steps,
                "总步数必须为正",
            ));
        }

        if !self.switch_fraction.is_finite()
            || !(0.0..=1.0).contains(&self.switch_fraction)
        {
            return Err(ConfigError::invalid(
                "SLR_switch_fraction",
                self.switch_fraction,
                "切换比例必须在 [0, 1] 范围内",
            ));
        }

        Ok(())
    }
}
