// crates/mh_sealevel/src/host/mod.rs

//! 宿主契约
//!
//! 扩展只通过以下几个窄接口与宿主交互：
//! - 参数声明表 (ParameterSchema) 与绑定后的参数集 (ParameterSet)
//! - 输出变量注册表 (OutputRegistry)
//! - 时间步上下文 (StepContext)
//!
//! 宿主负责时间推进与真正的文件写出，扩展不直接读写宿主模型对象。

pub mod output;
pub mod parameters;

pub use output::{OutputRegistry, OutputVariable, StoragePrecision, META_GROUP};
pub use parameters::{ParamKind, ParamValue, ParameterSchema, ParameterSet, ParameterSpec};

use serde::{Deserialize, Serialize};

/// 时间步上下文
///
/// 由宿主在每步结束时传入，扩展只读。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepContext {
    /// 当前时间步索引（从 0 开始）
    pub time_iter: u64,
    /// 当前模拟时间 [s]
    pub time: f64,
    /// 时间步长 [s]
    pub dt: f64,
}

impl StepContext {
    /// 仅指定时间步索引
    pub fn at(time_iter: u64) -> Self {
        Self {
            time_iter,
            time: 0.0,
            dt: 0.0,
        }
    }

    /// 指定时间步索引与步长，时间由两者推算
    pub fn with_dt(time_iter: u64, dt: f64) -> Self {
        Self {
            time_iter,
            time: time_iter as f64 * dt,
            dt,
        }
    }
}
