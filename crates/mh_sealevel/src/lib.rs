// crates/mh_sealevel/src/lib.rs

//! MariHydro 海平面上升扩展
//!
//! 为三角洲沉积模拟宿主提供可变海平面上升（SLR）情景。扩展以钩子形式
//! 挂入宿主的四个生命周期节点：
//!
//! | 节点 | 方法 | 作用 |
//! |------|------|------|
//! | 参数导入 | `on_import_files` | 声明 `SLR_mm`、`SLR_type` 等参数 |
//! | 输出初始化 | `on_init_output_file` | 登记 `SLR_mm` 元数据 (f4) |
//! | 派生变量建立 | `on_create_other_variables` | 换算初始速率 |
//! | 时间步结束 | `on_finalize_timestep` | 按类型更新速率 |
//!
//! # 模块结构
//!
//! - [`units`]: mm/年 与模拟单位的换算
//! - [`policy`]: SeaLevelPolicy 速率策略
//! - [`hook`]: SimulationHook trait 与 HookRegistry
//! - [`host`]: 宿主契约（参数声明、输出注册、时间步上下文）
//! - [`runner`]: 独立运行器
//! - [`error`]: 错误类型
//!
//! # 示例
//!
//! ```rust
//! use mh_config::{SeaLevelConfig, SlrType};
//! use mh_sealevel::SeaLevelPolicy;
//!
//! let mut policy = SeaLevelPolicy::from_config(SeaLevelConfig::new(5.0, SlrType::Abrupt))?;
//! assert_eq!(policy.rate(), 0.0);
//!
//! policy.advance(6050);
//! assert!(policy.rate() > 0.0);
//! # Ok::<(), mh_sealevel::SeaLevelError>(())
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod hook;
pub mod host;
pub mod policy;
pub mod runner;
pub mod units;

// 重导出核心类型
pub use error::{SeaLevelError, SeaLevelResult};
pub use hook::{HookRegistry, LifecyclePhase, SimulationHook};
pub use host::{
    OutputRegistry, OutputVariable, ParamKind, ParamValue, ParameterSchema, ParameterSet,
    StepContext, StoragePrecision,
};
pub use policy::{PolicyPhase, SeaLevelPolicy, SeaLevelState};
pub use runner::{RunReport, RunnerConfig, SeaLevelRunner, StepRecord};
pub use units::{mm_per_year_to_model_rate, model_rate_to_mm_per_year};
