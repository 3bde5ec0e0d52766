// crates/mh_config/src/lib.rs

//! MariHydro 海平面上升配置层
//!
//! 为海平面上升（SLR）扩展提供配置类型，不依赖宿主模拟引擎。
//! 本层只描述“用户给了什么”，速率换算与逐步更新由 `mh_sealevel` 负责。
//!
//! # 模块概览
//!
//! - [`slr_type`]: SlrType 枚举（steady / gradual / abrupt）
//! - [`schedule`]: RunSchedule 运行时长与切换点
//! - [`sealevel_config`]: SeaLevelConfig 完整配置（YAML/JSON）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! mh_slr       ─> uses SeaLevelConfig, SeaLevelRunner
//! mh_sealevel  ─> SeaLevelPolicy, HookRegistry, 宿主注册表
//! mh_config    ─> SlrType, RunSchedule, SeaLevelConfig (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod schedule;
pub mod sealevel_config;
pub mod slr_type;

// 重导出核心类型
pub use error::ConfigError;
pub use schedule::RunSchedule;
pub use sealevel_config::SeaLevelConfig;
pub use slr_type::SlrType;
