// apps/mh_slr/src/commands/mod.rs

//! 子命令实现

pub mod info;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use mh_config::{SeaLevelConfig, SlrType};
use std::path::Path;

/// 加载配置文件，未指定时使用默认配置，再应用命令行覆盖
pub fn load_config(
    path: Option<&Path>,
    slr_mm: Option<f64>,
    slr_type: Option<&str>,
) -> Result<SeaLevelConfig> {
    let mut config = match path {
        Some(p) => SeaLevelConfig::from_file(p)
            .with_context(|| format!("无法加载配置文件: {}", p.display()))?,
        None => SeaLevelConfig::default(),
    };

    if let Some(mm) = slr_mm {
        config.slr_mm = mm;
    }
    if let Some(t) = slr_type {
        config.slr_type = SlrType::parse_lenient(t);
    }

    Ok(config)
}
