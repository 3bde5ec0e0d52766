// apps/mh_slr/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证 SLR 配置文件的正确性。

use anyhow::{bail, Context, Result};
use clap::Args;
use mh_config::SeaLevelConfig;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== MariHydro SLR 配置验证 ===");

    let Some(config_path) = &args.config else {
        println!("用法: mh_slr validate --config <配置文件> [--strict]");
        return Ok(());
    };

    let mut result = ValidationResult::default();
    validate_config(config_path, &mut result)?;

    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed = if is_json {
        SeaLevelConfig::from_json(&content)
    } else {
        SeaLevelConfig::from_yaml_str(&content)
    };

    let config = match parsed {
        Ok(c) => c,
        Err(e) => {
            result.add_error(e.to_string());
            return Ok(());
        }
    };

    check_config(&config, result);
    println!("  ✓ 配置文件格式有效");
    Ok(())
}

fn check_config(config: &SeaLevelConfig, result: &mut ValidationResult) {
    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
    }

    if !config.slr_type.is_recognized() {
        result.add_warning(format!(
            "未识别的 SLR_type '{}'，将按 steady 处理",
            config.slr_type
        ));
    }

    if config.slr_mm < 0.0 {
        result.add_warning(format!("SLR_mm = {} 为负，海平面将下降", config.slr_mm));
    }

    if config.slr_mm == 0.0 && config.slr_type.is_time_varying() {
        result.add_warning(format!(
            "SLR_mm 为 0，'{}' 类型不会产生任何变化",
            config.slr_type
        ));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
