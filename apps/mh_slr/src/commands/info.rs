// apps/mh_slr/src/commands/info.rs

//! 信息显示命令
//!
//! 显示扩展声明的参数、输出变量以及配置换算后的速率。

use anyhow::Result;
use clap::Args;
use mh_config::{SeaLevelConfig, SlrType};
use mh_sealevel::host::META_GROUP;
use mh_sealevel::{
    mm_per_year_to_model_rate, units, OutputRegistry, ParameterSchema, SeaLevelPolicy,
    SimulationHook,
};
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示参数声明与输出变量
    #[arg(long)]
    pub schema: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== MariHydro SLR 信息 ===");

    if args.schema || args.config.is_none() {
        print_schema()?;
        println!();
    }

    let config = super::load_config(args.config.as_deref(), None, None)?;
    print_config(&config);

    Ok(())
}

fn print_schema() -> Result<()> {
    let mut policy = SeaLevelPolicy::new();
    let mut schema = ParameterSchema::new();
    let mut outputs = OutputRegistry::new();
    policy.on_import_files(&mut schema)?;
    policy.on_init_output_file(&mut outputs)?;

    println!("=== 参数声明 ===");
    for spec in schema.iter() {
        println!("  {:<22} {:<10} 默认 {}", spec.name, spec.kinds_label(), spec.default);
    }

    println!("\n=== 输出变量 ===");
    for var in outputs.group(META_GROUP) {
        println!(
            "  meta/{:<16} [{}] {} shape=()",
            var.name, var.units, var.precision
        );
    }

    println!("\n=== 单位换算 ===");
    println!(
        "  SLR [m/s] = SLR_mm / {} / {} / {} / {} / {}",
        units::MM_PER_M,
        units::BANKFULL_DAYS_PER_YEAR,
        units::HOURS_PER_DAY,
        units::MINUTES_PER_HOUR,
        units::SECONDS_PER_MINUTE
    );
    Ok(())
}

fn print_config(config: &SeaLevelConfig) {
    let schedule = &config.schedule;
    let rate = mm_per_year_to_model_rate(config.slr_mm);

    println!("=== 当前配置 ===");
    println!("SLR_mm: {} mm/年", config.slr_mm);
    println!("SLR_type: {}", config.slr_type);
    println!("假定总步数: {}", schedule.total_steps);
    println!("切换步: {}", schedule.switch_step());
    println!("目标速率: {:.6e} m/s", rate);

    match &config.slr_type {
        SlrType::Gradual => {
            println!("初始速率: 0");
            println!("每步增量: {:.6e} m/s", rate / schedule.total_steps as f64);
        }
        SlrType::Abrupt => {
            println!("初始速率: 0");
            println!("第 {} 步起: {:.6e} m/s", schedule.switch_step(), rate);
        }
        SlrType::Steady => println!("速率恒定"),
        SlrType::Unrecognized(raw) => println!("未识别类型 '{}'，速率恒定", raw),
    }
}
