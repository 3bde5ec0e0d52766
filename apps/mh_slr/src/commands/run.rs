// apps/mh_slr/src/commands/run.rs

//! 运行情景命令
//!
//! 用独立运行器按宿主生命周期推进 SLR 策略，输出速率与基准水位轨迹。

use anyhow::{Context, Result};
use clap::Args;
use mh_config::RunSchedule;
use mh_sealevel::{model_rate_to_mm_per_year, RunnerConfig, SeaLevelPolicy, SeaLevelRunner};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// 运行情景参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径 (YAML 或 JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆盖 SLR_mm [mm/年]
    #[arg(long)]
    pub slr_mm: Option<f64>,

    /// 覆盖 SLR_type (steady, gradual, abrupt)
    #[arg(long)]
    pub slr_type: Option<String>,

    /// 推进步数，默认取配置中的 SLR_total_steps
    #[arg(short = 'n', long)]
    pub steps: Option<u64>,

    /// 时间步长 [秒]
    #[arg(long, default_value = "25000.0")]
    pub dt: f64,

    /// 记录间隔（步）
    #[arg(long, default_value = "1000")]
    pub sample_interval: u64,

    /// 初始基准水位 [m]
    #[arg(long, default_value = "0.0")]
    pub initial_sea_level: f64,

    /// 报告输出路径 (JSON)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 拒绝未识别的 SLR_type
    #[arg(long)]
    pub strict: bool,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== MariHydro SLR 情景启动 ===");

    let mut config = super::load_config(
        args.config.as_deref(),
        args.slr_mm,
        args.slr_type.as_deref(),
    )?;
    config.strict_slr_type |= args.strict;
    config.validate().context("配置验证失败")?;

    let schedule: RunSchedule = config.schedule;
    let steps = args.steps.unwrap_or(schedule.total_steps);
    info!(
        "配置: SLR_mm={} mm/年, SLR_type={}, 假定总步数={}, 切换步={}",
        config.slr_mm,
        config.slr_type,
        schedule.total_steps,
        schedule.switch_step()
    );

    let policy = if config.strict_slr_type {
        SeaLevelPolicy::strict()
    } else {
        SeaLevelPolicy::new()
    };

    let runner_config = RunnerConfig {
        steps,
        dt: args.dt,
        sample_interval: args.sample_interval,
        initial_sea_level: args.initial_sea_level,
    };
    let mut runner = SeaLevelRunner::new(runner_config, policy)?;
    runner.prepare(&config).context("初始化 SLR 策略失败")?;

    info!("开始推进: {} 步, 时间步长={} s", steps, args.dt);
    let start = Instant::now();
    let report = runner.run()?;
    let elapsed = start.elapsed();

    for record in &report.records {
        info!(
            "step={:>6} t={:.3e} s: SLR={:.6e} m/s ({:.3} mm/年), H_SL={:.6} m",
            record.time_iter,
            record.time,
            record.rate,
            model_rate_to_mm_per_year(record.rate),
            record.sea_level
        );
    }

    info!("=== 情景完成 ===");
    info!("总步数: {}", report.steps);
    info!("最终速率: {:.3} mm/年", report.final_rate_mm_per_year);
    info!("最终基准水位: {:.6} m", report.final_sea_level);
    info!("计算时间: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = &args.output {
        report
            .save_json(path)
            .with_context(|| format!("无法写入报告: {}", path.display()))?;
        info!("报告已写入: {}", path.display());
    }

    Ok(())
}
