// crates/mh_sealevel/tests/runner_tests.rs

//! 独立运行器测试

use mh_config::{RunSchedule, SeaLevelConfig, SlrType};
use mh_sealevel::{
    OutputRegistry, RunnerConfig, SeaLevelPolicy, SeaLevelResult, SeaLevelRunner, SimulationHook,
    StepContext,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn rate_of(mm: f64) -> f64 {
    mm / 1000.0 / 10.0 / 24.0 / 60.0 / 60.0
}

/// 统计时间步次数的附加钩子
struct TickCounter {
    ticks: Arc<AtomicU64>,
}

impl SimulationHook for TickCounter {
    fn name(&self) -> &str {
        "tick_counter"
    }

    fn on_init_output_file(&mut self, outputs: &mut OutputRegistry) -> SeaLevelResult<()> {
        // 与策略登记同一定义，应被视为重复而不是冲突
        outputs.register_meta(SeaLevelPolicy::output_variable())?;
        Ok(())
    }

    fn on_finalize_timestep(&mut self, _ctx: &StepContext) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_full_abrupt_run() {
    let config = RunnerConfig {
        steps: 12100,
        dt: 25000.0,
        sample_interval: 1000,
        initial_sea_level: 0.0,
    };
    let mut runner = SeaLevelRunner::new(config, SeaLevelPolicy::new()).unwrap();
    runner
        .prepare(&SeaLevelConfig::new(5.0, SlrType::Abrupt))
        .unwrap();

    let report = runner.run().unwrap();

    // 后半程 6050 步以 SLR_final 上升
    let expected = rate_of(5.0) * 25000.0 * 6050.0;
    assert!((report.final_sea_level - expected).abs() < 1e-9 * expected);
    assert!(report.final_state.switched);
    assert_eq!(report.records.first().unwrap().rate, 0.0);
    assert_eq!(report.records.last().unwrap().time_iter, 12099);
}

#[test]
fn test_gradual_run_is_quadratic() {
    let steps = 1000;
    let dt = 10.0;
    let config = RunnerConfig {
        steps,
        dt,
        sample_interval: 0,
        initial_sea_level: 1.0,
    };
    let slr = SeaLevelConfig::new(12.0, SlrType::Gradual)
        .with_schedule(RunSchedule::new(steps, 0.5));
    let mut runner = SeaLevelRunner::new(config, SeaLevelPolicy::new()).unwrap();
    runner.prepare(&slr).unwrap();
    let report = runner.run().unwrap();

    // Σ k·δ·dt, k = 1..N
    let delta = rate_of(12.0) / steps as f64;
    let n = steps as f64;
    let expected = 1.0 + delta * dt * n * (n + 1.0) / 2.0;
    assert!((report.final_sea_level - expected).abs() < 1e-12);
    assert_eq!(report.records.len(), 2);
}

#[test]
fn test_extra_hook_sees_every_tick() {
    let ticks = Arc::new(AtomicU64::new(0));
    let config = RunnerConfig {
        steps: 42,
        dt: 1.0,
        sample_interval: 10,
        initial_sea_level: 0.0,
    };
    let mut runner = SeaLevelRunner::new(config, SeaLevelPolicy::new())
        .unwrap()
        .with_hook(Box::new(TickCounter { ticks: ticks.clone() }))
        .unwrap();
    runner.prepare(&SeaLevelConfig::default()).unwrap();
    runner.run().unwrap();

    assert_eq!(ticks.load(Ordering::SeqCst), 42);
    assert_eq!(runner.outputs().len(), 1);
}

#[test]
fn test_prepare_yaml_ignores_host_keys() {
    let yaml = "Length: 5000.0\nWidth: 10000.0\nSLR_mm: 8\nSLR_type: steady\n";
    let mut runner = SeaLevelRunner::new(RunnerConfig::default(), SeaLevelPolicy::new()).unwrap();
    runner.prepare_yaml(yaml).unwrap();

    assert_eq!(runner.rate(), rate_of(8.0));
    assert_eq!(runner.schema().len(), 4);
}

#[test]
fn test_report_saved_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let config = RunnerConfig {
        steps: 3,
        dt: 1.0,
        sample_interval: 1,
        initial_sea_level: 0.0,
    };
    let mut runner = SeaLevelRunner::new(config, SeaLevelPolicy::new()).unwrap();
    runner.prepare(&SeaLevelConfig::new(2.0, SlrType::Steady)).unwrap();
    runner.run().unwrap().save_json(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["steps"], 3);
    assert_eq!(value["records"].as_array().unwrap().len(), 3);
    assert_eq!(value["outputs"]["groups"]["meta"]["SLR_mm"]["units"], "mm per year");
}

#[test]
fn test_prepare_honors_strict_config() {
    let strict = SeaLevelConfig::new(5.0, SlrType::parse_lenient("sawtooth")).strict();
    let mut runner = SeaLevelRunner::new(RunnerConfig::default(), SeaLevelPolicy::new()).unwrap();
    assert!(runner.prepare(&strict).is_err());

    // 宽松配置下同一类型按 steady 处理
    let lenient = SeaLevelConfig::new(5.0, SlrType::parse_lenient("sawtooth"));
    let mut runner = SeaLevelRunner::new(RunnerConfig::default(), SeaLevelPolicy::new()).unwrap();
    runner.prepare(&lenient).unwrap();
    assert_eq!(runner.rate(), rate_of(5.0));
}

#[test]
fn test_strict_policy_rejects_unknown_yaml() {
    let mut runner =
        SeaLevelRunner::new(RunnerConfig::default(), SeaLevelPolicy::strict()).unwrap();
    assert!(runner.policy().unwrap().is_strict());
    assert!(runner.prepare_yaml("SLR_mm: 5\nSLR_type: sawtooth\n").is_err());
}
