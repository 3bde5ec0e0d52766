// crates/mh_sealevel/src/runner.rs

//! 独立运行器
//!
//! 在没有完整宿主引擎的情况下驱动钩子生命周期：依次执行参数导入、
//! 输出初始化、派生变量建立，然后逐步推进，并按宿主的方式累积基准水位：
//!
//! ```text
//! finalize_timestep(time_iter)  ->  H_SL += SLR * dt  ->  time_iter += 1
//! ```
//!
//! 用于命令行演示、情景预览与集成测试。

use mh_config::SeaLevelConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{SeaLevelError, SeaLevelResult};
use crate::hook::{HookRegistry, SimulationHook};
use crate::host::{OutputRegistry, ParameterSchema, ParameterSet, StepContext, META_GROUP};
use crate::policy::{SeaLevelPolicy, SeaLevelState};
use crate::units::model_rate_to_mm_per_year;

/// 运行器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// 推进步数
    pub steps: u64,
    /// 时间步长 [s]
    pub dt: f64,
    /// 记录间隔（步），0 表示只记录首末步
    pub sample_interval: u64,
    /// 初始基准水位 [m]
    pub initial_sea_level: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            steps: 12100,
            dt: 25000.0,
            sample_interval: 100,
            initial_sea_level: 0.0,
        }
    }
}

/// 单步记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 时间步索引
    pub time_iter: u64,
    /// 该步结束时的模拟时间 [s]
    pub time: f64,
    /// 该步使用的 SLR 速率 [m/s]
    pub rate: f64,
    /// 该步结束时的基准水位 [m]
    pub sea_level: f64,
}

/// 运行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 推进步数
    pub steps: u64,
    /// 时间步长 [s]
    pub dt: f64,
    /// 最终策略状态
    pub final_state: SeaLevelState,
    /// 最终速率对应的 mm/年
    pub final_rate_mm_per_year: f64,
    /// 最终基准水位 [m]
    pub final_sea_level: f64,
    /// 元数据输出（已按存储精度截断）
    pub meta: BTreeMap<String, f64>,
    /// 已登记的输出变量
    pub outputs: OutputRegistry,
    /// 采样记录
    pub records: Vec<StepRecord>,
}

impl RunReport {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> SeaLevelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SeaLevelError::Serialize(e.to_string()))
    }

    /// 保存为 JSON 文件
    pub fn save_json(&self, path: impl AsRef<Path>) -> SeaLevelResult<()> {
        let content = self.to_json()?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

/// 独立运行器
#[derive(Debug)]
pub struct SeaLevelRunner {
    config: RunnerConfig,
    registry: HookRegistry,
    schema: ParameterSchema,
    outputs: OutputRegistry,
    params: ParameterSet,
    time_iter: u64,
    time: f64,
    sea_level: f64,
}

impl SeaLevelRunner {
    /// 创建运行器并注册策略
    pub fn new(config: RunnerConfig, policy: SeaLevelPolicy) -> SeaLevelResult<Self> {
        let mut registry = HookRegistry::new();
        registry.register(Box::new(policy))?;

        let sea_level = config.initial_sea_level;
        Ok(Self {
            config,
            registry,
            schema: ParameterSchema::new(),
            outputs: OutputRegistry::new(),
            params: ParameterSet::default(),
            time_iter: 0,
            time: 0.0,
            sea_level,
        })
    }

    /// 追加其他钩子（必须在 prepare 之前）
    pub fn with_hook(mut self, hook: Box<dyn SimulationHook>) -> SeaLevelResult<Self> {
        self.registry.register(hook)?;
        Ok(self)
    }

    /// 以 YAML 输入完成初始化
    ///
    /// 未声明的键被忽略，与宿主读取完整输入文件的行为一致。
    pub fn prepare_yaml(&mut self, yaml: &str) -> SeaLevelResult<()> {
        self.registry.import_files(&mut self.schema)?;
        self.registry.init_output_file(&mut self.outputs)?;
        self.params = self.schema.bind_yaml(yaml, true)?;
        self.registry.create_other_variables(&self.params)
    }

    /// 以已加载的配置完成初始化
    ///
    /// 先按配置自身的规则校验（包括 `strict_slr_type`），再经宿主输入路径绑定。
    pub fn prepare(&mut self, config: &SeaLevelConfig) -> SeaLevelResult<()> {
        config.validate()?;
        let yaml = config.to_yaml()?;
        self.prepare_yaml(&yaml)
    }

    /// 策略（供读取当前速率）
    pub fn policy(&self) -> Option<&SeaLevelPolicy> {
        self.registry.find::<SeaLevelPolicy>()
    }

    /// 当前速率 [m/s]
    pub fn rate(&self) -> f64 {
        self.policy().map(SeaLevelPolicy::rate).unwrap_or(0.0)
    }

    /// 当前基准水位 [m]
    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }

    /// 当前时间步索引
    pub fn time_iter(&self) -> u64 {
        self.time_iter
    }

    /// 已登记的输出变量
    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }

    /// 参数声明表
    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// 推进一步，返回该步记录
    pub fn step(&mut self) -> SeaLevelResult<StepRecord> {
        let ctx = StepContext {
            time_iter: self.time_iter,
            time: self.time,
            dt: self.config.dt,
        };
        self.registry.finalize_timestep(&ctx)?;

        let rate = self.rate();
        self.sea_level += rate * self.config.dt;
        self.time += self.config.dt;

        let record = StepRecord {
            time_iter: self.time_iter,
            time: self.time,
            rate,
            sea_level: self.sea_level,
        };
        self.time_iter += 1;
        Ok(record)
    }

    /// 推进全部步数并生成报告
    pub fn run(&mut self) -> SeaLevelResult<RunReport> {
        let steps = self.config.steps;
        let interval = self.config.sample_interval;
        let mut records = Vec::new();

        for i in 0..steps {
            let record = self.step()?;
            let sampled = if interval == 0 {
                i == 0
            } else {
                i % interval == 0
            };
            if sampled || i + 1 == steps {
                records.push(record);
            }
        }

        log::info!(
            "SLR 推进完成: {} 步, 最终速率 {:.6e} m/s, 基准水位 {:.6} m",
            steps,
            self.rate(),
            self.sea_level
        );

        self.report(records)
    }

    fn report(&self, records: Vec<StepRecord>) -> SeaLevelResult<RunReport> {
        let policy = self.policy().ok_or_else(|| {
            SeaLevelError::Config(mh_config::ConfigError::Missing(
                "sea_level_policy".to_string(),
            ))
        })?;

        // 元数据按宿主的方式取同名参数值
        let meta = self
            .outputs
            .group(META_GROUP)
            .filter_map(|var| {
                self.params
                    .get_f64(&var.name)
                    .map(|v| (var.name.clone(), var.precision.quantize(v)))
            })
            .collect();

        Ok(RunReport {
            steps: self.config.steps,
            dt: self.config.dt,
            final_state: policy.snapshot(),
            final_rate_mm_per_year: model_rate_to_mm_per_year(policy.rate()),
            final_sea_level: self.sea_level,
            meta,
            outputs: self.outputs.clone(),
            records,
        })
    }
}
