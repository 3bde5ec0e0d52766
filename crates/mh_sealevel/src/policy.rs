// crates/mh_sealevel/src/policy.rs

//! 海平面上升速率策略
//!
//! 根据 `SLR_type` 决定 SLR 速率在整个运行期间如何演化：
//!
//! | 类型 | 初始速率 | 每步更新 |
//! |------|----------|----------|
//! | steady | `SLR₀` | 不变 |
//! | gradual | 0 | `SLR += SLR₀ / total_steps` |
//! | abrupt | 0 | `time_iter >= switch_step` 时 `SLR = SLR₀` |
//! | 未识别 | `SLR₀` | 不变（同 steady） |
//!
//! 其中 `SLR₀` 为 `SLR_mm` 换算得到的模拟单位速率，见 [`crate::units`]。
//!
//! 策略自己持有状态，宿主通过 [`SeaLevelPolicy::rate`] 读取当前速率，
//! 而不是由扩展写入宿主模型对象。

use mh_config::{RunSchedule, SeaLevelConfig, SlrType};
use serde::{Deserialize, Serialize};

use crate::error::{SeaLevelError, SeaLevelResult};
use crate::hook::SimulationHook;
use crate::host::{
    OutputRegistry, OutputVariable, ParamKind, ParameterSchema, ParameterSet, StepContext,
    StoragePrecision,
};
use crate::units::mm_per_year_to_model_rate;

/// 输入参数名
pub mod keys {
    /// 目标速率 [mm/年]
    pub const SLR_MM: &str = "SLR_mm";
    /// 变化类型
    pub const SLR_TYPE: &str = "SLR_type";
    /// 假定总步数
    pub const SLR_TOTAL_STEPS: &str = "SLR_total_steps";
    /// 切换比例
    pub const SLR_SWITCH_FRACTION: &str = "SLR_switch_fraction";
}

/// 策略状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPhase {
    /// 尚未初始化速率
    Uninitialized,
    /// 速率已初始化，可逐步推进
    Ready,
}

/// 海平面状态快照
///
/// 可序列化，用于输出与调试。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeaLevelState {
    /// 目标速率 [mm/年]
    #[serde(rename = "SLR_mm")]
    pub slr_mm: f64,
    /// 变化类型
    #[serde(rename = "SLR_type")]
    pub slr_type: SlrType,
    /// 当前速率 [m/s]
    #[serde(rename = "SLR")]
    pub slr: f64,
    /// gradual 每步增量 [m/s]
    #[serde(rename = "SLR_delta", skip_serializing_if = "Option::is_none")]
    pub slr_delta: Option<f64>,
    /// abrupt 切换后速率 [m/s]
    #[serde(rename = "SLR_final", skip_serializing_if = "Option::is_none")]
    pub slr_final: Option<f64>,
    /// abrupt 是否已越过切换点
    pub switched: bool,
}

/// 海平面上升速率策略
#[derive(Debug, Clone)]
pub struct SeaLevelPolicy {
    strict: bool,
    phase: PolicyPhase,
    slr_mm: f64,
    slr_type: SlrType,
    schedule: RunSchedule,
    /// 换算后的目标速率
    initial_rate: f64,
    /// 当前速率
    rate: f64,
    delta: Option<f64>,
    final_rate: Option<f64>,
    switched: bool,
}

impl Default for SeaLevelPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SeaLevelPolicy {
    /// 创建宽松策略：未识别的类型按 steady 处理
    pub fn new() -> Self {
        Self {
            strict: false,
            phase: PolicyPhase::Uninitialized,
            slr_mm: 0.0,
            slr_type: SlrType::Steady,
            schedule: RunSchedule::default(),
            initial_rate: 0.0,
            rate: 0.0,
            delta: None,
            final_rate: None,
            switched: false,
        }
    }

    /// 创建严格策略：未识别的类型在初始化时报错
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::new()
        }
    }

    /// 直接由配置创建并初始化
    pub fn from_config(config: SeaLevelConfig) -> SeaLevelResult<Self> {
        let mut policy = if config.strict_slr_type {
            Self::strict()
        } else {
            Self::new()
        };
        policy.initialize(config)?;
        Ok(policy)
    }

    /// 从绑定后的参数集构造配置
    pub fn config_from_parameters(&self, params: &ParameterSet) -> SeaLevelResult<SeaLevelConfig> {
        use mh_config::ConfigError;

        let slr_mm = params
            .get_f64(keys::SLR_MM)
            .ok_or_else(|| ConfigError::Missing(keys::SLR_MM.to_string()))?;
        let slr_type = params
            .get_str(keys::SLR_TYPE)
            .map(SlrType::parse_lenient)
            .ok_or_else(|| ConfigError::Missing(keys::SLR_TYPE.to_string()))?;

        let mut schedule = RunSchedule::default();
        if let Some(steps) = params.get_i64(keys::SLR_TOTAL_STEPS) {
            schedule.total_steps = u64::try_from(steps).map_err(|_| {
                ConfigError::invalid(keys::SLR_TOTAL_STEPS, steps, "总步数不能为负")
            })?;
        }
        if let Some(fraction) = params.get_f64(keys::SLR_SWITCH_FRACTION) {
            schedule.switch_fraction = fraction;
        }

        Ok(SeaLevelConfig {
            slr_mm,
            slr_type,
            schedule,
            strict_slr_type: self.strict,
        })
    }

    /// 初始化速率
    ///
    /// 只能调用一次。换算目标速率后按类型设置初始状态，并输出一条日志。
    pub fn initialize(&mut self, config: SeaLevelConfig) -> SeaLevelResult<()> {
        if self.phase == PolicyPhase::Ready {
            return Err(SeaLevelError::AlreadyInitialized {
                slr_type: self.slr_type.to_string(),
            });
        }

        let config = SeaLevelConfig {
            strict_slr_type: config.strict_slr_type || self.strict,
            ..config
        };
        config.validate()?;

        let initial_rate = mm_per_year_to_model_rate(config.slr_mm);
        log::info!(
            "Re-configured final SLR based on mm/yr and style: {}",
            initial_rate
        );

        self.slr_mm = config.slr_mm;
        self.schedule = config.schedule;
        self.initial_rate = initial_rate;
        self.rate = initial_rate;
        self.delta = None;
        self.final_rate = None;
        self.switched = false;

        match &config.slr_type {
            SlrType::Steady => {}
            SlrType::Gradual => {
                self.delta = Some(initial_rate / self.schedule.total_steps as f64);
                self.rate = 0.0;
            }
            SlrType::Abrupt => {
                self.final_rate = Some(initial_rate);
                self.rate = 0.0;
            }
            SlrType::Unrecognized(raw) => {
                log::warn!("Unknown SLR_type '{}', SLR stays constant (steady)", raw);
            }
        }

        self.slr_type = config.slr_type;
        self.phase = PolicyPhase::Ready;
        Ok(())
    }

    /// 推进一个时间步
    ///
    /// 仅依赖类型、时间步索引与已有状态；初始化之前调用无效果。
    pub fn advance(&mut self, time_iter: u64) {
        if self.phase != PolicyPhase::Ready {
            return;
        }

        match self.slr_type {
            SlrType::Gradual => {
                if let Some(delta) = self.delta {
                    self.rate += delta;
                }
            }
            SlrType::Abrupt => {
                if time_iter >= self.schedule.switch_step() {
                    if let Some(final_rate) = self.final_rate {
                        if !self.switched {
                            log::debug!(
                                "SLR 在第 {} 步切换为 {:.6e} m/s",
                                time_iter,
                                final_rate
                            );
                        }
                        self.rate = final_rate;
                        self.switched = true;
                    }
                }
            }
            SlrType::Steady | SlrType::Unrecognized(_) => {}
        }
    }

    /// 当前速率 [m/s]
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// 换算后的目标速率 [m/s]
    #[inline]
    pub fn initial_rate(&self) -> f64 {
        self.initial_rate
    }

    /// gradual 每步增量
    pub fn delta(&self) -> Option<f64> {
        self.delta
    }

    /// abrupt 切换后速率
    pub fn final_rate(&self) -> Option<f64> {
        self.final_rate
    }

    /// 目标速率 [mm/年]
    pub fn slr_mm(&self) -> f64 {
        self.slr_mm
    }

    /// 变化类型
    pub fn slr_type(&self) -> &SlrType {
        &self.slr_type
    }

    /// 运行时长配置
    pub fn schedule(&self) -> &RunSchedule {
        &self.schedule
    }

    /// 策略状态
    pub fn phase(&self) -> PolicyPhase {
        self.phase
    }

    /// 是否为严格模式
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// 状态快照
    pub fn snapshot(&self) -> SeaLevelState {
        SeaLevelState {
            slr_mm: self.slr_mm,
            slr_type: self.slr_type.clone(),
            slr: self.rate,
            slr_delta: self.delta,
            slr_final: self.final_rate,
            switched: self.switched,
        }
    }

    /// `SLR_mm` 元数据输出变量定义
    pub fn output_variable() -> OutputVariable {
        OutputVariable::scalar(keys::SLR_MM, keys::SLR_MM, "mm per year", StoragePrecision::F4)
    }
}

impl SimulationHook for SeaLevelPolicy {
    fn name(&self) -> &str {
        "sea_level_policy"
    }

    fn on_import_files(&mut self, schema: &mut ParameterSchema) -> SeaLevelResult<()> {
        let defaults = RunSchedule::default();
        schema.declare(keys::SLR_MM, &[ParamKind::Int, ParamKind::Float], 0i64)?;
        schema.declare(keys::SLR_TYPE, &[ParamKind::Str], SlrType::Steady.name())?;
        schema.declare(
            keys::SLR_TOTAL_STEPS,
            &[ParamKind::Int],
            defaults.total_steps as i64,
        )?;
        schema.declare(
            keys::SLR_SWITCH_FRACTION,
            &[ParamKind::Float],
            defaults.switch_fraction,
        )?;
        Ok(())
    }

    fn on_init_output_file(&mut self, outputs: &mut OutputRegistry) -> SeaLevelResult<()> {
        outputs.register_meta(Self::output_variable())?;
        Ok(())
    }

    fn on_create_other_variables(&mut self, params: &ParameterSet) -> SeaLevelResult<()> {
        let config = self.config_from_parameters(params)?;
        self.initialize(config)
    }

    fn on_finalize_timestep(&mut self, ctx: &StepContext) {
        self.advance(ctx.time_iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::META_GROUP;

    fn rate_of(mm: f64) -> f64 {
        mm / 1000.0 / 10.0 / 24.0 / 60.0 / 60.0
    }

    fn ready(mm: f64, slr_type: SlrType) -> SeaLevelPolicy {
        SeaLevelPolicy::from_config(SeaLevelConfig::new(mm, slr_type)).unwrap()
    }

    #[test]
    fn test_uninitialized_defaults() {
        let mut policy = SeaLevelPolicy::new();
        assert_eq!(policy.phase(), PolicyPhase::Uninitialized);
        policy.advance(10);
        assert_eq!(policy.rate(), 0.0);
    }

    #[test]
    fn test_steady_is_constant() {
        let mut policy = ready(10.0, SlrType::Steady);
        assert_eq!(policy.rate(), rate_of(10.0));
        assert!(policy.delta().is_none());
        assert!(policy.final_rate().is_none());

        for i in 0..500 {
            policy.advance(i);
        }
        assert_eq!(policy.rate(), rate_of(10.0));
    }

    #[test]
    fn test_gradual_initial_state() {
        let policy = ready(12.0, SlrType::Gradual);
        assert_eq!(policy.rate(), 0.0);
        assert_eq!(policy.delta(), Some(rate_of(12.0) / 12100.0));
        assert_eq!(policy.initial_rate(), rate_of(12.0));
    }

    #[test]
    fn test_gradual_first_step() {
        let mut policy = ready(12.0, SlrType::Gradual);
        policy.advance(0);
        assert_eq!(policy.rate(), rate_of(12.0) / 12100.0);
    }

    #[test]
    fn test_abrupt_threshold() {
        let mut policy = ready(5.0, SlrType::Abrupt);
        assert_eq!(policy.rate(), 0.0);
        assert_eq!(policy.final_rate(), Some(rate_of(5.0)));

        policy.advance(6049);
        assert_eq!(policy.rate(), 0.0);
        assert!(!policy.snapshot().switched);

        policy.advance(6050);
        assert_eq!(policy.rate(), rate_of(5.0));

        policy.advance(6050);
        assert_eq!(policy.rate(), rate_of(5.0));

        policy.advance(20000);
        assert_eq!(policy.rate(), rate_of(5.0));
        assert!(policy.snapshot().switched);
    }

    #[test]
    fn test_abrupt_custom_schedule() {
        let config = SeaLevelConfig::new(8.0, SlrType::Abrupt)
            .with_schedule(RunSchedule::new(100, 0.25));
        let mut policy = SeaLevelPolicy::from_config(config).unwrap();

        policy.advance(24);
        assert_eq!(policy.rate(), 0.0);
        policy.advance(25);
        assert_eq!(policy.rate(), rate_of(8.0));
    }

    #[test]
    fn test_unrecognized_behaves_as_steady() {
        let mut policy = ready(7.0, SlrType::parse_lenient("exponential"));
        assert_eq!(policy.rate(), rate_of(7.0));
        for i in 0..7000 {
            policy.advance(i);
        }
        assert_eq!(policy.rate(), rate_of(7.0));
    }

    #[test]
    fn test_strict_flag() {
        assert!(!SeaLevelPolicy::new().is_strict());
        assert!(SeaLevelPolicy::strict().is_strict());

        let config = SeaLevelConfig::new(3.0, SlrType::Abrupt).strict();
        assert!(SeaLevelPolicy::from_config(config).unwrap().is_strict());
    }

    #[test]
    fn test_unrecognized_rejected_when_strict() {
        let mut policy = SeaLevelPolicy::strict();
        let config = SeaLevelConfig::new(7.0, SlrType::parse_lenient("exponential"));
        assert!(policy.initialize(config).is_err());
        assert_eq!(policy.phase(), PolicyPhase::Uninitialized);
    }

    #[test]
    fn test_negative_rate_propagates() {
        let policy = ready(-3.0, SlrType::Steady);
        assert!(policy.rate() < 0.0);
    }

    #[test]
    fn test_initialize_once() {
        let mut policy = ready(1.0, SlrType::Steady);
        let err = policy
            .initialize(SeaLevelConfig::new(2.0, SlrType::Steady))
            .unwrap_err();
        match err {
            SeaLevelError::AlreadyInitialized { slr_type } => assert_eq!(slr_type, "steady"),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(policy.rate(), rate_of(1.0));
        assert_eq!(policy.slr_mm(), 1.0);
    }

    #[test]
    fn test_hook_declares_schema() {
        let mut policy = SeaLevelPolicy::new();
        let mut schema = ParameterSchema::new();
        policy.on_import_files(&mut schema).unwrap();

        assert_eq!(schema.len(), 4);
        let slr_mm = schema.get(keys::SLR_MM).unwrap();
        assert_eq!(slr_mm.kinds, vec![ParamKind::Int, ParamKind::Float]);
        assert_eq!(slr_mm.default.as_f64(), Some(0.0));
        assert_eq!(
            schema.get(keys::SLR_TYPE).unwrap().default.as_str(),
            Some("steady")
        );
    }

    #[test]
    fn test_hook_output_registration_idempotent() {
        let mut policy = SeaLevelPolicy::new();
        let mut outputs = OutputRegistry::new();
        policy.on_init_output_file(&mut outputs).unwrap();
        policy.on_init_output_file(&mut outputs).unwrap();

        assert_eq!(outputs.len(), 1);
        let var = outputs.get(META_GROUP, "SLR_mm").unwrap();
        assert_eq!(var.units, "mm per year");
        assert_eq!(var.precision, StoragePrecision::F4);
        assert!(var.is_scalar());
    }

    #[test]
    fn test_hook_create_from_parameters() {
        let mut policy = SeaLevelPolicy::new();
        let mut schema = ParameterSchema::new();
        policy.on_import_files(&mut schema).unwrap();

        let params = schema
            .bind_yaml("SLR_mm: 12\nSLR_type: gradual\nSLR_total_steps: 100\n", false)
            .unwrap();
        policy.on_create_other_variables(&params).unwrap();

        assert_eq!(policy.slr_type(), &SlrType::Gradual);
        assert_eq!(policy.schedule().total_steps, 100);
        assert_eq!(policy.delta(), Some(rate_of(12.0) / 100.0));

        policy.on_finalize_timestep(&StepContext::at(0));
        assert_eq!(policy.rate(), rate_of(12.0) / 100.0);
    }

    #[test]
    fn test_hook_create_from_host_set() {
        // 宿主直接填充的参数集，整数 SLR_mm 按浮点读取
        let mut params = ParameterSet::default();
        params.insert(keys::SLR_MM, 6i64);
        params.insert(keys::SLR_TYPE, "abrupt");
        params.insert(keys::SLR_TOTAL_STEPS, 40i64);
        params.insert(keys::SLR_SWITCH_FRACTION, 0.5);
        assert_eq!(params.len(), 4);

        let mut policy = SeaLevelPolicy::new();
        policy.on_create_other_variables(&params).unwrap();

        let dt = 25000.0;
        policy.on_finalize_timestep(&StepContext::with_dt(19, dt));
        assert_eq!(policy.rate(), 0.0);
        policy.on_finalize_timestep(&StepContext::with_dt(20, dt));
        assert_eq!(policy.rate(), rate_of(6.0));
    }

    #[test]
    fn test_negative_total_steps_rejected() {
        let mut policy = SeaLevelPolicy::new();
        let mut schema = ParameterSchema::new();
        policy.on_import_files(&mut schema).unwrap();

        let params = schema.bind_yaml("SLR_total_steps: -5\n", false).unwrap();
        assert!(policy.on_create_other_variables(&params).is_err());
    }

    #[test]
    fn test_snapshot_serializes_host_keys() {
        let policy = ready(5.0, SlrType::Abrupt);
        let json = serde_json::to_string(&policy.snapshot()).unwrap();
        assert!(json.contains("\"SLR_type\":\"abrupt\""));
        assert!(json.contains("\"SLR_final\""));
        assert!(!json.contains("SLR_delta"));
    }
}
