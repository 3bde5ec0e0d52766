// crates/mh_config/src/sealevel_config.rs

//! SeaLevelConfig - 海平面上升配置
//!
//! 字段名与宿主 YAML 输入文件中的键保持一致（`SLR_mm`、`SLR_type` 等），
//! 因此同一份输入文件既可交给宿主，也可直接交给本扩展读取。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::schedule::RunSchedule;
use crate::slr_type::SlrType;

/// 海平面上升配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeaLevelConfig {
    /// 目标 SLR 速率 [mm/年]
    #[serde(rename = "SLR_mm", default)]
    pub slr_mm: f64,

    /// SLR 变化类型
    #[serde(rename = "SLR_type", default)]
    pub slr_type: SlrType,

    /// 运行时长与切换点
    #[serde(flatten)]
    pub schedule: RunSchedule,

    /// 严格模式：拒绝未识别的 SLR 类型
    #[serde(default)]
    pub strict_slr_type: bool,
}

impl Default for SeaLevelConfig {
    fn default() -> Self {
        Self {
            slr_mm: 0.0,
            slr_type: SlrType::default(),
            schedule: RunSchedule::default(),
            strict_slr_type: false,
        }
    }
}

impl SeaLevelConfig {
    /// 创建指定速率与类型的配置，其余取默认值
    pub fn new(slr_mm: f64, slr_type: SlrType) -> Self {
        Self {
            slr_mm,
            slr_type,
            ..Default::default()
        }
    }

    /// 设置运行时长
    pub fn with_schedule(mut self, schedule: RunSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// 启用严格模式
    pub fn strict(mut self) -> Self {
        self.strict_slr_type = true;
        self
    }

    /// 从文件加载配置
    ///
    /// `.json` 后缀按 JSON 解析，其余按 YAML 解析。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// 从 YAML 字符串解析
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // 空文件视为全部取默认值
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 转换为 YAML 字符串
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// 保存配置到文件（格式同 [`Self::from_file`]）
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => self.to_json()?,
            _ => self.to_yaml()?,
        };
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 负的 `SLR_mm` 是允许的（海平面下降），只拒绝 NaN/Inf。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.slr_mm.is_finite() {
            return Err(ConfigError::invalid("SLR_mm", self.slr_mm, "必须为有限数值"));
        }

        if self.strict_slr_type && !self.slr_type.is_recognized() {
            return Err(ConfigError::invalid(
                "SLR_type",
                self.slr_type.name(),
                format!("严格模式下仅接受 {}", SlrType::KNOWN.join(" / ")),
            ));
        }

        self.schedule.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SeaLevelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.slr_mm, 0.0);
        assert_eq!(config.slr_type, SlrType::Steady);
        assert_eq!(config.schedule.switch_step(), 6050);
    }

    #[test]
    fn test_yaml_host_keys() {
        let yaml = "SLR_mm: 12\nSLR_type: gradual\n";
        let config = SeaLevelConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.slr_mm, 12.0);
        assert_eq!(config.slr_type, SlrType::Gradual);
        assert_eq!(config.schedule.total_steps, 12100);
    }

    #[test]
    fn test_yaml_custom_schedule() {
        let yaml = "SLR_mm: 5.5\nSLR_type: abrupt\nSLR_total_steps: 200\nSLR_switch_fraction: 0.75\n";
        let config = SeaLevelConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.schedule.total_steps, 200);
        assert_eq!(config.schedule.switch_step(), 150);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = SeaLevelConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config, SeaLevelConfig::default());
    }

    #[test]
    fn test_unknown_type_permissive() {
        let config = SeaLevelConfig::from_yaml_str("SLR_type: sawtooth\n").unwrap();
        assert!(!config.slr_type.is_recognized());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_strict() {
        let config = SeaLevelConfig::new(3.0, SlrType::parse_lenient("sawtooth")).strict();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SLR_type"));
    }

    #[test]
    fn test_negative_rate_allowed() {
        let config = SeaLevelConfig::new(-4.0, SlrType::Steady);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        let config = SeaLevelConfig::new(f64::INFINITY, SlrType::Steady);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = SeaLevelConfig::new(7.0, SlrType::Abrupt)
            .with_schedule(RunSchedule::new(400, 0.5));
        let json = config.to_json().unwrap();
        assert!(json.contains("\"SLR_mm\""));
        let parsed = SeaLevelConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_file_roundtrip_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slr.yaml");

        let config = SeaLevelConfig::new(10.0, SlrType::Gradual);
        config.save_to_file(&path).unwrap();

        let loaded = SeaLevelConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_file_missing() {
        let err = SeaLevelConfig::from_file("/nonexistent/slr.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
