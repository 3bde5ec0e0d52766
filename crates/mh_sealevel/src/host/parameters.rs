// crates/mh_sealevel/src/host/parameters.rs

//! 参数声明与绑定
//!
//! 扩展在导入阶段向 [`ParameterSchema`] 声明自己识别的参数
//! （名称、允许类型、默认值），宿主读取输入文件后按声明绑定为
//! [`ParameterSet`]。未出现在输入中的参数取默认值。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SeaLevelError, SeaLevelResult};

/// 参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// 整数
    Int,
    /// 浮点数
    Float,
    /// 字符串
    Str,
    /// 布尔值
    Bool,
}

impl ParamKind {
    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    Str(String),
    /// 布尔值
    Bool(bool),
}

impl ParamValue {
    /// 值的类型
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Int(_) => ParamKind::Int,
            Self::Float(_) => ParamKind::Float,
            Self::Str(_) => ParamKind::Str,
            Self::Bool(_) => ParamKind::Bool,
        }
    }

    /// 数值（整数会被提升为浮点）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// 整数值
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// 字符串值
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 从 YAML 标量转换
    ///
    /// `null` 返回 `Ok(None)`，表示使用默认值。
    fn from_yaml(name: &str, value: &serde_yaml::Value) -> SeaLevelResult<Option<Self>> {
        use serde_yaml::Value;

        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => Self::Bool(*b),
            Value::String(s) => Self::Str(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Sequence(_) => return Err(mismatch(name, "scalar", "sequence")),
            Value::Mapping(_) => return Err(mismatch(name, "scalar", "mapping")),
            Value::Tagged(_) => return Err(mismatch(name, "scalar", "tagged")),
        };
        Ok(Some(converted))
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self { Self::Float(v) }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self { Self::Str(v.to_string()) }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

fn mismatch(name: &str, expected: impl Into<String>, actual: impl Into<String>) -> SeaLevelError {
    SeaLevelError::TypeMismatch {
        name: name.to_string(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// 单个参数声明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// 参数名
    pub name: String,
    /// 允许的类型
    pub kinds: Vec<ParamKind>,
    /// 默认值
    pub default: ParamValue,
}

impl ParameterSpec {
    /// 按声明检查并规整一个值
    ///
    /// 仅允许 float 的参数接受整数输入，并提升为浮点。
    fn coerce(&self, value: ParamValue) -> SeaLevelResult<ParamValue> {
        let kind = value.kind();
        if self.kinds.contains(&kind) {
            return Ok(value);
        }
        if let (ParamValue::Int(v), true) = (&value, self.kinds.contains(&ParamKind::Float)) {
            return Ok(ParamValue::Float(*v as f64));
        }
        Err(mismatch(&self.name, self.kinds_label(), kind.name()))
    }

    /// 允许类型的显示文本，如 `int|float`
    pub fn kinds_label(&self) -> String {
        self.kinds
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// 参数声明表
///
/// 保持声明顺序，便于输出与调试。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    /// 创建空声明表
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明参数
    ///
    /// 同名参数只能声明一次；默认值必须符合声明的类型。
    pub fn declare(
        &mut self,
        name: &str,
        kinds: &[ParamKind],
        default: impl Into<ParamValue>,
    ) -> SeaLevelResult<()> {
        if self.contains(name) {
            return Err(SeaLevelError::DuplicateParameter {
                name: name.to_string(),
            });
        }

        let mut spec = ParameterSpec {
            name: name.to_string(),
            kinds: kinds.to_vec(),
            default: default.into(),
        };
        spec.default = spec.coerce(spec.default.clone())?;

        log::debug!("声明参数 {} ({}), 默认值 {}", name, spec.kinds_label(), spec.default);
        self.specs.push(spec);
        Ok(())
    }

    /// 查找参数声明
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// 是否已声明
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 声明数量
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// 遍历声明
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    /// 只取默认值的参数集
    pub fn defaults(&self) -> ParameterSet {
        let values = self
            .specs
            .iter()
            .map(|s| (s.name.clone(), s.default.clone()))
            .collect();
        ParameterSet { values }
    }

    /// 绑定已解析的值
    ///
    /// `allow_unknown` 为真时忽略未声明的键（宿主输入文件通常包含
    /// 大量与本扩展无关的参数）。
    pub fn bind(
        &self,
        input: impl IntoIterator<Item = (String, ParamValue)>,
        allow_unknown: bool,
    ) -> SeaLevelResult<ParameterSet> {
        let mut set = self.defaults();

        for (name, value) in input {
            match self.get(&name) {
                Some(spec) => {
                    let value = spec.coerce(value)?;
                    set.values.insert(name, value);
                }
                None if allow_unknown => {
                    log::trace!("忽略未声明参数 {}", name);
                }
                None => return Err(SeaLevelError::UnknownParameter { name }),
            }
        }

        Ok(set)
    }

    /// 从 YAML 文本绑定
    pub fn bind_yaml(&self, yaml: &str, allow_unknown: bool) -> SeaLevelResult<ParameterSet> {
        if yaml.trim().is_empty() {
            return Ok(self.defaults());
        }

        let root: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| SeaLevelError::Input(e.to_string()))?;

        let mapping = match root {
            serde_yaml::Value::Mapping(m) => m,
            serde_yaml::Value::Null => return Ok(self.defaults()),
            _ => return Err(SeaLevelError::Input("输入文件顶层必须是映射".to_string())),
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in &mapping {
            let name = key
                .as_str()
                .ok_or_else(|| SeaLevelError::Input(format!("参数名必须是字符串: {:?}", key)))?;
            if let Some(v) = ParamValue::from_yaml(name, value)? {
                entries.push((name.to_string(), v));
            }
        }

        self.bind(entries, allow_unknown)
    }
}

/// 绑定后的参数集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// 获取参数值
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// 获取数值参数
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    /// 获取整数参数
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_i64)
    }

    /// 获取字符串参数
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// 设置参数值（不做类型检查，由宿主负责）
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
