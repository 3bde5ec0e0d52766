// crates/mh_sealevel/src/host/output.rs

//! 输出变量注册表
//!
//! 扩展在输出文件初始化阶段登记需要持久化的变量，宿主据此写出。
//! 变量按组存放，标量元数据放在 [`META_GROUP`] 组中。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SeaLevelError, SeaLevelResult};

/// 元数据组名
pub const META_GROUP: &str = "meta";

/// 存储精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePrecision {
    /// 32 位浮点
    F4,
    /// 64 位浮点
    F8,
    /// 32 位整数
    I4,
    /// 64 位整数
    I8,
}

impl StoragePrecision {
    /// 类型代码，与 NetCDF/NumPy 的写法一致
    pub fn code(&self) -> &'static str {
        match self {
            Self::F4 => "f4",
            Self::F8 => "f8",
            Self::I4 => "i4",
            Self::I8 => "i8",
        }
    }

    /// 每个值占用的字节数
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::F4 | Self::I4 => 4,
            Self::F8 | Self::I8 => 8,
        }
    }

    /// 按存储精度截断数值，得到实际写出的值
    pub fn quantize(&self, value: f64) -> f64 {
        match self {
            Self::F4 => value as f32 as f64,
            Self::F8 => value,
            Self::I4 => value as i32 as f64,
            Self::I8 => value as i64 as f64,
        }
    }
}

impl std::fmt::Display for StoragePrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 输出变量定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputVariable {
    /// 变量名（对应模型上的字段）
    pub name: String,
    /// 显示名称
    pub long_name: String,
    /// 单位
    pub units: String,
    /// 存储精度
    pub precision: StoragePrecision,
    /// 维度名，标量为空
    pub shape: Vec<String>,
}

impl OutputVariable {
    /// 创建标量变量
    pub fn scalar(
        name: impl Into<String>,
        long_name: impl Into<String>,
        units: impl Into<String>,
        precision: StoragePrecision,
    ) -> Self {
        Self {
            name: name.into(),
            long_name: long_name.into(),
            units: units.into(),
            precision,
            shape: Vec::new(),
        }
    }

    /// 是否为标量
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

/// 输出变量注册表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputRegistry {
    groups: BTreeMap<String, BTreeMap<String, OutputVariable>>,
}

impl OutputRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记变量
    ///
    /// 返回 `Ok(true)` 表示新登记；相同定义重复登记返回 `Ok(false)`；
    /// 同名但定义不同返回 [`SeaLevelError::OutputConflict`]。
    pub fn register(&mut self, group: &str, variable: OutputVariable) -> SeaLevelResult<bool> {
        let entries = self.groups.entry(group.to_string()).or_default();

        if let Some(existing) = entries.get(&variable.name) {
            if *existing == variable {
                log::debug!("输出变量 {}/{} 已登记，跳过", group, variable.name);
                return Ok(false);
            }
            return Err(SeaLevelError::OutputConflict {
                group: group.to_string(),
                name: variable.name,
            });
        }

        log::debug!(
            "登记输出变量 {}/{} [{}] ({})",
            group,
            variable.name,
            variable.units,
            variable.precision
        );
        entries.insert(variable.name.clone(), variable);
        Ok(true)
    }

    /// 登记元数据标量
    pub fn register_meta(&mut self, variable: OutputVariable) -> SeaLevelResult<bool> {
        self.register(META_GROUP, variable)
    }

    /// 查找变量
    pub fn get(&self, group: &str, name: &str) -> Option<&OutputVariable> {
        self.groups.get(group).and_then(|g| g.get(name))
    }

    /// 遍历某组变量
    pub fn group(&self, group: &str) -> impl Iterator<Item = &OutputVariable> {
        self.groups.get(group).into_iter().flat_map(|g| g.values())
    }

    /// 变量总数
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
