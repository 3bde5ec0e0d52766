// crates/mh_config/src/slr_type.rs

//! 海平面上升变化类型
//!
//! 提供 `SlrType` 枚举，决定 SLR 速率在整个运行期间如何演化。
//! 宿主输入文件中该字段是自由字符串，因此未识别的取值不会在解析阶段报错，
//! 而是保留为 [`SlrType::Unrecognized`]，行为等同于 steady。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// SLR 变化类型
///
/// # 示例
///
/// ```rust
/// use mh_config::SlrType;
///
/// let kind: SlrType = "gradual".parse().unwrap();
/// assert_eq!(kind, SlrType::Gradual);
/// assert!(kind.is_time_varying());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlrType {
    /// 恒定速率
    ///
    /// 初始化时设置一次，之后不再改变。
    #[default]
    Steady,
    /// 线性渐增
    ///
    /// 从 0 开始，每步增加固定增量，在运行末尾达到目标速率。
    Gradual,
    /// 突变
    ///
    /// 切换点之前为 0，之后直接跳到目标速率。
    Abrupt,
    /// 未识别的取值（保留原始字符串）
    Unrecognized(String),
}

impl SlrType {
    /// 所有已知类型名称
    pub const KNOWN: [&'static str; 3] = ["steady", "gradual", "abrupt"];

    /// 获取类型名称
    pub fn name(&self) -> &str {
        match self {
            Self::Steady => "steady",
            Self::Gradual => "gradual",
            Self::Abrupt => "abrupt",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// 是否为已知类型
    #[inline]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// 速率在初始化之后是否会变化
    #[inline]
    pub fn is_time_varying(&self) -> bool {
        matches!(self, Self::Gradual | Self::Abrupt)
    }

    /// 宽松解析：未识别的取值保留为 `Unrecognized`
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Self::Unrecognized(s.to_string()))
    }
}

impl std::fmt::Display for SlrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// SLR 类型解析错误
#[derive(Debug, Clone)]
pub struct SlrTypeParseError(String);

impl FromStr for SlrType {
    type Err = SlrTypeParseError;

    /// 严格解析，与宿主一致区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steady" => Ok(Self::Steady),
            "gradual" => Ok(Self::Gradual),
            "abrupt" => Ok(Self::Abrupt),
            _ => Err(SlrTypeParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for SlrTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "无效的 SLR 类型: '{}', 期望 {}",
            self.0,
            SlrType::KNOWN.join(" / ")
        )
    }
}

impl std::error::Error for SlrTypeParseError {}

impl From<String> for SlrType {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<SlrType> for String {
    fn from(t: SlrType) -> Self {
        match t {
            SlrType::Unrecognized(raw) => raw,
            known => known.name().to_string(),
        }
    }
}
