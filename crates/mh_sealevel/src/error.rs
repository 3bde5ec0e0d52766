// crates/mh_sealevel/src/error.rs
//! 海平面扩展错误类型
//!
//! 宿主注册表与生命周期相关的错误。速率策略本身没有错误路径，
//! 未识别的 SLR 类型按 steady 处理而不是报错。

use mh_config::ConfigError;
use thiserror::Error;

use crate::hook::LifecyclePhase;

/// 扩展结果类型别名
pub type SeaLevelResult<T> = Result<T, SeaLevelError>;

/// 扩展错误枚举
#[derive(Error, Debug)]
pub enum SeaLevelError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 参数重复声明
    #[error("参数重复声明: {name}")]
    DuplicateParameter { name: String },

    /// 输入中出现未声明的参数
    #[error("未声明的参数: {name}")]
    UnknownParameter { name: String },

    /// 参数类型不匹配
    #[error("参数类型不匹配: {name} 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输入文件解析失败
    #[error("输入解析失败: {0}")]
    Input(String),

    /// 输出变量冲突
    #[error("输出变量冲突: {group}/{name} 已以不同定义注册")]
    OutputConflict { group: String, name: String },

    /// 生命周期顺序错误
    #[error("生命周期顺序错误: 当前 {current}, 不能进入 {requested}")]
    Lifecycle {
        current: LifecyclePhase,
        requested: LifecyclePhase,
    },

    /// 速率已初始化
    #[error("SLR 速率已初始化 (SLR_type={slr_type})，不能重复初始化")]
    AlreadyInitialized { slr_type: String },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeaLevelError::TypeMismatch {
            name: "SLR_type".to_string(),
            expected: "str".to_string(),
            actual: "float".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SLR_type"));
        assert!(msg.contains("str"));
    }

    #[test]
    fn test_already_initialized_display() {
        let err = SeaLevelError::AlreadyInitialized {
            slr_type: "abrupt".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abrupt"));
        assert!(msg.contains("重复初始化"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SeaLevelError = ConfigError::Missing("SLR_mm".to_string()).into();
        assert!(matches!(err, SeaLevelError::Config(_)));
    }
}
