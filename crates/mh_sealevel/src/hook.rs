// crates/mh_sealevel/src/hook.rs

//! 模拟扩展钩子
//!
//! 宿主在固定的生命周期节点依次调用已注册钩子：
//!
//! ```text
//! Created ─import_files─> FilesImported ─init_output_file─> OutputInitialized
//!   ─create_other_variables─> VariablesCreated ─finalize_timestep × N─> Stepping
//! ```
//!
//! [`HookRegistry`] 负责按顺序分发并拒绝乱序调用。所有调用同步执行，
//! 不需要锁。

use std::any::Any;

use crate::error::{SeaLevelError, SeaLevelResult};
use crate::host::{OutputRegistry, ParameterSchema, ParameterSet, StepContext};

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecyclePhase {
    /// 已创建，尚未导入参数
    Created,
    /// 参数声明已完成
    FilesImported,
    /// 输出变量已登记
    OutputInitialized,
    /// 派生变量已建立
    VariablesCreated,
    /// 正在时间推进
    Stepping,
}

impl LifecyclePhase {
    /// 阶段名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::FilesImported => "files_imported",
            Self::OutputInitialized => "output_initialized",
            Self::VariablesCreated => "variables_created",
            Self::Stepping => "stepping",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 向下转型辅助
pub trait AsAny {
    /// 转为 `&dyn Any`
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 模拟扩展钩子 trait
///
/// 四个方法对应宿主的四个生命周期节点，默认实现均为空操作，
/// 扩展只需覆盖关心的节点。
pub trait SimulationHook: AsAny {
    /// 钩子名称 (用于日志)
    fn name(&self) -> &str {
        "anonymous"
    }

    /// 参数导入：声明扩展识别的输入参数
    fn on_import_files(&mut self, _schema: &mut ParameterSchema) -> SeaLevelResult<()> {
        Ok(())
    }

    /// 输出文件初始化：登记需要写出的变量
    fn on_init_output_file(&mut self, _outputs: &mut OutputRegistry) -> SeaLevelResult<()> {
        Ok(())
    }

    /// 派生变量建立：参数已绑定，模型状态已构造
    fn on_create_other_variables(&mut self, _params: &ParameterSet) -> SeaLevelResult<()> {
        Ok(())
    }

    /// 时间步结束
    fn on_finalize_timestep(&mut self, _ctx: &StepContext) {}
}

/// 钩子注册表
pub struct HookRegistry {
    hooks: Vec<Box<dyn SimulationHook>>,
    phase: LifecyclePhase,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            phase: LifecyclePhase::Created,
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// 注册钩子
    ///
    /// 只能在参数导入之前注册，否则后注册的钩子会错过前面的节点。
    pub fn register(&mut self, hook: Box<dyn SimulationHook>) -> SeaLevelResult<()> {
        if self.phase != LifecyclePhase::Created {
            return Err(SeaLevelError::Lifecycle {
                current: self.phase,
                requested: LifecyclePhase::Created,
            });
        }
        log::debug!("注册钩子: {}", hook.name());
        self.hooks.push(hook);
        Ok(())
    }

    /// 钩子数量
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// 钩子名称列表
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// 按具体类型查找钩子，供宿主读取扩展状态
    pub fn find<T: SimulationHook + 'static>(&self) -> Option<&T> {
        self.hooks.iter().find_map(|h| {
            let hook: &dyn SimulationHook = h.as_ref();
            hook.as_any().downcast_ref::<T>()
        })
    }

    fn advance(&mut self, from: LifecyclePhase, to: LifecyclePhase) -> SeaLevelResult<()> {
        if self.phase != from {
            return Err(SeaLevelError::Lifecycle {
                current: self.phase,
                requested: to,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// 分发参数导入
    pub fn import_files(&mut self, schema: &mut ParameterSchema) -> SeaLevelResult<()> {
        self.advance(LifecyclePhase::Created, LifecyclePhase::FilesImported)?;
        for hook in self.hooks.iter_mut() {
            log::trace!("{}: import_files", hook.name());
            hook.on_import_files(schema)?;
        }
        Ok(())
    }

    /// 分发输出文件初始化
    pub fn init_output_file(&mut self, outputs: &mut OutputRegistry) -> SeaLevelResult<()> {
        self.advance(LifecyclePhase::FilesImported, LifecyclePhase::OutputInitialized)?;
        for hook in self.hooks.iter_mut() {
            log::trace!("{}: init_output_file", hook.name());
            hook.on_init_output_file(outputs)?;
        }
        Ok(())
    }

    /// 分发派生变量建立
    pub fn create_other_variables(&mut self, params: &ParameterSet) -> SeaLevelResult<()> {
        self.advance(LifecyclePhase::OutputInitialized, LifecyclePhase::VariablesCreated)?;
        for hook in self.hooks.iter_mut() {
            log::trace!("{}: create_other_variables", hook.name());
            hook.on_create_other_variables(params)?;
        }
        Ok(())
    }

    /// 分发时间步结束
    pub fn finalize_timestep(&mut self, ctx: &StepContext) -> SeaLevelResult<()> {
        match self.phase {
            LifecyclePhase::VariablesCreated | LifecyclePhase::Stepping => {
                self.phase = LifecyclePhase::Stepping;
            }
            current => {
                return Err(SeaLevelError::Lifecycle {
                    current,
                    requested: LifecyclePhase::Stepping,
                })
            }
        }
        for hook in self.hooks.iter_mut() {
            hook.on_finalize_timestep(ctx);
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .field("phase", &self.phase)
            .finish()
    }
}
