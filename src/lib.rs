//! GraphRunner - 构建流程与图查询引擎之间的查询执行门面
//!
//! 本 crate 负责持有一个可丢弃的查询引擎实例，在数据图或 Schema 变更事件到达时
//! 重建并替换该实例，并把查询结果中的引擎错误还原到用户调用位置，
//! 以结构化诊断的形式交给构建报告器。

pub mod attribution;
pub mod config;
pub mod core;
pub mod event;
pub mod query;
pub mod reporter;
pub mod utils;

pub use attribution::{CallerPattern, ErrorAttributor, ErrorParser, ErrorStructurer, StackFrame};
pub use crate::core::error::{RunnerError, RunnerResult};
pub use crate::core::types::{Context, ExecutionRequest, ExecutionResult, QuerySource, QueryText, RawError};
pub use event::{EventBus, EventTag, InvalidationEvent};
pub use query::{EngineFactory, EngineOptions, QueryEngine, QueryOptions, QueryRunner, RunnerOptions};
pub use reporter::{LogReporter, Reporter};
