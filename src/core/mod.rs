//! 核心类型与统一错误处理

pub mod error;
pub mod types;

pub use error::{ErrorCode, RunnerError, RunnerResult};
pub use types::{Context, ExecutionRequest, ExecutionResult, QuerySource, QueryText, RawError};
