//! 统一错误处理
//!
//! 区分两类错误：
//! - 本 crate 自身的失败（引擎构建失败、配置错误等），以 `RunnerError` 通过 `?` 传播
//! - 引擎执行产生的查询错误，它们是 `ExecutionResult::errors` 中的数据，
//!   经归因后成为 `StructuredError` 交给报告器

use thiserror::Error;

pub mod codes;
pub mod structured;

pub use codes::{CodeCategory, ErrorCode};
pub use structured::{ErrorCategory, ErrorLocation, Position, StructuredError, FROM_QUERY_CALL};

/// 统一的运行器错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("引擎创建错误: {0}")]
    EngineCreation(String),

    #[error("引擎执行错误: {0}")]
    EngineExecution(String),

    #[error("无效的调用者匹配模式: {0}")]
    InvalidPattern(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("日志错误: {0}")]
    Logging(String),

    #[error("IO错误: {0}")]
    Io(String),
}

/// 统一的结果类型
pub type RunnerResult<T> = Result<T, RunnerError>;

impl RunnerError {
    /// 映射为对外错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            RunnerError::EngineCreation(_) => ErrorCode::ResourceUnavailable,
            RunnerError::EngineExecution(_) => ErrorCode::ExecutionError,
            RunnerError::InvalidPattern(_) => ErrorCode::InvalidInput,
            RunnerError::Config(_) => ErrorCode::InvalidConfig,
            RunnerError::Logging(_) | RunnerError::Io(_) => ErrorCode::InternalError,
        }
    }
}

// ==================== 外部错误转换实现 ====================

impl From<regex::Error> for RunnerError {
    fn from(err: regex::Error) -> Self {
        RunnerError::InvalidPattern(err.to_string())
    }
}

impl From<toml::de::Error> for RunnerError {
    fn from(err: toml::de::Error) -> Self {
        RunnerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RunnerError {
    fn from(err: toml::ser::Error) -> Self {
        RunnerError::Config(err.to_string())
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::Io(err.to_string())
    }
}

impl From<flexi_logger::FlexiLoggerError> for RunnerError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        RunnerError::Logging(err.to_string())
    }
}
