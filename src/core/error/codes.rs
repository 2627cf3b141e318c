//! 对外错误码定义
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (02=执行, 03=验证, 05=资源, 09=系统)
//! - YY: 具体错误

use serde::{Deserialize, Serialize};

/// 对外错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // ==================== 执行错误 (02xx) ====================
    /// 通用执行错误
    ExecutionError = 200,

    // ==================== 验证错误 (03xx) ====================
    /// 无效输入
    InvalidInput = 302,
    /// 配置错误
    InvalidConfig = 304,

    // ==================== 资源错误 (05xx) ====================
    /// 资源不可用
    ResourceUnavailable = 502,

    // ==================== 系统错误 (09xx) ====================
    /// 内部错误
    InternalError = 900,
}

/// 错误码类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeCategory {
    Execution,
    Validation,
    Resource,
    System,
}

impl ErrorCode {
    /// 获取错误码的 i32 值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 获取错误类别
    pub fn category(&self) -> CodeCategory {
        match self.as_i32() {
            200..=299 => CodeCategory::Execution,
            300..=399 => CodeCategory::Validation,
            500..=599 => CodeCategory::Resource,
            _ => CodeCategory::System,
        }
    }

    /// 获取默认的错误消息
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ExecutionError => "执行错误",
            ErrorCode::InvalidInput => "无效输入",
            ErrorCode::InvalidConfig => "配置错误",
            ErrorCode::ResourceUnavailable => "资源不可用",
            ErrorCode::InternalError => "内部错误",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.default_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::ExecutionError.category(), CodeCategory::Execution);
        assert_eq!(ErrorCode::InvalidConfig.category(), CodeCategory::Validation);
        assert_eq!(ErrorCode::ResourceUnavailable.category(), CodeCategory::Resource);
        assert_eq!(ErrorCode::InternalError.category(), CodeCategory::System);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidInput.to_string(), "302 (无效输入)");
    }
}
