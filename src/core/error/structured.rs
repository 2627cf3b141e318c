//! 结构化诊断
//!
//! 交给构建报告器的错误形态：消息、可选的源码位置与文件、分类以及上下文。

use serde::{Deserialize, Serialize};

use crate::core::types::Context;

/// 归因成功时写入上下文的标记键
pub const FROM_QUERY_CALL: &str = "fromQueryCall";

/// 源码中的行列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// 错误位置，目前只记录起点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub start: Position,
}

impl ErrorLocation {
    pub fn at(line: u32, column: u32) -> Self {
        Self {
            start: Position { line, column },
        }
    }
}

/// 诊断分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// 用户代码导致的错误
    User,
    /// 第三方插件导致的错误
    ThirdParty,
    /// 系统内部错误
    System,
    #[default]
    Unknown,
}

/// 结构化错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredError {
    /// 错误目录中的编号，由结构化服务填写
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ErrorLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub category: ErrorCategory,
    #[serde(default)]
    pub context: Context,
}

impl StructuredError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: None,
            message: message.into(),
            location: None,
            file_path: None,
            category: ErrorCategory::Unknown,
            context: Context::new(),
        }
    }

    /// 是否来自一次可归因的查询调用
    pub fn is_from_query_call(&self) -> bool {
        self.context
            .get(FROM_QUERY_CALL)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_error_serialization() {
        let mut error = StructuredError::new("Cannot query field");
        error.location = Some(ErrorLocation::at(10, 4));
        error.file_path = Some("pages.js".to_string());
        error.category = ErrorCategory::User;
        error.context.insert(FROM_QUERY_CALL.to_string(), json!(true));

        let value = serde_json::to_value(&error).expect("serialization should succeed");
        assert_eq!(value["filePath"], json!("pages.js"));
        assert_eq!(value["location"]["start"]["line"], json!(10));
        assert_eq!(value["location"]["start"]["column"], json!(4));
        assert_eq!(value["category"], json!("USER"));
        assert_eq!(value["context"]["fromQueryCall"], json!(true));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(serde_json::to_value(ErrorCategory::ThirdParty).ok(), Some(json!("THIRD_PARTY")));
        assert_eq!(serde_json::to_value(ErrorCategory::Unknown).ok(), Some(json!("UNKNOWN")));
        let parsed: ErrorCategory =
            serde_json::from_value(json!("THIRD_PARTY")).expect("category should parse");
        assert_eq!(parsed, ErrorCategory::ThirdParty);
    }

    #[test]
    fn test_is_from_query_call() {
        let mut error = StructuredError::new("boom");
        assert!(!error.is_from_query_call());
        error.context.insert(FROM_QUERY_CALL.to_string(), json!(true));
        assert!(error.is_from_query_call());
    }
}
