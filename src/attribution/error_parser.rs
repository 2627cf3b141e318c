//! 错误结构化服务
//!
//! 根据消息文本把查询错误归入错误目录，补全编号、分类与上下文。
//! 位置与文件路径只在调用方提供时写入。

use regex::{Captures, Regex};
use serde_json::json;

use crate::core::error::{ErrorCategory, ErrorLocation, StructuredError};
use crate::core::types::Context;
use crate::core::RunnerResult;

/// 结构化服务的输入
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInput {
    pub message: String,
    pub location: Option<ErrorLocation>,
    pub file_path: Option<String>,
}

impl ErrorInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            file_path: None,
        }
    }
}

/// 把原始消息整理成结构化错误
pub trait ErrorStructurer: Send + Sync {
    fn structure(&self, input: ErrorInput) -> StructuredError;
}

type ContextBuilder = fn(&Captures<'_>) -> Context;

struct Handler {
    regex: Regex,
    id: &'static str,
    category: ErrorCategory,
    context: ContextBuilder,
}

fn field_and_type(caps: &Captures<'_>) -> Context {
    let mut context = Context::new();
    context.insert("field".to_string(), json!(&caps[1]));
    context.insert("type".to_string(), json!(&caps[2]));
    context
}

fn type_only(caps: &Captures<'_>) -> Context {
    let mut context = Context::new();
    context.insert("type".to_string(), json!(&caps[1]));
    context
}

fn empty_context(_: &Captures<'_>) -> Context {
    Context::new()
}

/// 默认的基于正则的错误解析器
///
/// 处理器按顺序尝试，第一个命中的决定编号；都不命中时落到通用编号。
pub struct ErrorParser {
    handlers: Vec<Handler>,
}

/// 通用兜底编号
pub const GENERIC_ERROR_ID: &str = "85901";

impl ErrorParser {
    pub fn new() -> RunnerResult<Self> {
        let handlers = vec![
            Handler {
                regex: Regex::new(r#"Cannot query field "(.+?)" on type "(.+?)""#)?,
                id: "85923",
                category: ErrorCategory::User,
                context: field_and_type,
            },
            Handler {
                regex: Regex::new(r#""(.+?)" is not defined by type "?([^\s".]+)"?"#)?,
                id: "85922",
                category: ErrorCategory::User,
                context: field_and_type,
            },
            Handler {
                regex: Regex::new(r#"Unknown type "(.+?)""#)?,
                id: "85920",
                category: ErrorCategory::User,
                context: type_only,
            },
            Handler {
                regex: Regex::new(r"^Syntax Error: ")?,
                id: "85921",
                category: ErrorCategory::User,
                context: empty_context,
            },
        ];
        Ok(Self { handlers })
    }

    fn classify(&self, message: &str) -> (&'static str, ErrorCategory, Context) {
        for handler in &self.handlers {
            if let Some(caps) = handler.regex.captures(message) {
                return (handler.id, handler.category, (handler.context)(&caps));
            }
        }
        (GENERIC_ERROR_ID, ErrorCategory::Unknown, Context::new())
    }
}

impl ErrorStructurer for ErrorParser {
    fn structure(&self, input: ErrorInput) -> StructuredError {
        let (id, category, mut context) = self.classify(&input.message);
        context.insert("sourceMessage".to_string(), json!(&input.message));

        StructuredError {
            id: Some(id.to_string()),
            message: input.message,
            location: input.location,
            file_path: input.file_path,
            category,
            context,
        }
    }
}
