//! 错误归因
//!
//! 把查询结果中的原始错误还原到发起查询的用户调用位置。只有能找到调用位置的
//! 错误才会产出结构化诊断，其余错误留给更通用的错误报告路径处理。

use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

use super::error_parser::{ErrorInput, ErrorParser, ErrorStructurer};
use super::stack_trace::{parse_stack, StackFrame};
use crate::core::error::{ErrorLocation, StructuredError, FROM_QUERY_CALL};
use crate::core::types::RawError;
use crate::core::RunnerResult;

/// 默认的调用者函数名模式：用户编写的建页函数
pub const DEFAULT_CALLER_PATTERN: &str = "createPages";

/// 识别发起查询的调用者帧
#[derive(Debug, Clone)]
pub struct CallerPattern {
    regex: Regex,
}

impl CallerPattern {
    pub fn new(pattern: &str) -> RunnerResult<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, frame: &StackFrame) -> bool {
        self.regex.is_match(&frame.function_name)
    }
}

impl Default for CallerPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_CALLER_PATTERN).expect("default caller pattern is valid"),
        }
    }
}

/// 错误归因器
///
/// 不持有可变状态，`process` 只读输入并产出新的诊断。
#[derive(Clone)]
pub struct ErrorAttributor {
    pattern: CallerPattern,
    structurer: Arc<dyn ErrorStructurer>,
}

impl ErrorAttributor {
    pub fn new(pattern: CallerPattern, structurer: Arc<dyn ErrorStructurer>) -> Self {
        Self { pattern, structurer }
    }

    /// 使用默认模式与内置错误解析器
    pub fn with_defaults() -> RunnerResult<Self> {
        Ok(Self::new(CallerPattern::default(), Arc::new(ErrorParser::new()?)))
    }

    pub fn pattern(&self) -> &CallerPattern {
        &self.pattern
    }

    /// 找到错误的调用位置
    ///
    /// 显式传递的调用位置优先；否则解析调用栈，取第一个匹配调用者模式的帧。
    pub fn locate(&self, error: &RawError) -> Option<StackFrame> {
        if let Some(frame) = &error.provenance {
            return Some(frame.clone());
        }
        let stack = error.stack.as_deref()?;
        parse_stack(stack)
            .into_iter()
            .find(|frame| self.pattern.matches(frame))
    }

    /// 归因单个错误，无法归因时返回 `None`
    pub fn attribute(&self, error: &RawError) -> Option<StructuredError> {
        let frame = self.locate(error)?;
        let location = ErrorLocation::at(frame.line_number, frame.column_number);

        let mut structured = self.structurer.structure(ErrorInput {
            message: error.message.clone(),
            location: Some(location),
            file_path: Some(frame.file_name.clone()),
        });
        structured.message = error.message.clone();
        structured.location = Some(location);
        structured.file_path = Some(frame.file_name);
        structured
            .context
            .insert(FROM_QUERY_CALL.to_string(), Value::Bool(true));
        Some(structured)
    }

    /// 归因一组错误，保持原有顺序并跳过无法归因的错误
    pub fn process(&self, errors: &[RawError]) -> Vec<StructuredError> {
        let structured: Vec<StructuredError> =
            errors.iter().filter_map(|error| self.attribute(error)).collect();
        debug!(
            "Attributed {} of {} query errors to a caller",
            structured.len(),
            errors.len()
        );
        structured
    }
}

impl std::fmt::Debug for ErrorAttributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorAttributor")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}
