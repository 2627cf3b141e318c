//! 请求与结果的数据模型

use serde::{Deserialize, Serialize};

use crate::attribution::StackFrame;

/// 查询上下文映射
pub type Context = serde_json::Map<String, serde_json::Value>;

/// 带名字的查询源，对应已经预处理过的查询文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySource {
    pub body: String,
    pub name: String,
    /// 查询在原文件中的起始位置（行, 列），从 1 开始
    pub location_offset: (u32, u32),
}

impl QuerySource {
    pub fn new(body: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            name: name.into(),
            location_offset: (1, 1),
        }
    }
}

/// 查询文本：原始字符串或查询源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryText {
    Text(String),
    Source(QuerySource),
}

impl QueryText {
    /// 查询正文
    pub fn body(&self) -> &str {
        match self {
            QueryText::Text(text) => text,
            QueryText::Source(source) => &source.body,
        }
    }
}

impl From<&str> for QueryText {
    fn from(text: &str) -> Self {
        QueryText::Text(text.to_string())
    }
}

impl From<String> for QueryText {
    fn from(text: String) -> Self {
        QueryText::Text(text)
    }
}

impl From<QuerySource> for QueryText {
    fn from(source: QuerySource) -> Self {
        QueryText::Source(source)
    }
}

/// 执行请求，构造后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    query: QueryText,
    context: Context,
}

impl ExecutionRequest {
    pub fn new(query: impl Into<QueryText>, context: Context) -> Self {
        Self {
            query: query.into(),
            context,
        }
    }

    pub fn query(&self) -> &QueryText {
        &self.query
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// 引擎返回的原始错误
///
/// `stack` 是引擎捕获的调用栈文本（最内层在前）；`provenance` 是引擎边界
/// 显式传递的调用位置，存在时优先于栈解析。
#[derive(Debug, Clone, PartialEq)]
pub struct RawError {
    pub message: String,
    pub stack: Option<String>,
    pub provenance: Option<StackFrame>,
}

impl RawError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            provenance: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_provenance(mut self, frame: StackFrame) -> Self {
        self.provenance = Some(frame);
        self
    }
}

impl std::fmt::Display for RawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// 执行结果，返回后不再修改
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionResult {
    pub data: Option<Context>,
    pub errors: Vec<RawError>,
}

impl ExecutionResult {
    pub fn with_data(data: Context) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(errors: Vec<RawError>) -> Self {
        Self { data: None, errors }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
