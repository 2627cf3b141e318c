//! 查询引擎与引擎工厂接口
//!
//! 引擎本身（Schema 编译、解析器执行）在本 crate 之外实现，这里只定义边界。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Span;

use crate::core::types::{ExecutionRequest, ExecutionResult};
use crate::core::RunnerResult;

/// 引擎构建选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub tracing_enabled: bool,
}

/// 单次查询的执行选项
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub query_name: String,
    pub parent_span: Option<Span>,
}

impl QueryOptions {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            parent_span: None,
        }
    }
}

/// 绑定到某个数据图状态的查询引擎实例
///
/// 实例可以被丢弃和重建；执行结果中的查询错误作为数据返回，
/// 只有引擎自身的异常才以 `Err` 返回。
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn execute(
        &self,
        request: ExecutionRequest,
        options: QueryOptions,
    ) -> RunnerResult<ExecutionResult>;
}

/// 引擎工厂，必须可以反复构建
pub trait EngineFactory<S>: Send + Sync {
    type Engine: QueryEngine + 'static;

    fn create(&self, state: &Arc<S>, options: &EngineOptions) -> RunnerResult<Self::Engine>;
}

impl<S, E, F> EngineFactory<S> for F
where
    F: Fn(&Arc<S>, &EngineOptions) -> RunnerResult<E> + Send + Sync,
    E: QueryEngine + 'static,
{
    type Engine = E;

    fn create(&self, state: &Arc<S>, options: &EngineOptions) -> RunnerResult<E> {
        self(state, options)
    }
}
