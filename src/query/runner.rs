//! 查询运行器
//!
//! 持有当前引擎实例，在失效事件到达时重建并替换它，把查询分派给分派时刻
//! 的当前实例，并把结果中可归因的错误交给报告器。结果本身原样返回给调用方。

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::Span;

use super::engine::{EngineFactory, EngineOptions, QueryEngine, QueryOptions};
use super::engine_handle::EngineHandle;
use super::stats::{RunnerStats, StatsCollector};
use crate::attribution::{CallerPattern, ErrorAttributor, ErrorParser, ErrorStructurer};
use crate::core::types::{ExecutionRequest, ExecutionResult, RawError};
use crate::core::RunnerResult;
use crate::event::EventTag;
use crate::reporter::Reporter;

/// 默认查询名
pub const DEFAULT_QUERY_NAME: &str = "build query";

/// 运行器选项
#[derive(Clone)]
pub struct RunnerOptions {
    /// 只作用于初始引擎，失效重建时使用默认引擎选项
    pub tracing_enabled: bool,
    pub query_name: String,
    pub parent_span: Option<Span>,
    pub caller_pattern: CallerPattern,
    /// 为空时使用内置的 `ErrorParser`
    pub structurer: Option<Arc<dyn ErrorStructurer>>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            tracing_enabled: false,
            query_name: DEFAULT_QUERY_NAME.to_string(),
            parent_span: None,
            caller_pattern: CallerPattern::default(),
            structurer: None,
        }
    }
}

impl std::fmt::Debug for RunnerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerOptions")
            .field("tracing_enabled", &self.tracing_enabled)
            .field("query_name", &self.query_name)
            .field("parent_span", &self.parent_span)
            .field("caller_pattern", &self.caller_pattern.as_str())
            .field("custom_structurer", &self.structurer.is_some())
            .finish()
    }
}

/// 查询运行器
pub struct QueryRunner<S, F: EngineFactory<S>> {
    state: Arc<S>,
    factory: F,
    reporter: Arc<dyn Reporter>,
    engine: EngineHandle<F::Engine>,
    /// 串行化“构建 + 替换”，保证同一时刻只有一个写者
    rebuild_lock: Mutex<()>,
    attributor: ErrorAttributor,
    query_name: String,
    parent_span: Option<Span>,
    stats: StatsCollector,
    /// 事件监听任务，运行器被丢弃时中止
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<S, F> QueryRunner<S, F>
where
    S: Send + Sync + 'static,
    F: EngineFactory<S> + 'static,
{
    /// 创建运行器并构建初始引擎，工厂失败时直接返回错误
    pub fn new(
        state: Arc<S>,
        factory: F,
        reporter: Arc<dyn Reporter>,
        options: RunnerOptions,
    ) -> RunnerResult<Arc<Self>> {
        let engine_options = EngineOptions {
            tracing_enabled: options.tracing_enabled,
        };
        let engine = factory.create(&state, &engine_options)?;

        let structurer: Arc<dyn ErrorStructurer> = match options.structurer {
            Some(structurer) => structurer,
            None => Arc::new(ErrorParser::new()?),
        };

        info!(
            "Query runner created: query_name={}, tracing={}, caller_pattern={}",
            options.query_name,
            options.tracing_enabled,
            options.caller_pattern.as_str()
        );

        Ok(Arc::new(Self {
            state,
            factory,
            reporter,
            engine: EngineHandle::new(engine),
            rebuild_lock: Mutex::new(()),
            attributor: ErrorAttributor::new(options.caller_pattern, structurer),
            query_name: options.query_name,
            parent_span: options.parent_span,
            stats: StatsCollector::new(),
            listener: Mutex::new(None),
        }))
    }

    /// 订阅事件总线
    ///
    /// 监听任务由运行器持有，运行器被丢弃或调用 `unsubscribe` 时中止；
    /// 重复订阅会替换之前的监听任务。必须在 tokio 运行时中调用。
    pub fn subscribe<E>(self: &Arc<Self>, mut receiver: broadcast::Receiver<E>)
    where
        E: EventTag + Clone + Send + 'static,
    {
        // 监听任务只持有弱引用，不延长运行器的生命周期
        let runner: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                let received = receiver.recv().await;
                let Some(runner) = runner.upgrade() else {
                    break;
                };
                match received {
                    Ok(event) => {
                        if let Err(e) = runner.handle_event(&event) {
                            error!("Engine rebuild failed, keeping previous engine: {}", e);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // 丢失的事件里可能有失效事件，保守地重建一次
                        warn!("Event listener lagged by {} events, rebuilding engine", skipped);
                        if let Err(e) = runner.invalidate() {
                            error!("Engine rebuild failed, keeping previous engine: {}", e);
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event bus closed, stopping invalidation listener");
                        break;
                    }
                }
            }
        });

        if let Some(previous) = self.listener.lock().replace(handle) {
            debug!("Replacing existing invalidation listener");
            previous.abort();
        }
    }

    /// 停止监听事件，之后只能通过 `invalidate` 手动重建
    pub fn unsubscribe(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
            debug!("Invalidation listener stopped");
        }
    }

    /// 监听任务是否仍在运行
    pub fn is_subscribed(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// 处理一条事件，返回是否发生了替换
    pub fn handle_event<E: EventTag>(&self, event: &E) -> RunnerResult<bool> {
        match event.invalidation() {
            Some(tag) => {
                debug!("Invalidation event received: {}", tag);
                self.invalidate()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 用默认引擎选项重建引擎并替换当前实例
    ///
    /// 已分派的查询继续在旧实例上执行。构建失败时当前实例保持不变。
    pub fn invalidate(&self) -> RunnerResult<()> {
        let _guard = self.rebuild_lock.lock();
        match self.factory.create(&self.state, &EngineOptions::default()) {
            Ok(engine) => {
                self.engine.replace(engine);
                self.stats.record_invalidation();
                debug!("Engine replaced: generation={}", self.engine.generation());
                Ok(())
            }
            Err(e) => {
                self.stats.record_failed_rebuild();
                Err(e)
            }
        }
    }

    /// 使用默认查询名与父 span 执行查询
    pub async fn query(&self, request: ExecutionRequest) -> RunnerResult<ExecutionResult> {
        self.query_with(request, &self.query_name, self.parent_span.clone())
            .await
    }

    /// 执行查询
    ///
    /// 引擎自身的错误原样返回；结果中的查询错误经归因后上报，结果不做修改。
    pub async fn query_with(
        &self,
        request: ExecutionRequest,
        query_name: &str,
        parent_span: Option<Span>,
    ) -> RunnerResult<ExecutionResult> {
        let engine = self.engine.current();
        self.stats.record_dispatch();

        let options = QueryOptions {
            query_name: query_name.to_string(),
            parent_span,
        };
        let result = match engine.execute(request, options).await {
            Ok(result) => result,
            Err(e) => {
                self.stats.record_failure();
                warn!("Query failed in engine: name={}, error={}", query_name, e);
                return Err(e);
            }
        };

        if result.has_errors() {
            self.report_errors(&result.errors);
        }
        Ok(result)
    }

    fn report_errors(&self, errors: &[RawError]) {
        self.stats.record_result_with_errors();
        let structured = self.attributor.process(errors);
        if structured.is_empty() {
            return;
        }
        self.stats.record_fatal_report(structured.len());
        self.reporter.panic_on_build(structured);
    }

    /// 当前引擎实例
    pub fn current_engine(&self) -> Arc<F::Engine> {
        self.engine.current()
    }

    /// 引擎被替换的次数
    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn attributor(&self) -> &ErrorAttributor {
        &self.attributor
    }

    pub fn stats(&self) -> RunnerStats {
        self.stats.snapshot()
    }
}

impl<S, F: EngineFactory<S>> Drop for QueryRunner<S, F> {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RunnerError;
    use crate::core::types::Context;
    use crate::event::InvalidationEvent;
    use crate::reporter::LogReporter;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TaggedEngine {
        id: usize,
        tracing_enabled: bool,
    }

    #[async_trait]
    impl QueryEngine for TaggedEngine {
        async fn execute(
            &self,
            request: ExecutionRequest,
            _options: QueryOptions,
        ) -> RunnerResult<ExecutionResult> {
            if request.query().body() == "explode" {
                return Err(RunnerError::EngineExecution("engine crashed".to_string()));
            }
            let mut data = Context::new();
            data.insert("engine".to_string(), json!(self.id));
            Ok(ExecutionResult::with_data(data))
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        created: AtomicUsize,
    }

    impl EngineFactory<()> for CountingFactory {
        type Engine = TaggedEngine;

        fn create(&self, _state: &Arc<()>, options: &EngineOptions) -> RunnerResult<TaggedEngine> {
            Ok(TaggedEngine {
                id: self.created.fetch_add(1, Ordering::SeqCst),
                tracing_enabled: options.tracing_enabled,
            })
        }
    }

    fn runner(options: RunnerOptions) -> Arc<QueryRunner<(), CountingFactory>> {
        QueryRunner::new(
            Arc::new(()),
            CountingFactory::default(),
            Arc::new(LogReporter::new()),
            options,
        )
        .expect("runner should build")
    }

    #[test]
    fn test_invalidation_drops_tracing_flag() {
        let runner = runner(RunnerOptions {
            tracing_enabled: true,
            ..RunnerOptions::default()
        });
        assert!(runner.current_engine().tracing_enabled);

        runner.invalidate().expect("rebuild should succeed");
        assert!(!runner.current_engine().tracing_enabled);
        assert_eq!(runner.current_engine().id, 1);
    }

    #[test]
    fn test_handle_event_ignores_unrelated_actions() {
        let runner = runner(RunnerOptions::default());
        assert!(!runner.handle_event(&"CREATE_PAGE").expect("event should be handled"));
        assert_eq!(runner.generation(), 0);

        assert!(runner
            .handle_event(&InvalidationEvent::DeleteCache)
            .expect("event should be handled"));
        assert_eq!(runner.generation(), 1);
        assert_eq!(runner.stats().invalidations, 1);
    }

    #[tokio::test]
    async fn test_engine_error_is_propagated() {
        let runner = runner(RunnerOptions::default());
        let result = runner
            .query(ExecutionRequest::new("explode", Context::new()))
            .await;
        assert!(matches!(result, Err(RunnerError::EngineExecution(_))));
        assert_eq!(runner.stats().queries_failed, 1);
    }

    #[tokio::test]
    async fn test_query_uses_current_engine() {
        let runner = runner(RunnerOptions::default());
        runner.invalidate().expect("rebuild should succeed");

        let result = runner
            .query(ExecutionRequest::new("{ site { id } }", Context::new()))
            .await
            .expect("query should succeed");
        assert_eq!(result.data.expect("data should be present")["engine"], json!(1));
    }
}
