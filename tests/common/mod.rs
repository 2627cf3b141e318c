//! 集成测试共享工具模块
//!
//! 提供带身份标记的假引擎、可阻塞的引擎以及记录型报告器

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use graphrunner::core::error::StructuredError;
use graphrunner::{
    Context, EngineFactory, EngineOptions, ExecutionRequest, ExecutionResult, QueryEngine,
    QueryOptions, RawError, Reporter, RunnerError, RunnerResult,
};

/// 测试用数据图状态：引擎执行时返回其中预设的错误
#[derive(Debug, Default)]
pub struct FakeGraph {
    pub errors: Vec<RawError>,
}

impl FakeGraph {
    pub fn with_errors(errors: Vec<RawError>) -> Arc<Self> {
        Arc::new(Self { errors })
    }
}

/// 阻塞点：`started` 表示查询已进入引擎，`release` 放行
#[derive(Debug, Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

/// 输出带有自身编号的假引擎
pub struct TaggedEngine {
    pub id: usize,
    pub tracing_enabled: bool,
    graph: Arc<FakeGraph>,
    gate: Option<Arc<Gate>>,
}

#[async_trait]
impl QueryEngine for TaggedEngine {
    async fn execute(
        &self,
        request: ExecutionRequest,
        options: QueryOptions,
    ) -> RunnerResult<ExecutionResult> {
        if request.query().body() == "wait" {
            if let Some(gate) = &self.gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }
        }

        let mut data = Context::new();
        data.insert("engine".to_string(), json!(self.id));
        data.insert("queryName".to_string(), json!(options.query_name));
        Ok(ExecutionResult {
            data: Some(data),
            errors: self.graph.errors.clone(),
        })
    }
}

/// 按顺序编号的引擎工厂，可切换为失败模式
#[derive(Default)]
pub struct TaggedFactory {
    created: AtomicUsize,
    failing: AtomicBool,
    gate: Option<Arc<Gate>>,
}

impl TaggedFactory {
    pub fn gated(gate: Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl EngineFactory<FakeGraph> for TaggedFactory {
    type Engine = TaggedEngine;

    fn create(&self, state: &Arc<FakeGraph>, options: &EngineOptions) -> RunnerResult<TaggedEngine> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RunnerError::EngineCreation("schema is being rebuilt".to_string()));
        }
        Ok(TaggedEngine {
            id: self.created.fetch_add(1, Ordering::SeqCst),
            tracing_enabled: options.tracing_enabled,
            graph: Arc::clone(state),
            gate: self.gate.clone(),
        })
    }
}

/// 记录每次致命报告的报告器
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Vec<StructuredError>>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<Vec<StructuredError>> {
        self.reports.lock().clone()
    }
}

impl Reporter for RecordingReporter {
    fn panic_on_build(&self, errors: Vec<StructuredError>) {
        self.reports.lock().push(errors);
    }
}

/// 带有用户建页函数帧的调用栈
pub fn caller_stack(file: &str, line: u32, column: u32) -> String {
    format!(
        "Error: query failed\n    at resolveField (/site/node_modules/engine/execute.js:120:11)\n    at Object.createPages ({}:{}:{})\n    at runAPI (/site/node_modules/api-runner-node.js:140:20)",
        file, line, column
    )
}

/// 不含调用者帧的调用栈
pub fn foreign_stack() -> String {
    "Error: query failed\n    at resolveField (/site/node_modules/engine/execute.js:120:11)\n    at sourceNodes (/site/gatsby-node.js:5:2)".to_string()
}

/// 轮询直到条件成立，超时返回 false
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
