//! 查询执行门面
//!
//! - engine: 引擎与引擎工厂接口
//! - engine_handle: 当前引擎实例的可替换句柄
//! - runner: 失效驱动的查询运行器
//! - stats: 运行统计

pub mod engine;
pub mod engine_handle;
pub mod runner;
pub mod stats;

pub use engine::{EngineFactory, EngineOptions, QueryEngine, QueryOptions};
pub use engine_handle::EngineHandle;
pub use runner::{QueryRunner, RunnerOptions, DEFAULT_QUERY_NAME};
pub use stats::{RunnerStats, StatsCollector};
