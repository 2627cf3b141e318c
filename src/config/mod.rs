use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::attribution::{CallerPattern, DEFAULT_CALLER_PATTERN};
use crate::core::RunnerResult;
use crate::event::{EventBus, DEFAULT_EVENT_BUFFER};
use crate::query::{RunnerOptions, DEFAULT_QUERY_NAME};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub runner: RunnerConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

/// 查询运行器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub query_name: String,
    /// 识别发起查询的用户函数名的正则
    pub caller_pattern: String,
    pub tracing_enabled: bool,
    /// 事件总线容量
    pub event_buffer: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphrunner".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            query_name: DEFAULT_QUERY_NAME.to_string(),
            caller_pattern: DEFAULT_CALLER_PATTERN.to_string(),
            tracing_enabled: false,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl RunnerConfig {
    /// 转换为运行器选项，调用者模式无效时返回错误
    pub fn to_options(&self) -> RunnerResult<RunnerOptions> {
        Ok(RunnerOptions {
            tracing_enabled: self.tracing_enabled,
            query_name: self.query_name.clone(),
            caller_pattern: CallerPattern::new(&self.caller_pattern)?,
            ..RunnerOptions::default()
        })
    }

    /// 按配置的容量创建事件总线
    pub fn event_bus<E: Clone>(&self) -> EventBus<E> {
        EventBus::new(self.event_buffer)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> RunnerResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> RunnerResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
