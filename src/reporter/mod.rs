//! 构建报告器
//!
//! 报告器接收归因后的结构化诊断，调用 `panic_on_build` 即表示本次构建失败。

use log::error;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::error::StructuredError;

/// 构建报告器
pub trait Reporter: Send + Sync {
    /// 以致命错误结束构建，返回值不被使用
    fn panic_on_build(&self, errors: Vec<StructuredError>);
}

/// 基于日志的默认报告器
///
/// 把每个诊断写入错误日志并记录下来；是否退出进程由宿主构建决定。
#[derive(Debug, Default)]
pub struct LogReporter {
    fatal: AtomicBool,
    reported: Mutex<Vec<StructuredError>>,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否已经报告过致命错误
    pub fn is_fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }

    /// 已报告的诊断
    pub fn reported(&self) -> Vec<StructuredError> {
        self.reported.lock().clone()
    }
}

impl Reporter for LogReporter {
    fn panic_on_build(&self, errors: Vec<StructuredError>) {
        for e in &errors {
            match (&e.file_path, &e.location) {
                (Some(file), Some(location)) => error!(
                    "[{}] {} ({}:{}:{})",
                    e.id.as_deref().unwrap_or("-"),
                    e.message,
                    file,
                    location.start.line,
                    location.start.column
                ),
                _ => error!("[{}] {}", e.id.as_deref().unwrap_or("-"), e.message),
            }
        }
        self.fatal.store(true, Ordering::SeqCst);
        self.reported.lock().extend(errors);
    }
}
