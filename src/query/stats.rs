//! 运行器统计

use std::sync::atomic::{AtomicU64, Ordering};

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub queries_dispatched: u64,
    /// 引擎以 `Err` 结束的查询
    pub queries_failed: u64,
    pub results_with_errors: u64,
    pub attributed_errors: u64,
    pub fatal_reports: u64,
    pub invalidations: u64,
    pub failed_rebuilds: u64,
}

#[derive(Debug, Default)]
pub struct StatsCollector {
    queries_dispatched: AtomicU64,
    queries_failed: AtomicU64,
    results_with_errors: AtomicU64,
    attributed_errors: AtomicU64,
    fatal_reports: AtomicU64,
    invalidations: AtomicU64,
    failed_rebuilds: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatch(&self) {
        self.queries_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_result_with_errors(&self) {
        self.results_with_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次致命报告及其包含的诊断数
    pub fn record_fatal_report(&self, attributed: usize) {
        self.attributed_errors
            .fetch_add(attributed as u64, Ordering::Relaxed);
        self.fatal_reports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_rebuild(&self) {
        self.failed_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunnerStats {
        RunnerStats {
            queries_dispatched: self.queries_dispatched.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            results_with_errors: self.results_with_errors.load(Ordering::Relaxed),
            attributed_errors: self.attributed_errors.load(Ordering::Relaxed),
            fatal_reports: self.fatal_reports.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            failed_rebuilds: self.failed_rebuilds.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let stats = StatsCollector::new();
        stats.record_dispatch();
        stats.record_dispatch();
        stats.record_result_with_errors();
        stats.record_fatal_report(3);
        stats.record_invalidation();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.queries_dispatched, 2);
        assert_eq!(snapshot.results_with_errors, 1);
        assert_eq!(snapshot.attributed_errors, 3);
        assert_eq!(snapshot.fatal_reports, 1);
        assert_eq!(snapshot.invalidations, 1);
        assert_eq!(snapshot.failed_rebuilds, 0);
    }
}
