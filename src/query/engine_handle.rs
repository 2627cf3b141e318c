//! 当前引擎实例的可替换句柄
//!
//! 锁只保护引用本身，从不保护引擎内部。读者克隆出 `Arc` 后立即释放锁，
//! 之后的执行与替换互不阻塞；被替换的实例在最后一个在途查询结束后释放。

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct EngineHandle<E> {
    current: RwLock<Arc<E>>,
    generation: AtomicU64,
}

impl<E> EngineHandle<E> {
    pub fn new(engine: E) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
            generation: AtomicU64::new(0),
        }
    }

    /// 当前实例
    pub fn current(&self) -> Arc<E> {
        Arc::clone(&self.current.read())
    }

    /// 安装新实例，返回被替换的实例
    pub fn replace(&self, engine: E) -> Arc<E> {
        let next = Arc::new(engine);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        self.generation.fetch_add(1, Ordering::SeqCst);
        previous
    }

    /// 已发生的替换次数
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_returns_previous() {
        let handle = EngineHandle::new("first");
        let first = handle.current();

        let previous = handle.replace("second");
        assert!(Arc::ptr_eq(&first, &previous));
        assert_eq!(*handle.current(), "second");
        assert_eq!(handle.generation(), 1);
    }

    #[test]
    fn test_old_instance_released_after_last_reader() {
        let handle = EngineHandle::new(String::from("old"));
        let in_flight = handle.current();
        let weak = Arc::downgrade(&in_flight);

        drop(handle.replace(String::from("new")));
        assert!(weak.upgrade().is_some());

        drop(in_flight);
        assert!(weak.upgrade().is_none());
    }
}
