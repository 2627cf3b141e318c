//! 事件总线
//!
//! 对 `tokio::sync::broadcast` 的薄封装。每个订阅者按发送顺序收到每条消息，
//! 订阅者处理过慢时会收到 `Lagged`，由订阅方决定如何补偿。

use tokio::sync::broadcast;

/// 默认通道容量
pub const DEFAULT_EVENT_BUFFER: usize = 1024;

pub struct EventBus<E: Clone> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 发送事件，返回收到该事件的订阅者数量
    pub fn emit(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

impl<E: Clone> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
