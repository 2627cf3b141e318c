//! 失效事件与事件总线

pub mod bus;
pub mod invalidation;

pub use bus::{EventBus, DEFAULT_EVENT_BUFFER};
pub use invalidation::{EventTag, InvalidationEvent};
