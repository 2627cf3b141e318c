//! 失效事件

use serde::{Deserialize, Serialize};

/// 会让当前引擎实例过期的状态变更
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidationEvent {
    DeleteCache,
    CreateNode,
    DeleteNode,
    DeleteNodes,
    SetSchemaComposer,
    SetSchema,
    AddFieldToNode,
    AddChildNodeToParentNode,
}

impl InvalidationEvent {
    /// 所有失效事件
    pub const ALL: [InvalidationEvent; 8] = [
        InvalidationEvent::DeleteCache,
        InvalidationEvent::CreateNode,
        InvalidationEvent::DeleteNode,
        InvalidationEvent::DeleteNodes,
        InvalidationEvent::SetSchemaComposer,
        InvalidationEvent::SetSchema,
        InvalidationEvent::AddFieldToNode,
        InvalidationEvent::AddChildNodeToParentNode,
    ];

    /// 对应的动作类型名
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidationEvent::DeleteCache => "DELETE_CACHE",
            InvalidationEvent::CreateNode => "CREATE_NODE",
            InvalidationEvent::DeleteNode => "DELETE_NODE",
            InvalidationEvent::DeleteNodes => "DELETE_NODES",
            InvalidationEvent::SetSchemaComposer => "SET_SCHEMA_COMPOSER",
            InvalidationEvent::SetSchema => "SET_SCHEMA",
            InvalidationEvent::AddFieldToNode => "ADD_FIELD_TO_NODE",
            InvalidationEvent::AddChildNodeToParentNode => "ADD_CHILD_NODE_TO_PARENT_NODE",
        }
    }

    /// 从动作类型名解析，未知名字返回 `None`
    pub fn parse(action_type: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == action_type)
    }
}

impl std::fmt::Display for InvalidationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 事件总线上的消息，能判断自己是否是失效事件
pub trait EventTag {
    fn invalidation(&self) -> Option<InvalidationEvent>;
}

impl EventTag for InvalidationEvent {
    fn invalidation(&self) -> Option<InvalidationEvent> {
        Some(*self)
    }
}

impl EventTag for String {
    fn invalidation(&self) -> Option<InvalidationEvent> {
        InvalidationEvent::parse(self)
    }
}

impl EventTag for &'static str {
    fn invalidation(&self) -> Option<InvalidationEvent> {
        InvalidationEvent::parse(self)
    }
}
