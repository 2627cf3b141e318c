//! 查询错误的调用位置归因

pub mod attributor;
pub mod error_parser;
pub mod stack_trace;

pub use attributor::{CallerPattern, ErrorAttributor, DEFAULT_CALLER_PATTERN};
pub use error_parser::{ErrorInput, ErrorParser, ErrorStructurer, GENERIC_ERROR_ID};
pub use stack_trace::{parse_frame, parse_stack, StackFrame};
