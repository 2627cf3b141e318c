//! 调用栈解析
//!
//! 解析引擎捕获的 V8 风格调用栈文本，例如：
//!
//! ```text
//! Error: Cannot query field "foo" on type "Query"
//!     at graphql (/site/node_modules/query/index.js:12:9)
//!     at Object.createPages (/site/pages.js:10:4)
//!     at async Promise.all (index 0)
//! ```
//!
//! 解析是全函数：无法识别的行直接跳过，从不返回错误。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 调用栈中的一帧
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub function_name: String,
    pub file_name: String,
    pub line_number: u32,
    pub column_number: u32,
}

impl StackFrame {
    pub fn new(
        function_name: impl Into<String>,
        file_name: impl Into<String>,
        line_number: u32,
        column_number: u32,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            file_name: file_name.into(),
            line_number,
            column_number,
        }
    }
}

impl std::fmt::Display for StackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.function_name.is_empty() {
            write!(f, "{}:{}:{}", self.file_name, self.line_number, self.column_number)
        } else {
            write!(
                f,
                "{} ({}:{}:{})",
                self.function_name, self.file_name, self.line_number, self.column_number
            )
        }
    }
}

fn named_frame_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*at\s+(?:async\s+)?(?:new\s+)?(.+?)\s+\((.+)\)\s*$")
            .expect("named frame pattern is valid")
    })
}

fn bare_frame_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*at\s+(?:async\s+)?(\S.*?)\s*$").expect("bare frame pattern is valid")
    })
}

fn alias_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\[as [^\]]+\]$").expect("alias pattern is valid"))
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+):(\d+):(\d+)$").expect("location pattern is valid")
    })
}

/// 把 `file:line:column` 拆成三部分
///
/// `eval at ...` 形式的位置指向求值出的匿名代码，没有可用的文件，按缺少位置处理。
fn parse_location(location: &str) -> Option<(String, u32, u32)> {
    if location.trim_start().starts_with("eval at ") {
        return None;
    }
    let caps = location_regex().captures(location.trim())?;
    let file = caps.get(1)?.as_str();
    // 某些运行时会给本地路径加 file:// 前缀
    let file = file.strip_prefix("file://").unwrap_or(file);
    let line = caps.get(2)?.as_str().parse().ok()?;
    let column = caps.get(3)?.as_str().parse().ok()?;
    Some((file.to_string(), line, column))
}

/// 解析单行，非栈帧行或缺少位置信息的帧返回 `None`
pub fn parse_frame(line: &str) -> Option<StackFrame> {
    if let Some(caps) = named_frame_regex().captures(line) {
        // `Type.method [as alias]` 只保留实际函数名
        let function_name = alias_regex().replace(caps.get(1)?.as_str(), "");
        let (file_name, line_number, column_number) = parse_location(caps.get(2)?.as_str())?;
        return Some(StackFrame::new(function_name, file_name, line_number, column_number));
    }

    let caps = bare_frame_regex().captures(line)?;
    let (file_name, line_number, column_number) = parse_location(caps.get(1)?.as_str())?;
    Some(StackFrame::new("", file_name, line_number, column_number))
}

/// 解析整段调用栈，保持最内层在前的顺序
pub fn parse_stack(stack: &str) -> Vec<StackFrame> {
    stack.lines().filter_map(parse_frame).collect()
}
