//! JSON text output

use std::fmt;

use crate::number;
use crate::value::{Array, Object, Value};

/// Configuration options for formatting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level (0 renders compact JSON)
    pub indent_spaces: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_spaces: 2 }
    }
}

impl FormatConfig {
    /// Single-line output with no whitespace
    pub const fn compact() -> Self {
        Self { indent_spaces: 0 }
    }

    pub const fn with_indent(indent_spaces: usize) -> Self {
        Self { indent_spaces }
    }
}

/// Writes values as JSON text
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter {
    config: FormatConfig,
}

impl JsonFormatter {
    pub const fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    /// Render `value` to a new string
    pub fn format(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(&mut out, value, 0);
        out
    }

    fn write_value(&self, out: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Number(n) => out.push_str(&number::format(*n)),
            Value::String(s) => write_string(out, s),
            Value::Array(arr) => self.write_array(out, arr, depth),
            Value::Object(obj) => self.write_object(out, obj, depth),
        }
    }

    fn write_array(&self, out: &mut String, arr: &Array, depth: usize) {
        if arr.is_empty() {
            out.push_str("[]");
            return;
        }

        out.push('[');
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, depth + 1);
            self.write_value(out, item, depth + 1);
        }
        self.newline(out, depth);
        out.push(']');
    }

    fn write_object(&self, out: &mut String, obj: &Object, depth: usize) {
        if obj.is_empty() {
            out.push_str("{}");
            return;
        }

        out.push('{');
        for (i, (key, item)) in obj.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, depth + 1);
            write_string(out, key);
            out.push(':');
            if self.config.indent_spaces > 0 {
                out.push(' ');
            }
            self.write_value(out, item, depth + 1);
        }
        self.newline(out, depth);
        out.push('}');
    }

    fn newline(&self, out: &mut String, depth: usize) {
        if self.config.indent_spaces == 0 {
            return;
        }
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(depth * self.config.indent_spaces));
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Pretty JSON with 2-space indentation
pub fn to_string_pretty(value: &Value) -> String {
    JsonFormatter::default().format(value)
}

/// JSON with the given formatting options
pub fn to_string_with_config(value: &Value, config: FormatConfig) -> String {
    JsonFormatter::new(config).format(value)
}

impl fmt::Display for Value {
    /// Compact JSON
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&JsonFormatter::new(FormatConfig::compact()).format(self))
    }
}
