use std::fmt::{self, Write};

use regex::Regex;
use serde_json::Number;

use super::ChartValue;

lazy_static::lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

/// Renders a value as a compact JavaScript literal.
///
/// Strings are single-quoted, object keys are bare when they are plain
/// identifiers, and [`ChartValue::Raw`] expressions are written unquoted. The
/// output only depends on the tree (including object key order), so it is
/// stable across calls and safe to sign.
pub fn stringify(value: &ChartValue) -> String {
    value.to_string()
}

impl fmt::Display for ChartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartValue::Null => f.write_str("null"),
            ChartValue::Bool(b) => write!(f, "{b}"),
            ChartValue::Number(n) => f.write_str(&number_literal(n)),
            ChartValue::String(s) => write_quoted(f, s),
            ChartValue::Raw(expression) => f.write_str(expression),
            ChartValue::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            ChartValue::Object(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_key(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if IDENTIFIER_REGEX.is_match(key) && !RESERVED_WORDS.contains(&key) {
        f.write_str(key)
    } else {
        write_quoted(f, key)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\u{8}' => f.write_str("\\b")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\u{c}' => f.write_str("\\f")?,
            '\r' => f.write_str("\\r")?,
            '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' | '\u{2028}' | '\u{2029}' | '\u{feff}' => {
                write!(f, "\\u{:04x}", c as u32)?
            }
            _ => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

fn number_literal(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), format_number)
    }
}

/// JavaScript number notation: `2.0` prints as `2`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 {
        format!("{n:e}")
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
