use crate::error::{ErrorKind, Result};
use crate::table::write_table;
use exn::ResultExt;
use serde_json::Value;
use std::io::Write;

const INDENT: &str = "  ";

/// Short type name of a JSON value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

// Strings are deliberately treated as scalars.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(entries) => Some(entries.len()),
        _ => None,
    }
}

/// Print an indented outline of `value`.
///
/// Each object entry gets a line `key (type)`, or `key (type, len=n)` for
/// nested objects and arrays. Arrays are assumed homogeneous: only their first
/// element is described, one level deeper, and the array itself gets no line
/// of its own. Scalars reached by recursion print their type name.
///
/// `max_depth` limits how many levels are printed; `None` walks everything.
pub fn print_tree(value: &Value, max_depth: Option<usize>, writer: &mut impl Write) -> Result<()> {
    print_level(value, max_depth, 0, writer)
}

fn print_level(value: &Value, max_depth: Option<usize>, depth: usize, writer: &mut impl Write) -> Result<()> {
    let prefix = INDENT.repeat(depth);
    let descend = max_depth.is_none_or(|max| depth + 1 < max);
    match value {
        Value::Object(entries) => {
            for (key, child) in entries {
                let line = match length(child) {
                    Some(len) => format!("{prefix}{key} ({}, len={len})", type_name(child)),
                    None => format!("{prefix}{key} ({})", type_name(child)),
                };
                writeln!(writer, "{line}").or_raise(|| ErrorKind::Io)?;
                if descend {
                    print_level(child, max_depth, depth + 1, writer)?;
                }
            }
        },
        Value::Array(items) => {
            if let Some(first) = items.first()
                && descend
            {
                print_level(first, max_depth, depth + 1, writer)?;
            }
        },
        scalar => writeln!(writer, "{prefix}{}", type_name(scalar)).or_raise(|| ErrorKind::Io)?,
    }
    Ok(())
}

/// One row of a top-level key summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySummary {
    pub key_name: String,
    pub data_type: &'static str,
    /// Entries of an object or array, 0 for scalars (including strings).
    pub length: usize,
}

/// Summarize the top-level keys of `value`.
///
/// For an array, the keys of its first element are summarized instead (when
/// that element is an object). Anything else has no keys to summarize.
pub fn summarize(value: &Value) -> Vec<KeySummary> {
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Array(items) => match items.first() {
            Some(Value::Object(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    entries
        .iter()
        .map(|(key, child)| KeySummary {
            key_name: key.clone(),
            data_type: type_name(child),
            length: length(child).unwrap_or(0),
        })
        .collect()
}

/// Write a key summary as a `KEY_NAME  DATA_TYPE  LENGTH` table.
pub fn write_summary(rows: &[KeySummary], writer: &mut impl Write) -> Result<()> {
    let rows: Vec<[String; 3]> = rows
        .iter()
        .map(|row| [row.key_name.clone(), row.data_type.to_string(), row.length.to_string()])
        .collect();
    write_table(writer, ["KEY_NAME", "DATA_TYPE", "LENGTH"], &rows)
}
