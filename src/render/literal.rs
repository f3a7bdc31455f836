//! Type-aware rendering of column defaults.

use crate::ddl::{ColumnDefault, ColumnType, DefaultLiteral};
use crate::render::{render_column_type, render_element_type};
use chrono::{DateTime, NaiveDateTime, Timelike};

const DEFAULT_TIMESTAMP_PRECISION: u32 = 6;

pub fn render_default(default: &ColumnDefault, column_type: &ColumnType) -> String {
    match default {
        ColumnDefault::Expression(sql) => sql.trim().to_string(),
        ColumnDefault::Literal(literal) => render_literal(literal, column_type),
    }
}

fn render_literal(literal: &DefaultLiteral, column_type: &ColumnType) -> String {
    if let DefaultLiteral::Array(items) = literal {
        let element = ColumnType {
            dimensions: 0,
            array_size: None,
            ..column_type.clone()
        };
        let body = render_array_body(items, &element);
        let cast = ColumnType {
            dimensions: column_type.dimensions.max(1),
            array_size: None,
            ..column_type.clone()
        };
        return format!("{}::{}", escape_literal(&body), render_column_type(&cast));
    }

    match literal {
        DefaultLiteral::Null => "NULL".to_string(),
        DefaultLiteral::Boolean(b) => b.to_string(),
        DefaultLiteral::Number(n) => n.trim().to_string(),
        DefaultLiteral::String(s) if column_type.is_user_defined() => {
            format!("{}::{}", escape_literal(s), render_element_type(column_type))
        }
        DefaultLiteral::String(s) if column_type.is_timestamp() => {
            escape_literal(&format_timestamp(s, column_type))
        }
        DefaultLiteral::String(s) => escape_literal(s),
        DefaultLiteral::Json(value) if column_type.is_json() => {
            format!("{}::{}", escape_literal(&value.to_string()), column_type.base_name())
        }
        DefaultLiteral::Json(value) => escape_literal(&value.to_string()),
        DefaultLiteral::Array(_) => unreachable!("arrays are rendered above"),
    }
}

/// Single-quoted SQL string; switches to the `e'...'` form when the text holds
/// backslashes or control characters.
pub fn escape_literal(s: &str) -> String {
    if !s.chars().any(|c| c == '\\' || c.is_control()) {
        return format!("'{}'", s.replace('\'', "''"));
    }

    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("e'");
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Array literal body, `{1,2,3}` or `{"a b",NULL}`, without the outer quotes.
fn render_array_body(items: &[DefaultLiteral], element: &ColumnType) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item {
            DefaultLiteral::Null => "NULL".to_string(),
            DefaultLiteral::Boolean(b) => b.to_string(),
            DefaultLiteral::Number(n) => n.trim().to_string(),
            DefaultLiteral::String(s) if element.is_timestamp() => {
                quote_array_element(&format_timestamp(s, element))
            }
            DefaultLiteral::String(s) => quote_array_element(s),
            DefaultLiteral::Json(v) => quote_array_element(&v.to_string()),
            DefaultLiteral::Array(nested) => render_array_body(nested, element),
        })
        .collect();
    format!("{{{}}}", parts.join(","))
}

fn quote_array_element(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.eq_ignore_ascii_case("null")
        || s
            .chars()
            .any(|c| matches!(c, ',' | '"' | '\\' | '{' | '}') || c.is_whitespace());
    if !needs_quotes {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Re-renders a timestamp with exactly the column's fractional-second precision.
/// Unparseable input is returned unchanged.
pub fn format_timestamp(value: &str, column_type: &ColumnType) -> String {
    let precision = column_type
        .precision()
        .unwrap_or(DEFAULT_TIMESTAMP_PRECISION)
        .min(DEFAULT_TIMESTAMP_PRECISION) as usize;
    let value = value.trim();

    if column_type.base_name() == "timestamptz" {
        let parsed = DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z"));
        if let Ok(dt) = parsed {
            return format!(
                "{}{}{}",
                dt.format("%Y-%m-%d %H:%M:%S"),
                fraction(dt.nanosecond(), precision),
                dt.format("%:z")
            );
        }
    }

    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.naive_utc()));
    match parsed {
        Ok(dt) => format!(
            "{}{}",
            dt.format("%Y-%m-%d %H:%M:%S"),
            fraction(dt.nanosecond(), precision)
        ),
        Err(_) => value.to_string(),
    }
}

fn fraction(nanos: u32, precision: usize) -> String {
    if precision == 0 {
        return String::new();
    }
    let digits = format!("{:09}", nanos.min(999_999_999));
    format!(".{}", &digits[..precision])
}
