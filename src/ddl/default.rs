//! Column defaults and their value-level comparison.

use serde::{Deserialize, Serialize};

/// A literal default value, rendered according to the column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DefaultLiteral {
    Null,
    Boolean(bool),
    /// Kept as text so precision survives a round trip.
    Number(String),
    String(String),
    Json(serde_json::Value),
    Array(Vec<DefaultLiteral>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnDefault {
    /// Raw SQL, emitted verbatim (`now()`, `gen_random_uuid()`).
    Expression(String),
    Literal(DefaultLiteral),
}

impl ColumnDefault {
    pub fn expression(sql: impl Into<String>) -> Self {
        ColumnDefault::Expression(sql.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        ColumnDefault::Literal(DefaultLiteral::String(value.into()))
    }

    pub fn number(value: impl ToString) -> Self {
        ColumnDefault::Literal(DefaultLiteral::Number(value.to_string()))
    }

    pub fn boolean(value: bool) -> Self {
        ColumnDefault::Literal(DefaultLiteral::Boolean(value))
    }

    pub fn array(items: Vec<DefaultLiteral>) -> Self {
        ColumnDefault::Literal(DefaultLiteral::Array(items))
    }

    /// Compares by decoded value: `10.10` equals `10.1` and `'a'::text` equals the string `a`.
    pub fn equivalent(&self, other: &ColumnDefault) -> bool {
        self.canonical() == other.canonical()
    }

    fn canonical(&self) -> String {
        match self {
            ColumnDefault::Literal(literal) => canonical_literal(literal),
            ColumnDefault::Expression(sql) => {
                parse_expression(sql).unwrap_or_else(|| format!("e:{}", sql.trim()))
            }
        }
    }
}

pub fn equivalent_defaults(a: Option<&ColumnDefault>, b: Option<&ColumnDefault>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equivalent(b),
        _ => false,
    }
}

fn canonical_literal(literal: &DefaultLiteral) -> String {
    match literal {
        DefaultLiteral::Null => "null".to_string(),
        DefaultLiteral::Boolean(b) => b.to_string(),
        DefaultLiteral::Number(n) => {
            normalize_number(n).map_or_else(|| format!("s:{}", n), |n| format!("n:{}", n))
        }
        DefaultLiteral::String(s) => format!("s:{}", s),
        DefaultLiteral::Json(v) => format!("j:{}", v),
        DefaultLiteral::Array(items) => format!(
            "a:[{}]",
            items
                .iter()
                .map(canonical_literal)
                .collect::<Vec<_>>()
                .join(",")
        ),
    }
}

/// Decodes the literal forms PostgreSQL reports for column defaults
/// (`10`, `true`, `'abc'::text`, `'{1,2}'::int4[]`, `'{"a":1}'::jsonb`).
fn parse_expression(sql: &str) -> Option<String> {
    let mut value = sql.trim();
    while value.starts_with('(') && value.ends_with(')') && value.len() >= 2 {
        value = value[1..value.len() - 1].trim();
    }

    let (body, cast) = split_cast(value);
    let body = body.trim();

    if body.eq_ignore_ascii_case("null") {
        return Some("null".to_string());
    }
    if body.eq_ignore_ascii_case("true") || body.eq_ignore_ascii_case("false") {
        return Some(body.to_lowercase());
    }
    if let Some(n) = normalize_number(body) {
        return Some(format!("n:{}", n));
    }

    let text = unquote(body)?;
    let cast = cast.map(|c| c.trim().to_lowercase());
    match cast.as_deref() {
        Some(c) if c.ends_with("[]") => {
            parse_array_body(&text, is_number_cast(c.trim_end_matches("[]")))
        }
        Some("json") | Some("jsonb") => serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .map(|v| format!("j:{}", v)),
        // Negative and int8 defaults come back quoted: '-1'::integer, '5000000000'::bigint
        Some(c) if is_number_cast(c) => match normalize_number(&text) {
            Some(n) => Some(format!("n:{}", n)),
            None => Some(format!("s:{}", text)),
        },
        _ => Some(format!("s:{}", text)),
    }
}

/// Whether a cast target (without array brackets) is a numeric type.
fn is_number_cast(cast: &str) -> bool {
    let base = cast.split('(').next().unwrap_or(cast).trim();
    matches!(
        base,
        "smallint"
            | "integer"
            | "bigint"
            | "int"
            | "int2"
            | "int4"
            | "int8"
            | "numeric"
            | "decimal"
            | "real"
            | "float4"
            | "float8"
            | "double precision"
    )
}

/// Splits off a trailing `::type` cast that is outside any quoted section.
fn split_cast(value: &str) -> (&str, Option<&str>) {
    let mut in_quote = false;
    let mut cast_at = None;
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quote = !in_quote,
            b':' if !in_quote && bytes.get(i + 1) == Some(&b':') => {
                cast_at = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    match cast_at {
        Some(pos) => (&value[..pos], Some(&value[pos + 2..])),
        None => (value, None),
    }
}

fn unquote(body: &str) -> Option<String> {
    let (escaped, inner) = if let Some(rest) = body.strip_prefix("e'").or(body.strip_prefix("E'")) {
        (true, rest.strip_suffix('\'')?)
    } else {
        (false, body.strip_prefix('\'')?.strip_suffix('\'')?)
    };
    let mut text = inner.replace("''", "'");
    if escaped {
        text = text.replace("\\\\", "\\");
    }
    Some(text)
}

fn parse_array_body(text: &str, numeric: bool) -> Option<String> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.trim().is_empty() {
        return Some("a:[]".to_string());
    }

    let mut elements = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                was_quoted = true;
            }
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' if !quoted => {
                elements.push(canonical_element(&current, was_quoted && !numeric));
                current.clear();
                was_quoted = false;
            }
            _ => current.push(c),
        }
    }
    elements.push(canonical_element(&current, was_quoted && !numeric));

    Some(format!("a:[{}]", elements.join(",")))
}

fn canonical_element(token: &str, quoted: bool) -> String {
    if quoted {
        return format!("s:{}", token);
    }
    let token = token.trim();
    if token.eq_ignore_ascii_case("null") {
        return "null".to_string();
    }
    match token {
        "t" | "true" => return "true".to_string(),
        "f" | "false" => return "false".to_string(),
        _ => {}
    }
    match normalize_number(token) {
        Some(n) => format!("n:{}", n),
        None => format!("s:{}", token),
    }
}

/// Canonical decimal text: `010.100` -> `10.1`, `-0.0` -> `0`.
pub fn normalize_number(raw: &str) -> Option<String> {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() {
        return None;
    }
    if digits.contains(['e', 'E']) {
        return digits
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| format!("{}{}", sign, v));
    }

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) || (int_part.is_empty() && frac_part.is_empty())
    {
        return None;
    }

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac = frac_part.trim_end_matches('0');
    let body = if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac)
    };

    if body == "0" {
        Some(body)
    } else {
        Some(format!("{}{}", sign, body))
    }
}
