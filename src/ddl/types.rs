//! Column type descriptors and their canonical spelling.

use serde::{Deserialize, Serialize};

/// The type of a column: a base SQL type (with modifiers such as `varchar(256)`),
/// the schema of a user-defined type, and array dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub name: String,
    /// Set for user-defined types such as enums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_schema: Option<String>,
    #[serde(default)]
    pub dimensions: u32,
    /// Declared fixed size of the array dimensions. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<u32>,
}

impl ColumnType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_schema: None,
            dimensions: 0,
            array_size: None,
        }
    }

    pub fn user_defined(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_schema: Some(schema.into()),
            dimensions: 0,
            array_size: None,
        }
    }

    pub fn array(mut self, dimensions: u32) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn sized(mut self, size: u32) -> Self {
        self.array_size = Some(size);
        self
    }

    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    pub fn is_user_defined(&self) -> bool {
        self.type_schema.is_some()
    }

    /// Whether this column uses the user-defined type `schema.name`.
    pub fn refers_to(&self, schema: &str, name: &str) -> bool {
        self.type_schema.as_deref() == Some(schema) && self.name == name
    }

    /// Type equality ignoring the informational array size.
    pub fn same_type(&self, other: &ColumnType) -> bool {
        self.name == other.name
            && self.type_schema == other.type_schema
            && self.dimensions == other.dimensions
    }

    /// Base name without modifiers: `varchar(256)` -> `varchar`.
    pub fn base_name(&self) -> &str {
        match self.name.find('(') {
            Some(pos) => self.name[..pos].trim(),
            None => self.name.trim(),
        }
    }

    /// First numeric modifier, e.g. the precision of `timestamp(3)`.
    pub fn precision(&self) -> Option<u32> {
        let start = self.name.find('(')?;
        let end = self.name[start..].find(')')? + start;
        self.name[start + 1..end]
            .split(',')
            .next()
            .and_then(|p| p.trim().parse().ok())
    }

    pub fn is_timestamp(&self) -> bool {
        !self.is_user_defined() && matches!(self.base_name(), "timestamp" | "timestamptz")
    }

    pub fn is_json(&self) -> bool {
        !self.is_user_defined() && matches!(self.base_name(), "json" | "jsonb")
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_user_defined()
            && matches!(
                self.base_name(),
                "int2" | "int4" | "int8" | "numeric" | "float4" | "float8" | "serial" | "bigserial"
                    | "smallserial"
            )
    }

    pub fn is_serial(&self) -> bool {
        !self.is_user_defined()
            && !self.is_array()
            && matches!(self.base_name(), "serial" | "bigserial" | "smallserial")
    }

    pub fn is_boolean(&self) -> bool {
        !self.is_user_defined() && self.base_name() == "bool"
    }

    /// Canonical spelling, so that `integer` and `int4` compare equal.
    pub fn normalized(&self) -> ColumnType {
        if self.is_user_defined() {
            return self.clone();
        }
        ColumnType {
            name: normalize_type_name(&self.name),
            ..self.clone()
        }
    }
}

/// Rewrites a built-in type name to the short form PostgreSQL reports in `pg_type`,
/// keeping modifiers (`character varying(256)` -> `varchar(256)`).
pub fn normalize_type_name(name: &str) -> String {
    let lower = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let (words, modifier) = match (lower.find('('), lower.find(')')) {
        (Some(start), Some(end)) if end > start => {
            let modifier: String = lower[start..=end]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let words = format!("{} {}", lower[..start].trim(), lower[end + 1..].trim());
            (words.trim().to_string(), modifier)
        }
        _ => (lower, String::new()),
    };

    let alias = match words.as_str() {
        "integer" | "int" => "int4",
        "bigint" => "int8",
        "smallint" => "int2",
        "boolean" => "bool",
        "character varying" => "varchar",
        "character" => "char",
        "double precision" => "float8",
        "real" => "float4",
        "decimal" => "numeric",
        "timestamp without time zone" => "timestamp",
        "timestamp with time zone" => "timestamptz",
        "time without time zone" => "time",
        "time with time zone" => "timetz",
        other => other,
    };

    format!("{}{}", alias, modifier)
}
