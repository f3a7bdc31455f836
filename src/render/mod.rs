//! SQL synthesis for diff operations.

pub mod constraint;
pub mod enum_type;
pub mod index;
pub mod literal;
pub mod policy;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod view;

pub use crate::diff::operations::SqlRenderer;

use crate::constants::DEFAULT_SCHEMA;
use crate::ddl::ColumnType;
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Safety {
    Safe,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSql {
    pub safety: Safety,
    pub sql: String,
}

impl RenderedSql {
    pub fn new(sql: String) -> Self {
        Self {
            sql,
            safety: Safety::Safe,
        }
    }

    pub fn destructive(sql: String) -> Self {
        Self {
            sql,
            safety: Safety::Destructive,
        }
    }
}

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `"name"` for objects in `public`, `"schema"."name"` elsewhere.
pub fn qualified_name(schema: &str, name: &str) -> String {
    if schema == DEFAULT_SCHEMA {
        quote_ident(name)
    } else {
        format!("{}.{}", quote_ident(schema), quote_ident(name))
    }
}

pub fn quote_columns(columns: &[String]) -> String {
    columns.iter().map(|c| quote_ident(c)).join(",")
}

/// Element type without array suffix: built-ins verbatim, user types quoted.
pub fn render_element_type(column_type: &ColumnType) -> String {
    match &column_type.type_schema {
        Some(schema) => qualified_name(schema, &column_type.name),
        None => column_type.name.clone(),
    }
}

/// Full column type, e.g. `int4[]`, `varchar(256)`, `"mood"`, `"app"."mood"[][]`.
pub fn render_column_type(column_type: &ColumnType) -> String {
    let dimension = match column_type.array_size {
        Some(size) => format!("[{}]", size),
        None => "[]".to_string(),
    };
    format!(
        "{}{}",
        render_element_type(column_type),
        dimension.repeat(column_type.dimensions as usize)
    )
}
