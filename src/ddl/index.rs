use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_method() -> String {
    "btree".to_string()
}

/// One entry of an index key: a column name or a verbatim SQL expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub value: String,
    #[serde(default)]
    pub is_expression: bool,
    #[serde(default = "default_true")]
    pub asc: bool,
    /// `None` keeps the engine default ordering of NULLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls_first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opclass: Option<String>,
}

impl IndexColumn {
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            value: name.into(),
            is_expression: false,
            asc: true,
            nulls_first: None,
            opclass: None,
        }
    }

    pub fn expression(sql: impl Into<String>) -> Self {
        Self {
            is_expression: true,
            ..Self::column(sql)
        }
    }

    pub fn desc(mut self) -> Self {
        self.asc = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub schema: String,
    pub table: String,
    /// Introspected indexes may lack a name; normalization derives one.
    #[serde(default)]
    pub name: String,
    pub columns: Vec<IndexColumn>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default = "default_method")]
    pub method: String,
    /// Partial-index predicate.
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
}

impl Index {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<IndexColumn>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            columns,
            unique: false,
            method: default_method(),
            predicate: None,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Index {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }

    /// Structural equality, ignoring the name.
    pub fn same_definition(&self, other: &Index) -> bool {
        self.columns == other.columns
            && self.unique == other.unique
            && self.method.eq_ignore_ascii_case(&other.method)
            && self.predicate.as_deref().map(str::trim) == other.predicate.as_deref().map(str::trim)
    }
}
