use crate::ddl::default::ColumnDefault;
use crate::ddl::id::EntityId;
use crate::ddl::types::ColumnType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    /// Row-level security flag as declared. Tables that own policies have it
    /// enabled regardless, see [`crate::ddl::Ddl::rls_enabled`].
    #[serde(default)]
    pub rls_enabled: bool,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            rls_enabled: false,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Table {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    pub fn is(&self, schema: &str, name: &str) -> bool {
        self.schema == schema && self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub schema: String,
    pub table: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub not_null: bool,
    /// Column-inline primary key. Lifted into a table-level
    /// [`PrimaryKey`](crate::ddl::constraint::PrimaryKey) during normalization.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    /// `GENERATED ALWAYS AS (<expr>) STORED`; mutually exclusive with `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
}

impl Column {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            column_type,
            not_null: false,
            primary_key: false,
            default: None,
            generated: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn generated_as(mut self, expression: impl Into<String>) -> Self {
        self.generated = Some(expression.into());
        self
    }

    pub fn id(&self) -> EntityId {
        EntityId::Column {
            schema: self.schema.clone(),
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }
}
