//! Normalized schema snapshot: a flat collection of typed entities.

pub mod constraint;
pub mod default;
pub mod enum_type;
pub mod id;
pub mod index;
pub mod naming;
pub mod policy;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod types;
pub mod validate;
pub mod view;

pub use constraint::{CheckConstraint, FkAction, ForeignKey, PrimaryKey, UniqueConstraint};
pub use default::{ColumnDefault, DefaultLiteral};
pub use enum_type::EnumType;
pub use id::{EntityId, EntityKind};
pub use index::{Index, IndexColumn};
pub use policy::{Policy, PolicyAs, PolicyFor};
pub use role::Role;
pub use schema::Schema;
pub use sequence::Sequence;
pub use table::{Column, Table};
pub use types::ColumnType;
pub use view::View;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ddl {
    pub schemas: Vec<Schema>,
    pub roles: Vec<Role>,
    pub enums: Vec<EnumType>,
    pub sequences: Vec<Sequence>,
    pub tables: Vec<Table>,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub uniques: Vec<UniqueConstraint>,
    pub checks: Vec<CheckConstraint>,
    pub indexes: Vec<Index>,
    pub views: Vec<View>,
    pub policies: Vec<Policy>,
}

impl Ddl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self == &Ddl::default()
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.is(schema, name))
    }

    pub fn has_table(&self, schema: &str, name: &str) -> bool {
        self.table(schema, name).is_some()
    }

    pub fn columns_of<'a>(
        &'a self,
        schema: &'a str,
        table: &'a str,
    ) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns.iter().filter(move |c| c.belongs_to(schema, table))
    }

    pub fn column(&self, schema: &str, table: &str, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.belongs_to(schema, table) && c.name == name)
    }

    pub fn primary_key_of(&self, schema: &str, table: &str) -> Option<&PrimaryKey> {
        self.primary_keys
            .iter()
            .find(|pk| pk.belongs_to(schema, table))
    }

    pub fn policies_of<'a>(
        &'a self,
        schema: &'a str,
        table: &'a str,
    ) -> impl Iterator<Item = &'a Policy> + 'a {
        self.policies
            .iter()
            .filter(move |p| p.belongs_to(schema, table))
    }

    pub fn enum_type(&self, schema: &str, name: &str) -> Option<&EnumType> {
        self.enums
            .iter()
            .find(|e| e.schema == schema && e.name == name)
    }

    /// Effective row-level security: declared, or implied by owning a policy.
    pub fn rls_enabled(&self, table: &Table) -> bool {
        table.rls_enabled
            || self
                .policies_of(&table.schema, &table.name)
                .next()
                .is_some()
    }

    /// Canonical form used for comparison: built-in type aliases collapsed,
    /// column-inline primary keys lifted to table level, and missing
    /// constraint and index names derived.
    pub fn normalized(&self) -> Ddl {
        let mut ddl = self.clone();

        for column in &mut ddl.columns {
            column.column_type = column.column_type.normalized();
        }

        for table in &self.tables {
            if ddl.primary_key_of(&table.schema, &table.name).is_some() {
                continue;
            }
            let inline: Vec<String> = self
                .columns_of(&table.schema, &table.name)
                .filter(|c| c.primary_key)
                .map(|c| c.name.clone())
                .collect();
            if !inline.is_empty() {
                ddl.primary_keys.push(PrimaryKey {
                    schema: table.schema.clone(),
                    table: table.name.clone(),
                    name: String::new(),
                    columns: inline,
                });
            }
        }
        for column in &mut ddl.columns {
            column.primary_key = false;
        }

        for pk in &mut ddl.primary_keys {
            if pk.name.is_empty() {
                pk.name = naming::default_name_for_pk(&pk.table);
            }
        }
        for fk in &mut ddl.foreign_keys {
            if fk.name.is_empty() {
                fk.name =
                    naming::default_name_for_fk(&fk.table, &fk.columns, &fk.table_to, &fk.columns_to);
            }
        }
        for unique in &mut ddl.uniques {
            if unique.name.is_empty() {
                unique.name = naming::default_name_for_unique(&unique.table, &unique.columns);
            }
        }
        for index in &mut ddl.indexes {
            if index.name.is_empty() {
                index.name = naming::default_name_for_index(&index.table, &index.columns);
            }
        }

        ddl
    }
}
