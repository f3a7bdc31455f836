//! Snapshot builders and diff shortcuts shared by the integration tests.

use pgdelta::ddl::{
    CheckConstraint, Column, ColumnType, Ddl, EnumType, ForeignKey, Index, Policy, PrimaryKey,
    Schema, Table, UniqueConstraint, View,
};
use pgdelta::diff::{self, DiffResult, Mode};
use pgdelta::error::DiffError;
use pgdelta::resolver::{DeclaredRenames, Resolvers};

/// A column whose schema and table are filled in by [`SnapshotBuilder::table`].
pub fn col(name: &str, type_name: &str) -> Column {
    Column::new("", "", name, ColumnType::new(type_name))
}

#[derive(Default)]
pub struct SnapshotBuilder {
    ddl: Ddl,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, name: &str) -> Self {
        self.ddl.schemas.push(Schema::new(name));
        self
    }

    pub fn table(self, name: &str, columns: Vec<Column>) -> Self {
        self.table_in("public", name, columns)
    }

    pub fn table_in(mut self, schema: &str, name: &str, columns: Vec<Column>) -> Self {
        self.ddl.tables.push(Table::new(schema, name));
        for mut column in columns {
            column.schema = schema.to_string();
            column.table = name.to_string();
            self.ddl.columns.push(column);
        }
        self
    }

    pub fn enum_type(mut self, name: &str, values: &[&str]) -> Self {
        self.ddl.enums.push(EnumType::new("public", name, values));
        self
    }

    pub fn primary_key(mut self, table: &str, name: &str, columns: &[&str]) -> Self {
        self.ddl.primary_keys.push(PrimaryKey {
            schema: "public".to_string(),
            table: table.to_string(),
            name: name.to_string(),
            columns: strings(columns),
        });
        self
    }

    pub fn unique(mut self, table: &str, name: &str, columns: &[&str]) -> Self {
        self.ddl.uniques.push(UniqueConstraint {
            schema: "public".to_string(),
            table: table.to_string(),
            name: name.to_string(),
            columns: strings(columns),
            nulls_not_distinct: false,
        });
        self
    }

    pub fn check(mut self, table: &str, name: &str, value: &str) -> Self {
        self.ddl.checks.push(CheckConstraint {
            schema: "public".to_string(),
            table: table.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Foreign key with an empty name, so normalization derives one.
    pub fn foreign_key(mut self, table: &str, columns: &[&str], table_to: &str, columns_to: &[&str]) -> Self {
        self.ddl.foreign_keys.push(ForeignKey {
            schema: "public".to_string(),
            table: table.to_string(),
            name: String::new(),
            columns: strings(columns),
            schema_to: "public".to_string(),
            table_to: table_to.to_string(),
            columns_to: strings(columns_to),
            on_delete: Default::default(),
            on_update: Default::default(),
        });
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.ddl.indexes.push(index);
        self
    }

    pub fn view(mut self, name: &str, definition: &str) -> Self {
        self.ddl.views.push(View::new("public", name, definition));
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.ddl.policies.push(policy);
        self
    }

    pub fn build(self) -> Ddl {
        self.ddl
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Diffs with the given `<old>-><new>` declarations in the given mode.
pub fn diff_with(
    from: &Ddl,
    to: &Ddl,
    renames: &[&str],
    mode: Mode,
) -> Result<DiffResult, DiffError> {
    let declared = DeclaredRenames::parse(renames.iter().copied())?;
    diff::diff(from, to, &Resolvers::uniform(&declared), mode)
}

/// Statements of a default-mode diff. Panics if the diff fails.
pub fn sql(from: &Ddl, to: &Ddl, renames: &[&str]) -> Vec<String> {
    diff_with(from, to, renames, Mode::Default)
        .expect("diff should succeed")
        .sql_statements
}
