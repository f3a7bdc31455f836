//! SQL rendering for table and column operations

use crate::ddl::{
    CheckConstraint, Column, EntityId, PrimaryKey, UniqueConstraint, naming::default_name_for_pk,
};
use crate::diff::operations::{ColumnAction, ColumnOperation, TableOperation};
use crate::render::literal::render_default;
use crate::render::{
    RenderedSql, SqlRenderer, qualified_name, quote_columns, quote_ident, render_column_type,
};

impl SqlRenderer for TableOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            TableOperation::Create {
                table,
                columns,
                primary_key,
                uniques,
                checks,
            } => vec![RenderedSql::new(render_create_table(
                &qualified_name(&table.schema, &table.name),
                columns,
                primary_key.as_ref(),
                uniques,
                checks,
            ))],
            TableOperation::Drop { schema, name } => vec![RenderedSql::destructive(format!(
                "DROP TABLE {};",
                qualified_name(schema, name)
            ))],
            TableOperation::Rename { schema, from, to } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} RENAME TO {};",
                qualified_name(schema, from),
                quote_ident(to)
            ))],
            TableOperation::Move {
                name,
                from_schema,
                to_schema,
            } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} SET SCHEMA {};",
                qualified_name(from_schema, name),
                quote_ident(to_schema)
            ))],
            TableOperation::EnableRls { schema, name } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} ENABLE ROW LEVEL SECURITY;",
                qualified_name(schema, name)
            ))],
            TableOperation::DisableRls { schema, name } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} DISABLE ROW LEVEL SECURITY;",
                qualified_name(schema, name)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, TableOperation::Drop { .. })
    }
}

impl SqlRenderer for ColumnOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            ColumnOperation::Add { column } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} ADD COLUMN {};",
                qualified_name(&column.schema, &column.table),
                render_column_definition(column, false)
            ))],
            ColumnOperation::Drop {
                schema,
                table,
                name,
            } => vec![RenderedSql::destructive(format!(
                "ALTER TABLE {} DROP COLUMN {};",
                qualified_name(schema, table),
                quote_ident(name)
            ))],
            ColumnOperation::Rename {
                schema,
                table,
                from,
                to,
            } => vec![RenderedSql::new(format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {};",
                qualified_name(schema, table),
                quote_ident(from),
                quote_ident(to)
            ))],
            ColumnOperation::Alter { column, actions } => actions
                .iter()
                .map(|action| render_column_action(column, action))
                .collect(),
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        match self {
            ColumnOperation::Drop { .. } => true,
            ColumnOperation::Alter { actions, .. } => actions
                .iter()
                .any(|a| matches!(a, ColumnAction::SetType { .. })),
            _ => false,
        }
    }
}

fn render_column_action(column: &Column, action: &ColumnAction) -> RenderedSql {
    let prefix = format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        qualified_name(&column.schema, &column.table),
        quote_ident(&column.name)
    );
    match action {
        ColumnAction::SetType { column_type } => {
            let target = render_column_type(column_type);
            let using = if column_type.is_user_defined() {
                format!(" USING {}::{}", quote_ident(&column.name), target)
            } else {
                String::new()
            };
            RenderedSql::destructive(format!("{} SET DATA TYPE {}{};", prefix, target, using))
        }
        ColumnAction::SetDefault { default } => RenderedSql::new(format!(
            "{} SET DEFAULT {};",
            prefix,
            render_default(default, &column.column_type)
        )),
        ColumnAction::DropDefault => RenderedSql::new(format!("{} DROP DEFAULT;", prefix)),
        ColumnAction::SetNotNull => RenderedSql::new(format!("{} SET NOT NULL;", prefix)),
        ColumnAction::DropNotNull => RenderedSql::new(format!("{} DROP NOT NULL;", prefix)),
    }
}

/// `"name" type[ PRIMARY KEY][ DEFAULT x][ GENERATED ALWAYS AS (e) STORED][ NOT NULL]`
pub fn render_column_definition(column: &Column, inline_primary_key: bool) -> String {
    let mut sql = format!(
        "{} {}",
        quote_ident(&column.name),
        render_column_type(&column.column_type)
    );
    if inline_primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if let Some(default) = &column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&render_default(default, &column.column_type));
    }
    if let Some(expression) = &column.generated {
        sql.push_str(&format!(" GENERATED ALWAYS AS ({}) STORED", expression));
    }
    if column.not_null && !inline_primary_key {
        sql.push_str(" NOT NULL");
    }
    sql
}

pub fn render_create_table(
    key: &str,
    columns: &[Column],
    primary_key: Option<&PrimaryKey>,
    uniques: &[UniqueConstraint],
    checks: &[CheckConstraint],
) -> String {
    // A single-column key under its default name is declared on the column itself.
    let inline_pk = primary_key.and_then(|pk| {
        (pk.columns.len() == 1 && pk.name == default_name_for_pk(&pk.table))
            .then(|| pk.columns[0].as_str())
    });
    let pk_columns: Vec<&str> = primary_key
        .map(|pk| pk.columns.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let mut lines: Vec<String> = columns
        .iter()
        .map(|column| {
            let inline = inline_pk == Some(column.name.as_str());
            let mut column = column.clone();
            if pk_columns.contains(&column.name.as_str()) {
                column.not_null = false;
            }
            render_column_definition(&column, inline)
        })
        .collect();

    if let Some(pk) = primary_key.filter(|_| inline_pk.is_none()) {
        lines.push(format!(
            "CONSTRAINT {} PRIMARY KEY({})",
            quote_ident(&pk.name),
            quote_columns(&pk.columns)
        ));
    }
    for unique in uniques {
        lines.push(format!(
            "CONSTRAINT {} {}",
            quote_ident(&unique.name),
            unique_clause(unique)
        ));
    }
    for check in checks {
        lines.push(format!(
            "CONSTRAINT {} CHECK ({})",
            quote_ident(&check.name),
            check.value
        ));
    }

    format!("CREATE TABLE {} (\n\t{}\n);", key, lines.join(",\n\t"))
}

pub fn unique_clause(unique: &UniqueConstraint) -> String {
    let nulls = if unique.nulls_not_distinct {
        " NULLS NOT DISTINCT"
    } else {
        ""
    };
    format!("UNIQUE{}({})", nulls, quote_columns(&unique.columns))
}
