//! SQL rendering for enum type operations

use crate::ddl::{ColumnType, EntityId, EnumType};
use crate::diff::operations::{EnumColumnUse, EnumOperation};
use crate::render::literal::render_default;
use crate::render::{
    RenderedSql, SqlRenderer, escape_string, qualified_name, quote_ident, render_column_type,
};

impl SqlRenderer for EnumOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            EnumOperation::Create { enum_type } => vec![RenderedSql::new(create_type(enum_type))],
            EnumOperation::Drop { schema, name } => vec![RenderedSql::destructive(format!(
                "DROP TYPE {};",
                qualified_name(schema, name)
            ))],
            EnumOperation::Rename { schema, from, to } => vec![RenderedSql::new(format!(
                "ALTER TYPE {} RENAME TO {};",
                qualified_name(schema, from),
                quote_ident(to)
            ))],
            EnumOperation::Move {
                name,
                from_schema,
                to_schema,
            } => vec![RenderedSql::new(format!(
                "ALTER TYPE {} SET SCHEMA {};",
                qualified_name(from_schema, name),
                quote_ident(to_schema)
            ))],
            EnumOperation::AddValue {
                schema,
                name,
                value,
                before,
            } => {
                let before = before
                    .as_ref()
                    .map(|b| format!(" BEFORE {}", escape_string(b)))
                    .unwrap_or_default();
                vec![RenderedSql::new(format!(
                    "ALTER TYPE {} ADD VALUE {}{};",
                    qualified_name(schema, name),
                    escape_string(value),
                    before
                ))]
            }
            EnumOperation::Recreate { enum_type, columns } => recreate(enum_type, columns),
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(
            self,
            EnumOperation::Drop { .. } | EnumOperation::Recreate { .. }
        )
    }
}

fn create_type(enum_type: &EnumType) -> String {
    let values = enum_type
        .values
        .iter()
        .map(|v| escape_string(v))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TYPE {} AS ENUM({});",
        qualified_name(&enum_type.schema, &enum_type.name),
        values
    )
}

/// Every dependent column is parked on `text` while the type is dropped and
/// created again, then cast back.
fn recreate(enum_type: &EnumType, columns: &[EnumColumnUse]) -> Vec<RenderedSql> {
    let mut statements = Vec::new();
    let type_name = qualified_name(&enum_type.schema, &enum_type.name);

    for usage in columns {
        let table = qualified_name(&usage.schema, &usage.table);
        let column = quote_ident(&usage.column);
        if usage.old_default.is_some() {
            statements.push(RenderedSql::new(format!(
                "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT;",
                table, column
            )));
        }
        let text_type = ColumnType::new("text").array(usage.dimensions);
        statements.push(RenderedSql::new(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {};",
            table,
            column,
            render_column_type(&text_type)
        )));
    }

    statements.push(RenderedSql::destructive(format!("DROP TYPE {};", type_name)));
    statements.push(RenderedSql::new(create_type(enum_type)));

    for usage in columns {
        let table = qualified_name(&usage.schema, &usage.table);
        let column = quote_ident(&usage.column);
        let target = ColumnType::user_defined(&enum_type.schema, &enum_type.name)
            .array(usage.dimensions);
        let target = render_column_type(&target);
        statements.push(RenderedSql::new(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {} USING {}::{};",
            table, column, target, column, target
        )));
        if let Some(default) = &usage.new_default {
            let column_type = ColumnType::user_defined(&enum_type.schema, &enum_type.name)
                .array(usage.dimensions);
            statements.push(RenderedSql::new(format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {};",
                table,
                column,
                render_default(default, &column_type)
            )));
        }
    }

    statements
}
