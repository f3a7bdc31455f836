//! SQL rendering for table constraint operations

use crate::ddl::{EntityId, FkAction, ForeignKey};
use crate::diff::operations::ConstraintOperation;
use crate::render::table::unique_clause;
use crate::render::{RenderedSql, SqlRenderer, qualified_name, quote_columns, quote_ident};

impl SqlRenderer for ConstraintOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        let (schema, table) = self.table();
        let table = qualified_name(schema, table);

        let sql = match self {
            ConstraintOperation::AddPrimaryKey { primary_key } => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY({});",
                table,
                quote_ident(&primary_key.name),
                quote_columns(&primary_key.columns)
            ),
            ConstraintOperation::ReplacePrimaryKey {
                old_name,
                primary_key,
            } => {
                return vec![RenderedSql::destructive(format!(
                    "ALTER TABLE {} DROP CONSTRAINT {}, ADD CONSTRAINT {} PRIMARY KEY({});",
                    table,
                    quote_ident(old_name),
                    quote_ident(&primary_key.name),
                    quote_columns(&primary_key.columns)
                ))];
            }
            ConstraintOperation::AddUnique { unique } => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} {};",
                table,
                quote_ident(&unique.name),
                unique_clause(unique)
            ),
            ConstraintOperation::AddCheck { check } => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} CHECK ({});",
                table,
                quote_ident(&check.name),
                check.value
            ),
            ConstraintOperation::AddForeignKey { foreign_key } => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} {};",
                table,
                quote_ident(&foreign_key.name),
                foreign_key_clause(foreign_key)
            ),
            ConstraintOperation::Drop { name, .. } => {
                return vec![RenderedSql::destructive(format!(
                    "ALTER TABLE {} DROP CONSTRAINT {};",
                    table,
                    quote_ident(name)
                ))];
            }
            ConstraintOperation::Rename { from, to, .. } => format!(
                "ALTER TABLE {} RENAME CONSTRAINT {} TO {};",
                table,
                quote_ident(from),
                quote_ident(to)
            ),
        };
        vec![RenderedSql::new(sql)]
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(
            self,
            ConstraintOperation::Drop { .. } | ConstraintOperation::ReplacePrimaryKey { .. }
        )
    }
}

/// `FOREIGN KEY ("c") REFERENCES "t"("id")[ ON DELETE x][ ON UPDATE y]`
pub fn foreign_key_clause(fk: &ForeignKey) -> String {
    let mut sql = format!(
        "FOREIGN KEY ({}) REFERENCES {}({})",
        quote_columns(&fk.columns),
        qualified_name(&fk.schema_to, &fk.table_to),
        quote_columns(&fk.columns_to)
    );
    if fk.on_delete != FkAction::NoAction {
        sql.push_str(&format!(" ON DELETE {}", fk.on_delete.as_sql()));
    }
    if fk.on_update != FkAction::NoAction {
        sql.push_str(&format!(" ON UPDATE {}", fk.on_update.as_sql()));
    }
    sql
}
