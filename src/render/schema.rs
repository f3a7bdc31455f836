//! SQL rendering for schema operations

use crate::ddl::EntityId;
use crate::diff::operations::SchemaOperation;
use crate::render::{RenderedSql, SqlRenderer, quote_ident};

impl SqlRenderer for SchemaOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            SchemaOperation::Create { name } => vec![RenderedSql::new(format!(
                "CREATE SCHEMA {};",
                quote_ident(name)
            ))],
            SchemaOperation::Drop { name } => vec![RenderedSql::destructive(format!(
                "DROP SCHEMA {};",
                quote_ident(name)
            ))],
            SchemaOperation::Rename { from, to } => vec![RenderedSql::new(format!(
                "ALTER SCHEMA {} RENAME TO {};",
                quote_ident(from),
                quote_ident(to)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, SchemaOperation::Drop { .. })
    }
}
