//! SQL rendering for view operations

use crate::ddl::EntityId;
use crate::diff::operations::ViewOperation;
use crate::render::{RenderedSql, SqlRenderer, qualified_name, quote_ident};

fn keyword(materialized: bool) -> &'static str {
    if materialized {
        "MATERIALIZED VIEW"
    } else {
        "VIEW"
    }
}

impl SqlRenderer for ViewOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            ViewOperation::Create { view } => {
                let definition = view.definition.as_deref().unwrap_or_default().trim();
                let no_data = if view.materialized && view.with_no_data {
                    " WITH NO DATA"
                } else {
                    ""
                };
                vec![RenderedSql::new(format!(
                    "CREATE {} {} AS ({}){};",
                    keyword(view.materialized),
                    qualified_name(&view.schema, &view.name),
                    definition.trim_end_matches(';'),
                    no_data
                ))]
            }
            ViewOperation::Drop {
                schema,
                name,
                materialized,
            } => vec![RenderedSql::destructive(format!(
                "DROP {} {};",
                keyword(*materialized),
                qualified_name(schema, name)
            ))],
            ViewOperation::Rename {
                schema,
                from,
                to,
                materialized,
            } => vec![RenderedSql::new(format!(
                "ALTER {} {} RENAME TO {};",
                keyword(*materialized),
                qualified_name(schema, from),
                quote_ident(to)
            ))],
            ViewOperation::Move {
                name,
                from_schema,
                to_schema,
                materialized,
            } => vec![RenderedSql::new(format!(
                "ALTER {} {} SET SCHEMA {};",
                keyword(*materialized),
                qualified_name(from_schema, name),
                quote_ident(to_schema)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, ViewOperation::Drop { .. })
    }
}
