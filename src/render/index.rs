//! SQL rendering for index operations

use crate::ddl::{EntityId, Index, IndexColumn};
use crate::diff::operations::IndexOperation;
use crate::render::{RenderedSql, SqlRenderer, qualified_name, quote_ident};

impl SqlRenderer for IndexOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            IndexOperation::Create { index } => vec![RenderedSql::new(render_create_index(index))],
            IndexOperation::Drop { schema, name } => vec![RenderedSql::destructive(format!(
                "DROP INDEX {};",
                qualified_name(schema, name)
            ))],
            IndexOperation::Rename { schema, from, to } => vec![RenderedSql::new(format!(
                "ALTER INDEX {} RENAME TO {};",
                qualified_name(schema, from),
                quote_ident(to)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, IndexOperation::Drop { .. })
    }
}

fn render_create_index(index: &Index) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    let method = if index.method.eq_ignore_ascii_case("btree") {
        String::new()
    } else {
        format!(" USING {}", index.method)
    };
    let columns = index
        .columns
        .iter()
        .map(render_index_column)
        .collect::<Vec<_>>()
        .join(", ");
    let predicate = index
        .predicate
        .as_ref()
        .map(|p| format!(" WHERE {}", p.trim()))
        .unwrap_or_default();

    format!(
        "CREATE {}INDEX {} ON {}{} ({}){};",
        unique,
        quote_ident(&index.name),
        qualified_name(&index.schema, &index.table),
        method,
        columns,
        predicate
    )
}

fn render_index_column(column: &IndexColumn) -> String {
    let mut sql = if column.is_expression {
        column.value.clone()
    } else {
        quote_ident(&column.value)
    };
    if let Some(opclass) = &column.opclass {
        sql.push(' ');
        sql.push_str(opclass);
    }
    if !column.asc {
        sql.push_str(" DESC");
    }
    match column.nulls_first {
        Some(true) => sql.push_str(" NULLS FIRST"),
        Some(false) => sql.push_str(" NULLS LAST"),
        None => {}
    }
    sql
}
