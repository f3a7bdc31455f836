//! SQL rendering for sequence operations

use crate::ddl::{EntityId, Sequence};
use crate::diff::operations::SequenceOperation;
use crate::render::{RenderedSql, SqlRenderer, qualified_name, quote_ident};

impl SqlRenderer for SequenceOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            SequenceOperation::Create { sequence } => vec![RenderedSql::new(format!(
                "CREATE SEQUENCE {} {};",
                qualified_name(&sequence.schema, &sequence.name),
                parameters(sequence)
            ))],
            SequenceOperation::Drop { schema, name } => vec![RenderedSql::destructive(format!(
                "DROP SEQUENCE {};",
                qualified_name(schema, name)
            ))],
            SequenceOperation::Rename { schema, from, to } => vec![RenderedSql::new(format!(
                "ALTER SEQUENCE {} RENAME TO {};",
                qualified_name(schema, from),
                quote_ident(to)
            ))],
            SequenceOperation::Move {
                name,
                from_schema,
                to_schema,
            } => vec![RenderedSql::new(format!(
                "ALTER SEQUENCE {} SET SCHEMA {};",
                qualified_name(from_schema, name),
                quote_ident(to_schema)
            ))],
            SequenceOperation::Alter { sequence } => vec![RenderedSql::new(format!(
                "ALTER SEQUENCE {} {};",
                qualified_name(&sequence.schema, &sequence.name),
                parameters(sequence)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, SequenceOperation::Drop { .. })
    }
}

fn parameters(sequence: &Sequence) -> String {
    let p = sequence.params();
    let mut sql = format!(
        "INCREMENT BY {} MINVALUE {} MAXVALUE {} START WITH {} CACHE {}",
        p.increment, p.min_value, p.max_value, p.start_with, p.cache
    );
    sql.push_str(if p.cycle { " CYCLE" } else { " NO CYCLE" });
    sql
}
