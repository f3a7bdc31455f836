//! SQL rendering for row-level security policy operations

use crate::constants::ROLE_KEYWORDS;
use crate::ddl::{EntityId, Policy};
use crate::diff::operations::PolicyOperation;
use crate::render::{RenderedSql, SqlRenderer, qualified_name, quote_ident};

impl SqlRenderer for PolicyOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            PolicyOperation::Create { policy } => {
                let mut sql = format!(
                    "CREATE POLICY {} ON {} AS {} FOR {} TO {}",
                    quote_ident(&policy.name),
                    qualified_name(&policy.schema, &policy.table),
                    policy.as_clause.as_sql(),
                    policy.for_clause.as_sql(),
                    render_roles(&policy.to)
                );
                push_expressions(&mut sql, policy, true, true);
                sql.push(';');
                vec![RenderedSql::new(sql)]
            }
            PolicyOperation::Drop {
                schema,
                table,
                name,
            } => vec![RenderedSql::destructive(format!(
                "DROP POLICY {} ON {};",
                quote_ident(name),
                qualified_name(schema, table)
            ))],
            PolicyOperation::Rename {
                schema,
                table,
                from,
                to,
            } => vec![RenderedSql::new(format!(
                "ALTER POLICY {} ON {} RENAME TO {};",
                quote_ident(from),
                qualified_name(schema, table),
                quote_ident(to)
            ))],
            PolicyOperation::Alter {
                policy,
                roles,
                using,
                with_check,
            } => {
                let mut sql = format!(
                    "ALTER POLICY {} ON {}",
                    quote_ident(&policy.name),
                    qualified_name(&policy.schema, &policy.table)
                );
                if *roles {
                    sql.push_str(&format!(" TO {}", render_roles(&policy.to)));
                }
                push_expressions(&mut sql, policy, *using, *with_check);
                sql.push(';');
                vec![RenderedSql::new(sql)]
            }
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, PolicyOperation::Drop { .. })
    }
}

fn push_expressions(sql: &mut String, policy: &Policy, using: bool, with_check: bool) {
    if let Some(expr) = policy.using.as_deref().filter(|_| using) {
        sql.push_str(&format!(" USING ({})", expr.trim()));
    }
    if let Some(expr) = policy.with_check.as_deref().filter(|_| with_check) {
        sql.push_str(&format!(" WITH CHECK ({})", expr.trim()));
    }
}

/// Role keywords such as `public` stay bare; role names are quoted.
pub fn render_roles(roles: &[String]) -> String {
    if roles.is_empty() {
        return "public".to_string();
    }
    roles
        .iter()
        .map(|role| {
            if ROLE_KEYWORDS.contains(&role.to_lowercase().as_str()) {
                role.to_lowercase()
            } else {
                quote_ident(role)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
