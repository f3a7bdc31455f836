//! SQL rendering for role operations

use crate::ddl::{EntityId, Role};
use crate::diff::operations::RoleOperation;
use crate::render::{RenderedSql, SqlRenderer, quote_ident};

impl SqlRenderer for RoleOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            RoleOperation::Create { role } => {
                let mut flags = Vec::new();
                if role.create_db {
                    flags.push("CREATEDB");
                }
                if role.create_role {
                    flags.push("CREATEROLE");
                }
                if !role.inherit {
                    flags.push("NOINHERIT");
                }
                let sql = if flags.is_empty() {
                    format!("CREATE ROLE {};", quote_ident(&role.name))
                } else {
                    format!(
                        "CREATE ROLE {} WITH {};",
                        quote_ident(&role.name),
                        flags.join(" ")
                    )
                };
                vec![RenderedSql::new(sql)]
            }
            RoleOperation::Drop { name } => vec![RenderedSql::destructive(format!(
                "DROP ROLE {};",
                quote_ident(name)
            ))],
            RoleOperation::Rename { from, to } => vec![RenderedSql::new(format!(
                "ALTER ROLE {} RENAME TO {};",
                quote_ident(from),
                quote_ident(to)
            ))],
            RoleOperation::Alter { role } => vec![RenderedSql::new(format!(
                "ALTER ROLE {} WITH {};",
                quote_ident(&role.name),
                all_flags(role)
            ))],
        }
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_destructive(&self) -> bool {
        matches!(self, RoleOperation::Drop { .. })
    }
}

fn all_flags(role: &Role) -> String {
    [
        if role.create_db { "CREATEDB" } else { "NOCREATEDB" },
        if role.create_role { "CREATEROLE" } else { "NOCREATEROLE" },
        if role.inherit { "INHERIT" } else { "NOINHERIT" },
    ]
    .join(" ")
}
