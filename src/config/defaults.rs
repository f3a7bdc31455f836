use crate::config::types::*;
use crate::constants::{DEFAULT_MIGRATIONS_SCHEMA, DEFAULT_MIGRATIONS_TABLE};

// ObjectInclude can derive Default since it's just two empty Vecs

impl Default for ObjectExclude {
    fn default() -> Self {
        Self {
            schemas: vec!["pg_*".to_string(), "information_schema".to_string()],
            tables: vec![],
        }
    }
}

impl Default for MigrationsTable {
    fn default() -> Self {
        Self {
            schema: DEFAULT_MIGRATIONS_SCHEMA.to_string(),
            name: DEFAULT_MIGRATIONS_TABLE.to_string(),
        }
    }
}
