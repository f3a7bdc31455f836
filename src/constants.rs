/// PostgreSQL truncates identifiers longer than this many bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Width of the hash used when a derived identifier has to be shortened.
pub const IDENTIFIER_HASH_LENGTH: usize = 12;

/// Schema that is implied when an entity does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Default location of the migration bookkeeping table.
pub const DEFAULT_MIGRATIONS_SCHEMA: &str = "public";
pub const DEFAULT_MIGRATIONS_TABLE: &str = "pgdelta_migrations";

pub const DEFAULT_CONFIG_FILE: &str = "pgdelta.yaml";

/// Role names that are SQL keywords and must never be quoted in a policy `TO` list.
pub const ROLE_KEYWORDS: &[&str] = &["public", "current_user", "current_role", "session_user"];
