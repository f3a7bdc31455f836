use crate::diff::Mode;
use clap::Args;
use serde::{Deserialize, Serialize};

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub database: Option<DatabaseInput>,
    pub objects: Option<ObjectsInput>,
    pub migrations: Option<MigrationsInput>,
    pub diff: Option<DiffInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub objects: Objects,
    pub migrations: MigrationsTable,
    pub diff: DiffSettings,
}

// Database configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseInput {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseSettings {
    /// Falls back to `DATABASE_URL`; only `push` and `introspect` need it.
    pub url: Option<String>,
}

// Object filtering configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectsInput {
    pub include: Option<ObjectIncludeInput>,
    pub exclude: Option<ObjectExcludeInput>,
    pub roles: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectIncludeInput {
    pub schemas: Option<Vec<String>>,
    pub tables: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectExcludeInput {
    pub schemas: Option<Vec<String>>,
    pub tables: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct Objects {
    pub include: ObjectInclude,
    pub exclude: ObjectExclude,
    /// Role name patterns to manage. Empty manages every non-system role.
    pub roles: Vec<String>,
    /// Installed extensions whose bookkeeping objects are left alone.
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectInclude {
    pub schemas: Vec<String>,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ObjectExclude {
    pub schemas: Vec<String>,
    pub tables: Vec<String>,
}

// Migration bookkeeping table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationsInput {
    pub schema: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationsTable {
    pub schema: String,
    pub name: String,
}

// Diff behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiffInput {
    pub mode: Option<Mode>,
    /// `"<old>-><new>"` declarations.
    pub renames: Option<Vec<String>>,
    pub verify: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DiffSettings {
    pub mode: Mode,
    pub renames: Vec<String>,
    pub verify: bool,
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    #[arg(long, help = "Target database URL (defaults to DATABASE_URL)")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ObjectFilterArgs {
    #[arg(long, help = "Include only these schemas (glob patterns, '!' to exclude)")]
    pub schemas: Option<Vec<String>>,

    #[arg(long, help = "Include only these tables (glob patterns, '!' to exclude)")]
    pub tables: Option<Vec<String>>,

    #[arg(long, help = "Exclude these schemas (glob patterns)")]
    pub exclude_schemas: Option<Vec<String>>,

    #[arg(long, help = "Exclude these tables (glob patterns)")]
    pub exclude_tables: Option<Vec<String>>,

    #[arg(long, help = "Manage only these roles (glob patterns)")]
    pub roles: Option<Vec<String>>,

    #[arg(long, value_delimiter = ',', help = "Installed extensions to ignore (e.g. postgis)")]
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DiffArgs {
    #[arg(long, help = "Diff mode: default or push")]
    pub mode: Option<Mode>,

    #[arg(long = "rename", value_name = "OLD->NEW", help = "Declare a rename")]
    pub renames: Vec<String>,
}

// Conversion functions from CLI args to config input
impl From<DatabaseArgs> for DatabaseInput {
    fn from(args: DatabaseArgs) -> Self {
        Self { url: args.url }
    }
}

impl From<ObjectFilterArgs> for ObjectsInput {
    fn from(args: ObjectFilterArgs) -> Self {
        let include = if args.schemas.is_some() || args.tables.is_some() {
            Some(ObjectIncludeInput {
                schemas: args.schemas,
                tables: args.tables,
            })
        } else {
            None
        };

        let exclude = if args.exclude_schemas.is_some() || args.exclude_tables.is_some() {
            Some(ObjectExcludeInput {
                schemas: args.exclude_schemas,
                tables: args.exclude_tables,
            })
        } else {
            None
        };

        Self {
            include,
            exclude,
            roles: args.roles,
            extensions: args.extensions,
        }
    }
}

impl From<DiffArgs> for DiffInput {
    fn from(args: DiffArgs) -> Self {
        Self {
            mode: args.mode,
            renames: if args.renames.is_empty() {
                None
            } else {
                Some(args.renames)
            },
            verify: None,
        }
    }
}
