use crate::config::filter::EntityFilter;
use crate::config::{merge::Merge, types::*};
use anyhow::{Result, anyhow};
use tracing::debug;

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        let config = Config {
            database: self.resolve_database(),
            objects: self.resolve_objects(&defaults.objects),
            migrations: self.resolve_migrations(&defaults.migrations)?,
            diff: self.resolve_diff(&defaults.diff),
        };
        debug!("Resolved configuration: {:?}", config.diff);
        Ok(config)
    }

    fn resolve_database(&self) -> DatabaseSettings {
        let url = self
            .config_input
            .database
            .as_ref()
            .and_then(|d| d.url.as_ref())
            .cloned()
            .or_else(|| std::env::var("DATABASE_URL").ok());

        DatabaseSettings { url }
    }

    fn resolve_objects(&self, defaults: &Objects) -> Objects {
        let obj_input = self.config_input.objects.as_ref();

        let include = obj_input
            .and_then(|o| o.include.as_ref())
            .map(|i| ObjectInclude {
                schemas: i.schemas.as_ref().cloned().unwrap_or_default(),
                tables: i.tables.as_ref().cloned().unwrap_or_default(),
            })
            .unwrap_or_else(|| defaults.include.clone());

        let exclude = obj_input
            .and_then(|o| o.exclude.as_ref())
            .map(|e| ObjectExclude {
                schemas: e
                    .schemas
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.exclude.schemas.clone()),
                tables: e
                    .tables
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.exclude.tables.clone()),
            })
            .unwrap_or_else(|| defaults.exclude.clone());

        Objects {
            include,
            exclude,
            roles: obj_input
                .and_then(|o| o.roles.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.roles.clone()),
            extensions: obj_input
                .and_then(|o| o.extensions.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.extensions.clone()),
        }
    }

    fn resolve_migrations(&self, defaults: &MigrationsTable) -> Result<MigrationsTable> {
        let input = self.config_input.migrations.as_ref();

        let table = MigrationsTable {
            schema: input
                .and_then(|m| m.schema.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.schema.clone()),
            name: input
                .and_then(|m| m.table.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.name.clone()),
        };
        if table.schema.is_empty() || table.name.is_empty() {
            return Err(anyhow!(
                "Migrations table schema and name must not be empty"
            ));
        }
        Ok(table)
    }

    fn resolve_diff(&self, defaults: &DiffSettings) -> DiffSettings {
        let diff_input = self.config_input.diff.as_ref();

        DiffSettings {
            mode: diff_input.and_then(|d| d.mode).unwrap_or(defaults.mode),
            renames: diff_input
                .and_then(|d| d.renames.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.renames.clone()),
            verify: diff_input
                .and_then(|d| d.verify)
                .unwrap_or(defaults.verify),
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// The entity filter described by the `objects` and `migrations` sections.
    pub fn filter(&self) -> EntityFilter {
        EntityFilter::new(&self.objects, &self.migrations)
    }
}
