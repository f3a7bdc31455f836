use anyhow::Result;
use pgdelta::config::{
    ConfigBuilder, ConfigInput, DiffInput, ObjectExcludeInput, ObjectsInput, load_config,
};
use pgdelta::ddl::{Column, ColumnType, Ddl, Role, Table};
use pgdelta::diff::Mode;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
database:
  url: postgres://localhost/app
objects:
  include:
    schemas: ["public", "app_*"]
  exclude:
    tables: ["tmp_*"]
  roles: ["app_*"]
migrations:
  schema: ops
  table: schema_history
diff:
  mode: push
  renames:
    - public.users->public.accounts
"#;

#[test]
fn test_load_config_from_yaml() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pgdelta.yaml");
    fs::write(&path, CONFIG)?;

    let config = ConfigBuilder::new()
        .with_file(load_config(path.to_str().unwrap())?)
        .resolve()?;

    assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/app"));
    assert_eq!(config.diff.mode, Mode::Push);
    assert_eq!(config.diff.renames, vec!["public.users->public.accounts"]);
    assert_eq!(config.migrations.schema, "ops");
    assert_eq!(config.migrations.name, "schema_history");
    // Unset exclude patterns keep their defaults.
    assert!(config.objects.exclude.schemas.contains(&"pg_*".to_string()));
    Ok(())
}

#[test]
fn test_missing_config_file_is_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent.yaml");
    let input = load_config(path.to_str().unwrap())?;
    assert!(input.database.is_none());
    assert!(input.diff.is_none());
    Ok(())
}

#[test]
fn test_invalid_yaml_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pgdelta.yaml");
    fs::write(&path, "diff: [unterminated")?;
    assert!(load_config(path.to_str().unwrap()).is_err());
    Ok(())
}

#[test]
fn test_cli_input_overrides_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pgdelta.yaml");
    fs::write(&path, CONFIG)?;

    let cli = ConfigInput {
        database: None,
        objects: Some(ObjectsInput {
            include: None,
            exclude: Some(ObjectExcludeInput {
                schemas: None,
                tables: Some(vec!["audit_*".to_string()]),
            }),
            roles: None,
            extensions: None,
        }),
        migrations: None,
        diff: Some(DiffInput {
            mode: Some(Mode::Default),
            renames: None,
            verify: Some(true),
        }),
    };

    let config = ConfigBuilder::new()
        .with_file(load_config(path.to_str().unwrap())?)
        .with_cli_args(cli)
        .resolve()?;

    assert_eq!(config.diff.mode, Mode::Default);
    assert!(config.diff.verify);
    assert_eq!(config.diff.renames, vec!["public.users->public.accounts"]);
    assert_eq!(config.objects.exclude.tables, vec!["audit_*"]);
    Ok(())
}

#[test]
fn test_resolved_filter_trims_snapshot() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pgdelta.yaml");
    fs::write(&path, CONFIG)?;
    let config = ConfigBuilder::new()
        .with_file(load_config(path.to_str().unwrap())?)
        .resolve()?;

    let ddl = Ddl {
        tables: vec![
            Table::new("public", "users"),
            Table::new("public", "tmp_import"),
            Table::new("billing", "invoices"),
            Table::new("ops", "schema_history"),
        ],
        columns: vec![
            Column::new("public", "users", "id", ColumnType::new("int4")),
            Column::new("public", "tmp_import", "id", ColumnType::new("int4")),
        ],
        roles: vec![Role::new("app_reader"), Role::new("postgres"), Role::new("pg_monitor")],
        ..Default::default()
    };

    let filtered = config.filter().apply(ddl);
    let tables: Vec<&str> = filtered.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tables, vec!["users"]);
    assert_eq!(filtered.columns.len(), 1);
    let roles: Vec<&str> = filtered.roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(roles, vec!["app_reader"]);
    Ok(())
}
