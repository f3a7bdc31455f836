use crate::helpers::builders::{SnapshotBuilder, col};
use crate::helpers::fake_db::FakeDatabase;
use anyhow::Result;
use pgdelta::ddl::Ddl;
use pgdelta::error::DiffError;
use pgdelta::progress::SilentReporter;
use pgdelta::push::{self, PushOptions};
use pgdelta::resolver::{DeclaredRenames, Resolvers};

fn users() -> Ddl {
    SnapshotBuilder::new()
        .table("users", vec![col("id", "integer").primary_key()])
        .build()
}

#[tokio::test]
async fn test_push_to_empty_database_creates_table() -> Result<()> {
    let db = FakeDatabase::new();

    let report = push::run(
        &db,
        &users(),
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await?;

    assert_eq!(
        report.statements,
        vec!["CREATE TABLE \"users\" (\n\t\"id\" int4 PRIMARY KEY\n);"]
    );
    assert_eq!(db.executed(), report.statements);
    assert!(report.hints.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_push_up_to_date_database_executes_nothing() -> Result<()> {
    let db = FakeDatabase::new()
        .with_table("users", &[("id", "integer", true)])
        .with_primary_key("users", "users_pkey", &["id"]);

    let report = push::run(
        &db,
        &users(),
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await?;

    assert!(report.statements.is_empty());
    assert!(db.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_push_applies_declared_renames() -> Result<()> {
    let db = FakeDatabase::new()
        .with_table("users", &[("id", "integer", true)])
        .with_primary_key("users", "users_pkey", &["id"]);
    let desired = SnapshotBuilder::new()
        .table("users1", vec![col("id1", "integer").primary_key()])
        .build();
    let renames = DeclaredRenames::new()
        .with("public.users", "public.users1")
        .with("public.users1.id", "public.users1.id1");

    let report = push::run(
        &db,
        &desired,
        &Resolvers::uniform(&renames),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await?;

    assert_eq!(
        db.executed(),
        vec![
            "ALTER TABLE \"users\" RENAME TO \"users1\";",
            "ALTER TABLE \"users1\" RENAME COLUMN \"id\" TO \"id1\";",
        ]
    );
    assert_eq!(report.statements.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_push_refuses_to_drop_primary_key() {
    let db = FakeDatabase::new()
        .with_table("users", &[("id", "integer", true)])
        .with_primary_key("users", "users_pkey", &["id"]);
    let desired = SnapshotBuilder::new()
        .table("users", vec![col("id", "integer").not_null()])
        .build();

    let err = push::plan(
        &db,
        &desired,
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DiffError>(),
        Some(DiffError::UnsupportedTransition { .. })
    ));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_verify_reports_residual_diff() {
    // The fake never changes, so re-introspection still sees an empty database.
    let db = FakeDatabase::new();
    let options = PushOptions {
        verify: true,
        ..Default::default()
    };

    let err = push::run(&db, &users(), &Resolvers::none(), &options, &SilentReporter)
        .await
        .unwrap_err();

    match err.downcast_ref::<DiffError>() {
        Some(DiffError::ResidualDiff(statements)) => {
            assert_eq!(statements.len(), 1);
            assert!(statements[0].starts_with("CREATE TABLE \"users\""));
        }
        other => panic!("expected a residual diff, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_statement_stops_the_push() {
    let db = FakeDatabase::new().fail_on("CREATE TABLE \"posts\"");
    let desired = SnapshotBuilder::new()
        .table("users", vec![col("id", "integer")])
        .table("posts", vec![col("id", "integer")])
        .table("tags", vec![col("id", "integer")])
        .build();

    let err = push::run(
        &db,
        &desired,
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("simulated failure"));
    assert_eq!(db.executed().len(), 1);
    assert!(db.executed()[0].starts_with("CREATE TABLE \"users\""));
}

#[tokio::test]
async fn test_migrations_table_is_never_touched() -> Result<()> {
    let db = FakeDatabase::new().with_table("pgdelta_migrations", &[("version", "text", true)]);

    let report = push::run(
        &db,
        &Ddl::new(),
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await?;

    assert!(report.statements.is_empty());
    Ok(())
}
