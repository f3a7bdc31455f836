use crate::helpers::builders::{SnapshotBuilder, col};
use crate::helpers::fake_db::FakeDatabase;
use anyhow::Result;
use pgdelta::db::Row;
use pgdelta::ddl::Ddl;
use pgdelta::progress::SilentReporter;
use pgdelta::push::{self, PushOptions, PushPlan};
use pgdelta::resolver::Resolvers;

fn populated_users() -> FakeDatabase {
    FakeDatabase::new()
        .with_table("users", &[("id", "integer", true), ("email", "text", false)])
        .with_primary_key("users", "users_pkey", &["id"])
}

fn one_row() -> Vec<Row> {
    vec![Row::from_pairs([("?column?", Some("1"))])]
}

async fn plan(db: &FakeDatabase, desired: &Ddl) -> Result<PushPlan> {
    push::plan(
        db,
        desired,
        &Resolvers::none(),
        &PushOptions::default(),
        &SilentReporter,
    )
    .await
}

#[tokio::test]
async fn test_not_null_column_on_populated_table() -> Result<()> {
    let db = populated_users().respond("SELECT 1 FROM \"users\" LIMIT 1", one_row());
    let desired = SnapshotBuilder::new()
        .table(
            "users",
            vec![
                col("id", "integer").primary_key(),
                col("email", "text"),
                col("name", "text").not_null(),
            ],
        )
        .build();

    let plan = plan(&db, &desired).await?;
    assert_eq!(
        plan.statements(),
        ["ALTER TABLE \"users\" ADD COLUMN \"name\" text NOT NULL;"]
    );
    assert_eq!(plan.hints.len(), 1);
    assert!(plan.hints[0].message.contains("has rows"));
    assert!(db.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_set_not_null_with_null_values() -> Result<()> {
    let db = populated_users().respond("\"email\" IS NULL", one_row());
    let desired = SnapshotBuilder::new()
        .table(
            "users",
            vec![col("id", "integer").primary_key(), col("email", "text").not_null()],
        )
        .build();

    let plan = plan(&db, &desired).await?;
    assert_eq!(plan.hints.len(), 1);
    assert!(plan.hints[0].message.contains("contains NULL values"));
    Ok(())
}

#[tokio::test]
async fn test_empty_table_produces_no_hints() -> Result<()> {
    let db = populated_users();
    let desired = SnapshotBuilder::new()
        .table(
            "users",
            vec![
                col("id", "integer").primary_key(),
                col("email", "text").not_null(),
                col("name", "text").not_null(),
            ],
        )
        .build();

    let plan = plan(&db, &desired).await?;
    assert_eq!(plan.statements().len(), 2);
    assert!(plan.hints.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_data_check_becomes_a_hint() -> Result<()> {
    let db = populated_users().fail_on("SELECT 1 FROM \"users\"");
    let desired = SnapshotBuilder::new()
        .table(
            "users",
            vec![
                col("id", "integer").primary_key(),
                col("email", "text"),
                col("name", "text").not_null(),
            ],
        )
        .build();

    let plan = plan(&db, &desired).await?;
    assert_eq!(plan.hints.len(), 1);
    assert!(plan.hints[0].message.starts_with("could not check existing data"));
    Ok(())
}

#[tokio::test]
async fn test_new_tables_are_not_checked_for_data() -> Result<()> {
    let db = FakeDatabase::new();
    let desired = SnapshotBuilder::new()
        .table("posts", vec![col("id", "integer").primary_key()])
        .unique("posts", "posts_id_key", &["id"])
        .build();

    let plan = plan(&db, &desired).await?;
    assert!(plan.hints.is_empty());
    assert!(!db.queried().iter().any(|q| q.contains("FROM \"posts\"")));
    Ok(())
}
