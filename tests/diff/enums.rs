use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::ddl::{ColumnDefault, ColumnType, Ddl};
use pgdelta::diff::{self, Mode};
use pgdelta::resolver::Resolvers;
use rstest::rstest;

fn mood(values: &[&str]) -> Ddl {
    SnapshotBuilder::new().enum_type("mood", values).build()
}

#[test]
fn test_create_enum() {
    assert_eq!(
        sql(&Ddl::new(), &mood(&["a", "b"]), &[]),
        vec!["CREATE TYPE \"mood\" AS ENUM('a', 'b');"]
    );
}

#[rstest]
#[case::append(&["a", "b"], &["a", "b", "c"], &["ALTER TYPE \"mood\" ADD VALUE 'c';"])]
#[case::insert_before(&["a", "c"], &["a", "b", "c"], &["ALTER TYPE \"mood\" ADD VALUE 'b' BEFORE 'c';"])]
#[case::prepend_and_append(
    &["b"],
    &["a", "b", "c"],
    &["ALTER TYPE \"mood\" ADD VALUE 'a' BEFORE 'b';", "ALTER TYPE \"mood\" ADD VALUE 'c';"]
)]
fn test_added_values(#[case] before: &[&str], #[case] after: &[&str], #[case] expected: &[&str]) {
    assert_eq!(sql(&mood(before), &mood(after), &[]), expected);
}

fn users_with_mood(values: &[&str], default: &str) -> Ddl {
    let mut column = col("mood", "mood").with_default(ColumnDefault::string(default));
    column.column_type = ColumnType::user_defined("public", "mood");
    SnapshotBuilder::new()
        .enum_type("mood", values)
        .table("users", vec![col("id", "integer"), column])
        .build()
}

#[test]
fn test_reorder_recreates_type_around_dependent_columns() {
    let from = users_with_mood(&["sad", "happy"], "sad");
    let to = users_with_mood(&["happy", "sad"], "happy");

    let result = diff_with(&from, &to, &[], Mode::Default).unwrap();
    assert_eq!(
        result.sql_statements,
        vec![
            "ALTER TABLE \"users\" ALTER COLUMN \"mood\" DROP DEFAULT;",
            "ALTER TABLE \"users\" ALTER COLUMN \"mood\" SET DATA TYPE text;",
            "DROP TYPE \"mood\";",
            "CREATE TYPE \"mood\" AS ENUM('happy', 'sad');",
            "ALTER TABLE \"users\" ALTER COLUMN \"mood\" SET DATA TYPE \"mood\" USING \"mood\"::\"mood\";",
            "ALTER TABLE \"users\" ALTER COLUMN \"mood\" SET DEFAULT 'happy'::\"mood\";",
        ]
    );

    let again = diff::diff(&result.next, &to, &Resolvers::none(), Mode::Push).unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_removed_value_recreates_type() {
    let result = diff_with(&mood(&["a", "b", "c"]), &mood(&["a", "c"]), &[], Mode::Default).unwrap();
    assert_eq!(
        result.sql_statements,
        vec!["DROP TYPE \"mood\";", "CREATE TYPE \"mood\" AS ENUM('a', 'c');"]
    );
}

#[test]
fn test_declared_enum_rename() {
    let from = mood(&["a"]);
    let to = SnapshotBuilder::new().enum_type("feeling", &["a"]).build();

    assert_eq!(
        sql(&from, &to, &["public.mood->public.feeling"]),
        vec!["ALTER TYPE \"mood\" RENAME TO \"feeling\";"]
    );
}
