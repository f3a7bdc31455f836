use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::ddl::{ColumnDefault, ColumnType, DefaultLiteral};
use pgdelta::diff::Mode;
use rstest::rstest;

#[test]
fn test_add_array_column_with_default() {
    let from = SnapshotBuilder::new()
        .table("test", vec![col("id", "integer")])
        .build();
    let mut values = col("values", "int4");
    values.column_type = ColumnType::new("int4").array(1);
    let values = values.with_default(ColumnDefault::array(vec![
        DefaultLiteral::Number("1".to_string()),
        DefaultLiteral::Number("2".to_string()),
        DefaultLiteral::Number("3".to_string()),
    ]));
    let to = SnapshotBuilder::new()
        .table("test", vec![col("id", "integer"), values])
        .build();

    assert_eq!(
        sql(&from, &to, &[]),
        vec!["ALTER TABLE \"test\" ADD COLUMN \"values\" int4[] DEFAULT '{1,2,3}'::int4[];"]
    );
}

#[test]
fn test_drop_column() {
    let from = SnapshotBuilder::new()
        .table("t", vec![col("a", "text"), col("b", "text")])
        .build();
    let to = SnapshotBuilder::new().table("t", vec![col("a", "text")]).build();

    let result = diff_with(&from, &to, &[], Mode::Default).unwrap();
    assert_eq!(result.sql_statements, vec!["ALTER TABLE \"t\" DROP COLUMN \"b\";"]);
    assert!(result.has_destructive_steps());
}

#[rstest]
#[case::set_not_null(false, true, "ALTER TABLE \"t\" ALTER COLUMN \"a\" SET NOT NULL;")]
#[case::drop_not_null(true, false, "ALTER TABLE \"t\" ALTER COLUMN \"a\" DROP NOT NULL;")]
fn test_nullability_change(#[case] before: bool, #[case] after: bool, #[case] expected: &str) {
    let column = |not_null: bool| {
        let c = col("a", "text");
        if not_null { c.not_null() } else { c }
    };
    let from = SnapshotBuilder::new().table("t", vec![column(before)]).build();
    let to = SnapshotBuilder::new().table("t", vec![column(after)]).build();

    assert_eq!(sql(&from, &to, &[]), vec![expected]);
}

#[test]
fn test_type_change_is_destructive() {
    let from = SnapshotBuilder::new().table("t", vec![col("a", "int4")]).build();
    let to = SnapshotBuilder::new().table("t", vec![col("a", "text")]).build();

    let result = diff_with(&from, &to, &[], Mode::Default).unwrap();
    assert_eq!(
        result.sql_statements,
        vec!["ALTER TABLE \"t\" ALTER COLUMN \"a\" SET DATA TYPE text;"]
    );
    assert!(result.has_destructive_steps());
}

#[rstest]
#[case::integer_alias("integer", "int4")]
#[case::varchar_alias("character varying(256)", "varchar(256)")]
#[case::timestamptz_alias("timestamp with time zone", "timestamptz")]
#[case::bool_alias("boolean", "bool")]
fn test_type_aliases_compare_equal(#[case] declared: &str, #[case] reported: &str) {
    let from = SnapshotBuilder::new().table("t", vec![col("a", reported)]).build();
    let to = SnapshotBuilder::new().table("t", vec![col("a", declared)]).build();

    assert!(sql(&from, &to, &[]).is_empty());
}

#[test]
fn test_numeric_defaults_compare_by_value() {
    let from = SnapshotBuilder::new()
        .table(
            "t",
            vec![col("price", "numeric").with_default(ColumnDefault::number("10.10"))],
        )
        .build();
    let to = SnapshotBuilder::new()
        .table(
            "t",
            vec![col("price", "numeric").with_default(ColumnDefault::number("10.1"))],
        )
        .build();

    assert!(sql(&from, &to, &[]).is_empty());
}

#[rstest]
#[case::bigint("int8", "'5000000000'::bigint", ColumnDefault::number(5000000000i64))]
#[case::negative("int4", "'-1'::integer", ColumnDefault::number(-1))]
fn test_quoted_number_defaults_from_database_are_up_to_date(
    #[case] type_name: &str,
    #[case] introspected: &str,
    #[case] declared: ColumnDefault,
    #[values(Mode::Default, Mode::Push)] mode: Mode,
) {
    let from = SnapshotBuilder::new()
        .table(
            "t",
            vec![col("id", type_name).with_default(ColumnDefault::expression(introspected))],
        )
        .build();
    let to = SnapshotBuilder::new()
        .table("t", vec![col("id", type_name).with_default(declared)])
        .build();

    let result = diff_with(&from, &to, &[], mode).unwrap();
    assert!(result.is_empty(), "unexpected statements: {:?}", result.sql_statements);
}

#[test]
fn test_generated_expression_text_only_counts_in_default_mode() {
    let from = SnapshotBuilder::new()
        .table(
            "t",
            vec![col("a", "int4"), col("b", "int4").generated_as("a * 2")],
        )
        .build();
    let to = SnapshotBuilder::new()
        .table(
            "t",
            vec![col("a", "int4"), col("b", "int4").generated_as("(a * 2)")],
        )
        .build();

    let pushed = diff_with(&from, &to, &[], Mode::Push).unwrap();
    assert!(pushed.is_empty());

    let declared = diff_with(&from, &to, &[], Mode::Default).unwrap();
    assert_eq!(
        declared.sql_statements,
        vec![
            "ALTER TABLE \"t\" DROP COLUMN \"b\";",
            "ALTER TABLE \"t\" ADD COLUMN \"b\" int4 GENERATED ALWAYS AS ((a * 2)) STORED;",
        ]
    );
}

#[test]
fn test_primary_key_column_is_implicitly_not_null() {
    let from = SnapshotBuilder::new()
        .table("t", vec![col("id", "int4").not_null()])
        .primary_key("t", "t_pkey", &["id"])
        .build();
    let to = SnapshotBuilder::new()
        .table("t", vec![col("id", "int4").primary_key()])
        .build();

    assert!(sql(&from, &to, &[]).is_empty());
}

#[test]
fn test_serial_column_is_implicitly_not_null() {
    let from = SnapshotBuilder::new()
        .table("t", vec![col("id", "serial").not_null()])
        .build();
    let to = SnapshotBuilder::new().table("t", vec![col("id", "serial")]).build();

    assert!(sql(&from, &to, &[]).is_empty());
}

#[test]
fn test_undeclared_column_rename_is_drop_and_add() {
    let from = SnapshotBuilder::new().table("t", vec![col("a", "text")]).build();
    let to = SnapshotBuilder::new().table("t", vec![col("b", "text")]).build();

    assert_eq!(
        sql(&from, &to, &[]),
        vec![
            "ALTER TABLE \"t\" DROP COLUMN \"a\";",
            "ALTER TABLE \"t\" ADD COLUMN \"b\" text;",
        ]
    );
}

#[test]
fn test_declared_column_rename_carries_check_constraint() {
    let build = |column: &str, check: &str| {
        SnapshotBuilder::new()
            .table("users", vec![col(column, "int4")])
            .check("users", "users_age_check", check)
            .build()
    };

    assert_eq!(
        sql(
            &build("age", "(age >= 0)"),
            &build("years", "(years >= 0)"),
            &["public.users.age->public.users.years"],
        ),
        vec!["ALTER TABLE \"users\" RENAME COLUMN \"age\" TO \"years\";"]
    );
}
