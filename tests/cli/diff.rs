//! End-to-end tests for `pgdelta diff` on snapshot files.

use crate::helpers::builders::{SnapshotBuilder, col};
use anyhow::Result;
use assert_cmd::Command;
use pgdelta::ddl::Ddl;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    fn snapshot(&self, name: &str, ddl: &Ddl) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, ddl.to_json()?)?;
        Ok(path)
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs inside the project directory so no stray pgdelta.yaml is picked up.
    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pgdelta").unwrap();
        cmd.current_dir(self.path()).env_remove("RUST_LOG");
        cmd
    }
}

fn users() -> Ddl {
    SnapshotBuilder::new()
        .table(
            "users",
            vec![col("id", "integer").primary_key(), col("email", "text").not_null()],
        )
        .build()
}

#[test]
fn test_diff_prints_statements() -> Result<()> {
    let project = Project::new()?;
    let from = project.snapshot("from.json", &Ddl::new())?;
    let to = project.snapshot("to.json", &users())?;

    project
        .command()
        .arg("diff")
        .arg("--from")
        .arg(&from)
        .arg("--to")
        .arg(&to)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CREATE TABLE \"users\" ("));
    Ok(())
}

#[test]
fn test_diff_without_from_starts_empty() -> Result<()> {
    let project = Project::new()?;
    let to = project.snapshot("to.json", &users())?;

    project
        .command()
        .arg("diff")
        .arg("--to")
        .arg(&to)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\" text NOT NULL"));
    Ok(())
}

#[test]
fn test_exit_code_reports_differences() -> Result<()> {
    let project = Project::new()?;
    let to = project.snapshot("to.json", &users())?;

    project
        .command()
        .args(["diff", "--exit-code", "--to"])
        .arg(&to)
        .assert()
        .code(1);

    project
        .command()
        .args(["diff", "--exit-code", "--from"])
        .arg(&to)
        .arg("--to")
        .arg(&to)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_summary_of_identical_snapshots() -> Result<()> {
    let project = Project::new()?;
    let snapshot = project.snapshot("same.json", &users())?;

    project
        .command()
        .args(["diff", "--format", "summary", "--from"])
        .arg(&snapshot)
        .arg("--to")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences found"));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let project = Project::new()?;
    let to = project.snapshot("to.json", &users())?;

    let output = project
        .command()
        .args(["diff", "--format", "json", "--to"])
        .arg(&to)
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let statements = json["sql_statements"].as_array().expect("statement list");
    assert_eq!(statements.len(), 1);
    assert_eq!(json["grouped"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_output_file() -> Result<()> {
    let project = Project::new()?;
    let to = project.snapshot("to.json", &users())?;
    let out = project.path().join("plan.sql");

    project
        .command()
        .args(["diff", "--to"])
        .arg(&to)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out)?;
    assert!(written.starts_with("CREATE TABLE \"users\""));
    assert!(written.ends_with(";\n"));
    Ok(())
}

#[test]
fn test_declared_rename_flag() -> Result<()> {
    let project = Project::new()?;
    let from = project.snapshot("from.json", &users())?;
    let renamed = SnapshotBuilder::new()
        .table(
            "accounts",
            vec![col("id", "integer").primary_key(), col("email", "text").not_null()],
        )
        .build();
    let to = project.snapshot("to.json", &renamed)?;

    project
        .command()
        .args(["diff", "--rename", "public.users->public.accounts", "--from"])
        .arg(&from)
        .arg("--to")
        .arg(&to)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ALTER TABLE \"users\" RENAME TO \"accounts\";",
        ))
        .stdout(predicate::str::contains("DROP TABLE").not());
    Ok(())
}

#[test]
fn test_invalid_rename_is_rejected() -> Result<()> {
    let project = Project::new()?;
    let to = project.snapshot("to.json", &users())?;

    project
        .command()
        .args(["diff", "--rename", "public.users", "--to"])
        .arg(&to)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid rename declaration"));
    Ok(())
}

#[test]
fn test_renames_from_config_file() -> Result<()> {
    let project = Project::new()?;
    let from = project.snapshot("from.json", &users())?;
    let renamed = SnapshotBuilder::new()
        .table(
            "accounts",
            vec![col("id", "integer").primary_key(), col("email", "text").not_null()],
        )
        .build();
    let to = project.snapshot("to.json", &renamed)?;
    fs::write(
        project.path().join("pgdelta.yaml"),
        "diff:\n  renames:\n    - public.users->public.accounts\n",
    )?;

    project
        .command()
        .args(["diff", "--from"])
        .arg(&from)
        .arg("--to")
        .arg(&to)
        .assert()
        .success()
        .stdout(predicate::str::contains("RENAME TO \"accounts\""));
    Ok(())
}

#[test]
fn test_missing_snapshot_file() -> Result<()> {
    let project = Project::new()?;

    project
        .command()
        .args(["diff", "--to", "absent.json", "--config-file"])
        .arg(project.path().join("none.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
    Ok(())
}
