//! Schema diffing and migration statement generation for PostgreSQL.
//!
//! Two [`ddl::Ddl`] snapshots go in; [`diff::diff`] returns the ordered steps
//! and SQL that turn one into the other. [`push::run`] drives the same diff
//! against a live database.

pub mod config;
pub mod constants;
pub mod db;
pub mod ddl;
pub mod diff;
pub mod error;
pub mod hints;
pub mod progress;
pub mod push;
pub mod render;
pub mod resolver;

pub use ddl::Ddl;
pub use diff::{DiffResult, Mode, diff};
pub use error::DiffError;
