//! Live reconciliation: introspect, diff in push mode, apply.
//!
//! [`run`] does everything in one call. Callers that want to show the plan
//! or ask for confirmation first use [`plan`] and [`execute`] separately.

use crate::config::EntityFilter;
use crate::db::Database;
use crate::db::introspect::introspect;
use crate::ddl::Ddl;
use crate::diff::{self, DiffResult, Mode};
use crate::error::DiffError;
use crate::hints::{self, Hint};
use crate::progress::ProgressReporter;
use crate::resolver::Resolvers;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    pub filter: EntityFilter,
    /// Re-introspect after applying and fail if anything still differs.
    pub verify: bool,
}

/// What a push would do, computed against the live database.
#[derive(Debug, Clone)]
pub struct PushPlan {
    pub result: DiffResult,
    pub hints: Vec<Hint>,
    /// The filtered target snapshot.
    pub desired: Ddl,
}

impl PushPlan {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn statements(&self) -> &[String] {
        &self.result.sql_statements
    }
}

#[derive(Debug, Clone, Default)]
pub struct PushReport {
    pub statements: Vec<String>,
    pub hints: Vec<Hint>,
}

/// Brings the database behind `db` to `desired`.
pub async fn run<D: Database>(
    db: &D,
    desired: &Ddl,
    resolvers: &Resolvers<'_>,
    options: &PushOptions,
    progress: &dyn ProgressReporter,
) -> Result<PushReport> {
    let plan = plan(db, desired, resolvers, options, progress).await?;
    execute(db, &plan, options, progress).await?;
    Ok(PushReport {
        statements: plan.result.sql_statements,
        hints: plan.hints,
    })
}

pub async fn plan<D: Database>(
    db: &D,
    desired: &Ddl,
    resolvers: &Resolvers<'_>,
    options: &PushOptions,
    progress: &dyn ProgressReporter,
) -> Result<PushPlan> {
    let desired = options.filter.apply(desired.clone());
    let current = introspect(db, &options.filter, progress).await?;

    let result = diff::diff(&current, &desired, resolvers, Mode::Push)?;
    if result.is_empty() {
        info!("Database is up to date");
        return Ok(PushPlan {
            result,
            hints: Vec::new(),
            desired,
        });
    }
    info!(
        "Found {} step{}",
        result.steps.len(),
        if result.steps.len() == 1 { "" } else { "s" }
    );

    let hints = hints::suggestions(db, &result.steps).await;
    Ok(PushPlan {
        result,
        hints,
        desired,
    })
}

/// Executes a plan statement by statement, then verifies if asked to.
pub async fn execute<D: Database>(
    db: &D,
    plan: &PushPlan,
    options: &PushOptions,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    if plan.is_empty() {
        return Ok(());
    }
    apply(db, &plan.result, progress).await?;
    if options.verify {
        verify(db, &plan.desired, &options.filter, progress).await?;
    }
    Ok(())
}

async fn apply<D: Database>(
    db: &D,
    result: &DiffResult,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    const STAGE: &str = "Applying changes";
    let started = Instant::now();
    progress.start_stage(STAGE);

    let total = result.sql_statements.len();
    let mut current = 0;
    for group in &result.grouped {
        for sql in &group.sql_statements {
            current += 1;
            progress.step(current, total, &group.description);
            if let Err(e) = db
                .execute(sql)
                .await
                .with_context(|| format!("Failed to {}", group.description))
            {
                progress.fail_stage(STAGE, &e);
                return Err(e);
            }
        }
    }

    progress.complete_stage(STAGE, started.elapsed(), Some(total));
    Ok(())
}

/// A second push against the freshly applied schema must be a no-op.
async fn verify<D: Database>(
    db: &D,
    desired: &Ddl,
    filter: &EntityFilter,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    info!("Verifying database state...");
    let after = introspect(db, filter, progress)
        .await
        .context("Failed to introspect database for verification")?;
    let residual = diff::diff(&after, desired, &Resolvers::none(), Mode::Push)?;
    if residual.is_empty() {
        info!("Verification passed");
        Ok(())
    } else {
        Err(DiffError::ResidualDiff(residual.sql_statements).into())
    }
}
