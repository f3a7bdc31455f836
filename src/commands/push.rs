//! pgdelta push - reconcile a live database with a snapshot

use super::{database_url, declared_renames, output, read_snapshot};
use anyhow::{Result, bail};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use pgdelta::config::Config;
use pgdelta::db::PgDatabase;
use pgdelta::progress::ProgressReporter;
use pgdelta::push::{self, PushOptions};
use pgdelta::resolver::{InteractiveResolver, Resolvers};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PushCommand {
    pub to: PathBuf,
    pub interactive: bool,
    pub dry_run: bool,
    /// Apply destructive statements without asking.
    pub force: bool,
}

/// Outcome used for the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    NoChanges,
    Applied,
    DryRun,
    Cancelled,
}

pub async fn cmd_push(
    config: &Config,
    args: &PushCommand,
    progress: &dyn ProgressReporter,
) -> Result<PushOutcome> {
    let desired = read_snapshot(&args.to)?;
    let db = PgDatabase::connect(database_url(config)?).await?;

    let options = PushOptions {
        filter: config.filter(),
        verify: config.diff.verify,
    };

    let declared = declared_renames(config)?;
    let interactive = InteractiveResolver;
    let resolvers = if args.interactive {
        Resolvers::uniform(&interactive)
    } else {
        Resolvers::uniform(&declared)
    };

    let plan = push::plan(&db, &desired, &resolvers, &options, progress).await?;
    if plan.is_empty() {
        println!("✅ No schema changes detected - database is up to date");
        return Ok(PushOutcome::NoChanges);
    }

    output::print_plan_header(&plan.result);
    if tracing::enabled!(tracing::Level::DEBUG) || args.dry_run {
        output::print_statements(&plan.result);
    } else {
        output::print_concise_plan(&plan.result);
    }
    output::print_hints(&plan.hints);

    if args.dry_run {
        println!("\n🔍 Dry run: no changes applied");
        return Ok(PushOutcome::DryRun);
    }

    if plan.result.has_destructive_steps() && !args.force {
        if !std::io::stdin().is_terminal() {
            bail!("Plan contains destructive changes; re-run with --force to apply them");
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Apply destructive changes?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("❌ Cancelled");
            return Ok(PushOutcome::Cancelled);
        }
    }

    push::execute(&db, &plan, &options, progress).await?;
    info!("Push complete");
    println!(
        "\n✅ Applied {} statement{}",
        plan.statements().len(),
        if plan.statements().len() == 1 { "" } else { "s" }
    );
    Ok(PushOutcome::Applied)
}
