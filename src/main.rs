mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::diff::DiffCommand;
use commands::push::{PushCommand, PushOutcome};
use commands::DiffFormat;
use dotenv::dotenv;
use pgdelta::config::{self, ConfigBuilder, ConfigInput, DiffInput};
use pgdelta::constants::DEFAULT_CONFIG_FILE;
use pgdelta::progress::{ConsoleReporter, ProgressReporter, SilentReporter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for pgdelta diff (snapshot vs snapshot)
#[derive(Parser, Debug)]
#[group(skip)]
struct DiffArgs {
    /// Snapshot the database is currently at (defaults to an empty database)
    #[arg(long)]
    from: Option<PathBuf>,

    /// Snapshot to migrate to
    #[arg(long)]
    to: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "sql")]
    format: DiffFormat,

    /// Write the output to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Exit with code 1 when the snapshots differ
    #[arg(long)]
    exit_code: bool,

    #[command(flatten)]
    diff_args: config::DiffArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,
}

/// Arguments for pgdelta push (snapshot vs live database)
#[derive(Parser, Debug)]
struct PushArgs {
    /// Snapshot to bring the database to
    #[arg(long)]
    to: PathBuf,

    /// Re-introspect after applying and fail if anything still differs
    #[arg(long)]
    verify: bool,

    /// Ask on the terminal whether new entities are renames
    #[arg(long)]
    interactive: bool,

    /// Show the plan and hints without applying anything
    #[arg(long)]
    dry_run: bool,

    /// Apply destructive changes without confirmation
    #[arg(long)]
    force: bool,

    #[arg(long = "rename", value_name = "OLD->NEW", help = "Declare a rename")]
    renames: Vec<String>,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,
}

/// Arguments for pgdelta introspect
#[derive(Parser, Debug)]
struct IntrospectArgs {
    /// Write the snapshot to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the statements that turn one snapshot into another
    Diff(DiffArgs),

    /// Apply a snapshot to a live database
    Push(PushArgs),

    /// Print the schema of a live database as a snapshot
    Introspect(IntrospectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    tokio::select! {
        result = run_main(cli) => result,
        _ = wait_for_shutdown_signal() => {
            info!("Received shutdown signal, stopping...");
            Ok(())
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_reporter(cli: &Cli) -> Box<dyn ProgressReporter> {
    if cli.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::new(cli.verbose || cli.debug))
    }
}

async fn run_main(cli: Cli) -> Result<()> {
    let file_config = config::load_config(&cli.config_file)?;
    let progress = progress_reporter(&cli);

    match &cli.command {
        Commands::Diff(args) => {
            let cli_config = ConfigInput {
                database: None,
                objects: Some(args.object_filter_args.clone().into()),
                migrations: None,
                diff: Some(args.diff_args.clone().into()),
            };

            let config = ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            let command = DiffCommand {
                from: args.from.clone(),
                to: args.to.clone(),
                format: args.format.clone(),
                output: args.output.clone(),
            };

            info!("Diffing snapshot files");
            let differs = commands::cmd_diff(&config, &command)?;
            if differs && args.exit_code {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Push(args) => {
            let cli_config = ConfigInput {
                database: Some(args.database_args.clone().into()),
                objects: Some(args.object_filter_args.clone().into()),
                migrations: None,
                diff: Some(DiffInput {
                    mode: None,
                    renames: (!args.renames.is_empty()).then(|| args.renames.clone()),
                    verify: args.verify.then_some(true),
                }),
            };

            let config = ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            let command = PushCommand {
                to: args.to.clone(),
                interactive: args.interactive,
                dry_run: args.dry_run,
                force: args.force,
            };

            info!("Pushing snapshot to database");
            match commands::cmd_push(&config, &command, progress.as_ref()).await? {
                PushOutcome::Cancelled => std::process::exit(2),
                PushOutcome::NoChanges | PushOutcome::Applied | PushOutcome::DryRun => Ok(()),
            }
        }
        Commands::Introspect(args) => {
            let cli_config = ConfigInput {
                database: Some(args.database_args.clone().into()),
                objects: Some(args.object_filter_args.clone().into()),
                migrations: None,
                diff: None,
            };

            let config = ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            info!("Introspecting database");
            commands::cmd_introspect(&config, args.output.as_deref(), progress.as_ref()).await
        }
    }
}
