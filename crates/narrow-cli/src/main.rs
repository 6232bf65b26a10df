use std::path::PathBuf;

use clap::{Parser, Subcommand};
use narrow_cli::cli::{run_command, snapshot_path, CliCommand, Snapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "narrow-cli")]
#[command(about = "Reconcile message narrows against a local client snapshot")]
struct Cli {
    /// Path to JSON snapshot file (messages, unread data, current user)
    #[arg(long, short = 's', global = true)]
    snapshot: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Log reconciliation decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parsed terms of a narrow
    Parse {
        /// Narrow, e.g. "stream:general topic:lunch"
        narrow: String,
    },

    /// Decide what to select for a narrow before fetching
    Reconcile {
        /// Narrow, e.g. "stream:general topic:lunch"
        narrow: String,
        /// Message id the caller wants to view
        #[arg(long, short = 't')]
        target: Option<u64>,
    },

    /// Show the first unread message of a narrow
    Unread {
        /// Narrow, e.g. "is:dm"
        narrow: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = match cli.command {
        Some(Commands::Parse { narrow }) => CliCommand::Parse { narrow },
        Some(Commands::Reconcile { narrow, target }) => CliCommand::Reconcile {
            narrow,
            target_id: target,
        },
        Some(Commands::Unread { narrow }) => CliCommand::Unread { narrow },
        None => {
            // No command - show help
            eprintln!("No command specified. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let snapshot = load_snapshot(cli.snapshot, command.needs_snapshot());

    let output = match run_command(&command, snapshot.as_ref()) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: failed to render output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Load the snapshot from `--snapshot` or the environment
fn load_snapshot(cli_arg: Option<PathBuf>, required: bool) -> Option<Snapshot> {
    let Some(path) = snapshot_path(cli_arg) else {
        if required {
            tracing::warn!("no snapshot given");
        }
        return None;
    };

    match Snapshot::load(&path) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
