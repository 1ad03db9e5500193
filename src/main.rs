mod handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tend::engine::locale::Locale;
use tend::engine::vault::DEFAULT_MARKER_TAG;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tend", version, about = "Recurring maintenance tasks in markdown notes")]
struct Cli {
    /// Vault directory to scan
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Frontmatter tag that marks a recurring-task note
    #[arg(long, global = true, default_value = DEFAULT_MARKER_TAG)]
    tag: String,

    /// Display locale (en, de)
    #[arg(long, global = true, default_value = "en")]
    locale: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// List every recurring task with its status
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show only tasks that are due, overdue, or never completed
    Due {
        #[arg(long)]
        json: bool,
    },
    /// Run a filter query (e.g. "status:overdue OR status:due-soon; limit:5")
    Query {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark a task complete by name
    Complete {
        task: String,
        /// Complete even outside the early-completion window
        #[arg(long)]
        force: bool,
    },
    /// Show per-category counts for the vault
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let locale = Locale::parse(&cli.locale);
    let now = chrono::Local::now().format("%Y-%m-%d").to_string();

    match cli.command {
        Commands::Complete { .. } => dispatch_write_ops(&cli, locale, &now),
        Commands::List { .. }
        | Commands::Due { .. }
        | Commands::Query { .. }
        | Commands::Status { .. } => dispatch_read_ops(&cli, locale, &now),
    }
}

fn dispatch_write_ops(cli: &Cli, locale: Locale, now: &str) -> Result<()> {
    match &cli.command {
        Commands::Complete { task, force } => {
            handlers::complete::handle(&cli.vault, &cli.tag, locale, now, task, *force)
        }
        _ => unreachable!("Invalid write command dispatch"),
    }
}

fn dispatch_read_ops(cli: &Cli, locale: Locale, now: &str) -> Result<()> {
    match &cli.command {
        Commands::List { json } => handlers::list::handle(&cli.vault, &cli.tag, locale, now, *json),
        Commands::Due { json } => handlers::due::handle(&cli.vault, &cli.tag, locale, now, *json),
        Commands::Query { query, json } => {
            handlers::query::handle(&cli.vault, &cli.tag, locale, now, query, *json)
        }
        Commands::Status { json } => handlers::status::handle(&cli.vault, &cli.tag, now, *json),
        Commands::Complete { .. } => unreachable!("Invalid read command dispatch"),
    }
}
