use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pushjobs::config::Config;
use pushjobs::selection::Direction;

mod cli;

#[derive(Parser)]
#[command(name = "pushjobs")]
#[command(about = "Inspect the jobs of a CI push: filtering, counts and intermittent failures")]
#[command(version)]
struct Cli {
    /// Working directory used to find .pushjobs/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the visible platform rows of a push
    Show {
        /// Push data JSON file
        push: PathBuf,

        /// Only show jobs matching every search term
        #[arg(long)]
        search: Vec<String>,

        /// Task run ("<taskId>.<runId>") to select
        #[arg(long)]
        selected_task_run: Option<String>,

        /// Expand all groups
        #[arg(long)]
        expanded: bool,

        /// Show duplicate jobs instead of folding them into counts
        #[arg(long)]
        duplicates: bool,

        /// Show runnable jobs
        #[arg(long)]
        runnable: bool,

        /// Only show unclassified failures
        #[arg(long)]
        unclassified: bool,
    },

    /// List intermittent job types per group
    Intermittent {
        /// Push data JSON file
        push: PathBuf,
    },

    /// Parse a task-run string
    TaskRun {
        /// "<taskId>.<runId>"
        value: String,
    },

    /// Select the next job
    Next {
        /// Push data JSON file
        push: PathBuf,

        /// Currently selected task run
        #[arg(long)]
        from: Option<String>,

        /// Only walk unclassified failures
        #[arg(long)]
        unclassified: bool,
    },

    /// Select the previous job
    Prev {
        /// Push data JSON file
        push: PathBuf,

        /// Currently selected task run
        #[arg(long)]
        from: Option<String>,

        /// Only walk unclassified failures
        #[arg(long)]
        unclassified: bool,
    },

    /// Initialize a new .pushjobs/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(&work_dir, force).await;
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_dir(&work_dir)?,
    };

    match cli.command {
        Commands::Show {
            push,
            search,
            selected_task_run,
            expanded,
            duplicates,
            runnable,
            unclassified,
        } => {
            let options = cli::show::ShowOptions {
                search,
                selected_task_run,
                expanded,
                duplicates,
                runnable,
                unclassified,
            };
            cli::show::show_command(&push, &config, options).await?;
        }
        Commands::Intermittent { push } => {
            cli::intermittent::intermittent_command(&push).await?;
        }
        Commands::TaskRun { value } => {
            cli::task_run::task_run_command(&value)?;
        }
        Commands::Next {
            push,
            from,
            unclassified,
        } => {
            cli::nav::nav_command(&push, &config, Direction::Next, from, unclassified).await?;
        }
        Commands::Prev {
            push,
            from,
            unclassified,
        } => {
            cli::nav::nav_command(&push, &config, Direction::Previous, from, unclassified).await?;
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}
