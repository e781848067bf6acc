//! # viewstack
//!
//! Validate navigation graphs and replay navigation scripts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use viewstack::cli::{cmd_check, cmd_list, cmd_replay, GraphOptions};
use viewstack::demo::DEMO_NAMESPACE;
use viewstack::error::CliError;
use viewstack::replay::ReplayOptions;

#[derive(Parser)]
#[command(name = "viewstack")]
#[command(about = "In-place view-stack navigator: graph checks and script replay")]
#[command(version)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Namespace that `.Name` controller references expand into
    #[arg(long, global = true, default_value = DEMO_NAMESPACE)]
    namespace: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a graph document and print its destinations
    Check {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the built-in controllers
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Replay a navigation script against a graph
    Replay {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Navigation script
        script: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Record navigation errors and continue
        #[arg(long)]
        keep_going: bool,

        /// Complete every effect right after each line
        #[arg(long)]
        auto_complete: bool,

        /// Ignore the graph's transition effects
        #[arg(long)]
        no_effects: bool,

        /// Override every effect duration (milliseconds)
        #[arg(long)]
        effect_ms: Option<u32>,

        /// Run on a timer so effects overlap with later lines
        #[arg(long)]
        timed: bool,

        /// Milliseconds between lines in timed mode
        #[arg(long, default_value_t = 50)]
        step_ms: u64,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut graph_options = GraphOptions::new(cli.namespace);

    match cli.command {
        Commands::Check { graph, json } => {
            cmd_check(&graph, &graph_options, json)?;
        }
        Commands::List { json } => {
            cmd_list(json)?;
        }
        Commands::Replay {
            graph,
            script,
            json,
            keep_going,
            auto_complete,
            no_effects,
            effect_ms,
            timed,
            step_ms,
        } => {
            graph_options.no_effects = no_effects;
            graph_options.effect_ms = effect_ms;
            let options = ReplayOptions {
                keep_going,
                auto_complete,
                timed: timed.then(|| Duration::from_millis(step_ms)),
            };
            cmd_replay(&graph, &script, &graph_options, options, json)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
