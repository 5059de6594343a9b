//! proctor CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "proctor", version, about = "Timed exam runner for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed exam
    Take {
        /// Path to the .json quiz file
        #[arg(long)]
        quiz: PathBuf,

        /// Total test time in minutes (overrides config; default 20)
        #[arg(long)]
        minutes: Option<u32>,

        /// Output directory for report artifacts
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report formats to save: json, markdown, html, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Skip the end-test confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz JSON files
    Validate {
        /// Path to a quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Display a saved exam report
    Show {
        /// Report JSON produced by `proctor take`
        #[arg(long)]
        report: PathBuf,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("proctor=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            quiz,
            minutes,
            output,
            format,
            yes,
            config,
        } => commands::take::execute(quiz, minutes, output, format, yes, config).await,
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Show { report } => commands::show::execute(report),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
