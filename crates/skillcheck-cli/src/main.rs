//! skillcheck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skillcheck",
    version,
    about = "Clinical-skills competency tracking for medical-education programs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter roster and data directory
    Init {
        /// Directory to initialize
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Validate roster TOML files
    Validate {
        /// Path to a roster .toml file or directory
        #[arg(long)]
        roster: PathBuf,
    },

    /// Import a roster TOML into the data directory
    Import {
        /// Path to a roster .toml file or directory
        #[arg(long)]
        roster: PathBuf,

        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Run a scored, PIN-verified assessment
    Assess {
        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Student id
        #[arg(long)]
        student: String,

        /// Checklist id; omit to see popular checklists
        #[arg(long)]
        checklist: Option<String>,

        /// Assessor id
        #[arg(long)]
        assessor: String,

        /// Comma-separated per-step scores, 0/1/2 (e.g. "2,1,0,2")
        #[arg(long)]
        scores: String,

        /// The assessor's verification PIN
        #[arg(long)]
        pin: String,
    },

    /// Show dashboard aggregates
    Dashboard {
        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// List assessment results with attempt numbers
    Results {
        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Filter by student, checklist, assessor or record id
        #[arg(long)]
        search: Option<String>,
    },

    /// Manage OSCE exam sessions
    #[command(subcommand)]
    Osce(commands::osce::OsceCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillcheck_core=info".parse().unwrap())
                .add_directive("skillcheck_store=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { dir } => commands::init::execute(dir),
        Commands::Validate { roster } => commands::validate::execute(roster),
        Commands::Import { roster, data_dir } => commands::import::execute(roster, data_dir),
        Commands::Assess {
            data_dir,
            student,
            checklist,
            assessor,
            scores,
            pin,
        } => commands::assess::execute(data_dir, student, checklist, assessor, scores, pin).await,
        Commands::Dashboard { data_dir } => commands::dashboard::execute(data_dir).await,
        Commands::Results { data_dir, search } => commands::results::execute(data_dir, search).await,
        Commands::Osce(command) => commands::osce::execute(command).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
