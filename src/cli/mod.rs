use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod info;
mod validate;

/// orso - inspect and validate ORSO reflectivity files
#[derive(Parser)]
#[command(name = "orso")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version, comment, datasets and columns of a .ort or .orb file
    Info {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also print the resolution warnings
        #[arg(short, long)]
        warnings: bool,
    },

    /// Check file integrity and report ok/warning/failed checks
    Validate {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file, warnings } => info::run(file, warnings),
        Commands::Validate { file } => validate::run(file),
    }
}
