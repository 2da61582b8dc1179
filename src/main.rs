//! # orso
//!
//! Command-line companion of the `orso` library.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a file
//! orso info data.ort
//!
//! # Integrity report
//! orso validate data.orb
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
