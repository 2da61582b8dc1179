use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate ORSO file integrity
pub fn run(file: PathBuf) -> Result<()> {
    use orso::validator::validate_orso_file;

    info!("ORSO Validator");
    info!("File: {}", file.display());

    match validate_orso_file(&file) {
        Ok(report) => {
            println!("{}", report.format_colored());

            if report.has_failures() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {:#}", e);
            std::process::exit(1);
        }
    }
}
