use anyhow::{Context, Result};
use std::path::PathBuf;

use orso::dataset::OrsoDataset;
use orso::header::DataSetId;
use orso::nexus::load_nexus_file;
use orso::ort::load_orso_file;
use orso::resolve::{ResolutionWarning, Value};
use orso::validator::{detect_format, FileFormat};

/// Display information about an ORSO file
pub fn run(file: PathBuf, show_warnings: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let (kind, version, comment, datasets, warnings) = match detect_format(&file) {
        Some(FileFormat::Text) => {
            let ort = load_orso_file(&file).context("Failed to read text file")?;
            ("text (.ort)", ort.version, ort.comment, ort.datasets, ort.warnings)
        }
        Some(FileFormat::Hierarchical) => {
            let nexus = load_nexus_file(&file).context("Failed to read hierarchical file")?;
            ("hierarchical (.orb)", nexus.version, nexus.comment, nexus.datasets, nexus.warnings)
        }
        None => anyhow::bail!("{} is not an ORSO file", file.display()),
    };

    println!("ORSO File Information");
    println!("=====================");
    println!("File: {}", file.display());
    println!("Encoding: {}", kind);
    println!("ORSO version: {}", version);
    if let Some(comment) = comment {
        println!("Comment: {}", comment);
    }
    println!("Datasets: {}", datasets.len());
    println!();

    for (i, dataset) in datasets.iter().enumerate() {
        print_dataset(i, dataset);
    }

    print_warnings(&warnings, show_warnings);
    Ok(())
}

fn print_dataset(index: usize, dataset: &OrsoDataset) {
    let id = dataset.data_set().unwrap_or(DataSetId::Index(index as i64));
    let info = dataset.info();
    let text = |path: &str| info.path(path).and_then(Value::as_str).unwrap_or("-").to_string();

    println!("Dataset {}:", id);
    println!("  Sample: {}", text("data_source.sample.name"));
    println!("  Instrument: {}", text("data_source.experiment.instrument"));
    println!("  Owner: {}", text("data_source.owner.name"));
    println!("  Rows: {}", dataset.data().num_rows());
    println!("  Columns:");
    for (i, column) in dataset.columns().iter().enumerate() {
        println!("    {:3}. {}", i + 1, column);
    }
    if !info.extra().is_empty() {
        let keys: Vec<&str> = info.extra().keys().map(String::as_str).collect();
        println!("  Extra fields: {}", keys.join(", "));
    }
    println!();
}

fn print_warnings(warnings: &[ResolutionWarning], show: bool) {
    if warnings.is_empty() {
        return;
    }
    if show {
        println!("Warnings:");
        for warning in warnings {
            println!("  {}", warning);
        }
    } else {
        println!("{} warnings (use --warnings to list them)", warnings.len());
    }
}
