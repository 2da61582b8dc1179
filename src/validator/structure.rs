use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use zip::ZipArchive;

use crate::ort::parse_magic_line;
use crate::schema::{ORB_EXTENSION, ORB_MIMETYPE, ORT_EXTENSION};

use super::{FileFormat, ValidationCheck, ValidationError, ValidationReport};

/// Guess the encoding of a file from its extension, then from its content
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(ORT_EXTENSION) => return Some(FileFormat::Text),
        Some(ext) if ext.eq_ignore_ascii_case(ORB_EXTENSION) => return Some(FileFormat::Hierarchical),
        _ => {}
    }
    if is_zip_file(path) {
        Some(FileFormat::Hierarchical)
    } else if read_first_line(path).ok()?.and_then(|l| parse_magic_line(&l)).is_some() {
        Some(FileFormat::Text)
    } else {
        None
    }
}

fn is_zip_file(path: &Path) -> bool {
    File::open(path)
        .map(|file| ZipArchive::new(file).is_ok())
        .unwrap_or(false)
}

fn read_first_line(path: &Path) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = BufReader::new(File::open(path)?).read_line(&mut line)?;
    Ok((read > 0).then(|| line.trim_end().to_string()))
}

/// Step 1: Structure validation
pub(crate) fn check_structure(path: &Path, report: &mut ValidationReport) -> Result<FileFormat> {
    if !path.exists() {
        report.add_check(ValidationCheck::failed(
            "Path exists",
            format!("Path does not exist: {}", path.display()),
        ));
        anyhow::bail!(ValidationError::Structure("Path does not exist".to_string()));
    }
    if !path.is_file() {
        report.add_check(ValidationCheck::failed("Regular file", "Path is not a file"));
        anyhow::bail!(ValidationError::Structure("Not a file".to_string()));
    }
    report.add_check(ValidationCheck::ok("Path exists"));

    let Some(format) = detect_format(path) else {
        report.add_check(ValidationCheck::failed(
            "Known format",
            "Neither a text (.ort) nor a hierarchical (.orb) ORSO file",
        ));
        anyhow::bail!(ValidationError::Structure("Unknown format".to_string()));
    };

    match format {
        FileFormat::Text => check_text_structure(path, report)?,
        FileFormat::Hierarchical => check_container_structure(path, report)?,
    }
    Ok(format)
}

fn check_text_structure(path: &Path, report: &mut ValidationReport) -> Result<()> {
    report.add_check(ValidationCheck::ok("Format: text (.ort)"));
    let first = read_first_line(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .unwrap_or_default();
    match parse_magic_line(&first) {
        Some(version) => {
            report.add_check(ValidationCheck::ok(format!("Magic line (ORSO {})", version)));
            Ok(())
        }
        None => {
            report.add_check(ValidationCheck::failed(
                "Magic line",
                format!("First line is not an ORSO magic line: '{}'", first),
            ));
            anyhow::bail!(ValidationError::Structure("Missing magic line".to_string()))
        }
    }
}

fn check_container_structure(path: &Path, report: &mut ValidationReport) -> Result<()> {
    report.add_check(ValidationCheck::ok("Format: hierarchical container (.orb)"));
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            report.add_check(ValidationCheck::failed("Valid ZIP container", e.to_string()));
            anyhow::bail!(ValidationError::Structure(e.to_string()));
        }
    };
    report.add_check(ValidationCheck::ok("Valid ZIP container"));

    if archive.is_empty() {
        report.add_check(ValidationCheck::failed("mimetype entry", "Container is empty"));
        anyhow::bail!(ValidationError::Structure("Empty container".to_string()));
    }

    let mut first = archive.by_index(0)?;
    if first.name() != "mimetype" {
        report.add_check(ValidationCheck::failed(
            "mimetype entry",
            format!("First entry is '{}'", first.name()),
        ));
        anyhow::bail!(ValidationError::Structure("mimetype is not the first entry".to_string()));
    }
    if first.compression() != zip::CompressionMethod::Stored {
        report.add_check(ValidationCheck::warning(
            "mimetype entry",
            "mimetype entry is compressed",
        ));
    }
    let mut mimetype = String::new();
    first.read_to_string(&mut mimetype)?;
    if mimetype.trim() == ORB_MIMETYPE {
        report.add_check(ValidationCheck::ok("mimetype entry"));
        Ok(())
    } else {
        report.add_check(ValidationCheck::failed(
            "mimetype entry",
            format!("Unexpected mimetype '{}'", mimetype.trim()),
        ));
        anyhow::bail!(ValidationError::Structure("Wrong mimetype".to_string()))
    }
}
