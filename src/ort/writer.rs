use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value as Json};

use super::{OrtError, OrtWriterConfig};
use crate::dataset::{batch_ids, OrsoDataset};
use crate::diff::diff;
use crate::header::DataSetId;
use crate::output::write_atomically;
use crate::resolve::ResolutionWarning;
use crate::schema::{designate, DATA_SET_FIELD, ORSO_FORMAT_VERSION};

/// Format a float like C's `%.{precision}e`: signed exponent with at least
/// two digits, `nan`/`inf` for non-finite values
pub fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = format!("{:.*e}", precision, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// Encode a batch into the text format, with the warnings for header values
/// written as null
pub fn encode_ort(
    datasets: &[OrsoDataset],
    config: &OrtWriterConfig,
) -> Result<(String, Vec<ResolutionWarning>), OrtError> {
    let mut buffer = Vec::new();
    let warnings = write_ort(&mut buffer, datasets, config)?;
    let text = String::from_utf8(buffer).map_err(|e| {
        OrtError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    Ok((text, warnings))
}

/// Write a batch in the text format to `writer`.
///
/// The first dataset carries its full header; every later one only the
/// difference to the first, with its identifier always present. Header
/// values with no plain form are written as null; the returned warnings
/// name them, prefixed with the batch position.
pub fn write_ort<W: Write>(
    writer: &mut W,
    datasets: &[OrsoDataset],
    config: &OrtWriterConfig,
) -> Result<Vec<ResolutionWarning>, OrtError> {
    config.validate()?;
    let Some(first) = datasets.first() else {
        return Err(OrtError::NoDatasets);
    };
    let ids = batch_ids(datasets)?;

    writeln!(writer, "{}", designate(ORSO_FORMAT_VERSION))?;
    if let Some(comment) = &config.comment {
        for line in comment.lines() {
            writeln!(writer, "# # {}", line)?;
        }
    }

    let mut warnings = Vec::new();
    let base = first.info().to_plain_at("[0]", &mut warnings);
    write_yaml(writer, &base)?;
    write_table(writer, first, config)?;

    for (index, (dataset, id)) in datasets.iter().zip(&ids).enumerate().skip(1) {
        writer.write_all(config.data_separator.as_bytes())?;
        writeln!(writer, "# ---")?;

        let plain = dataset.info().to_plain_at(&format!("[{}]", index), &mut warnings);
        write_yaml(writer, &asserted_diff(&base, &plain, id))?;
        write_table(writer, dataset, config)?;
    }

    log::debug!(
        "Encoded {} datasets as text with {} warnings",
        datasets.len(),
        warnings.len()
    );
    Ok(warnings)
}

/// Write a batch to `path` in the text format, atomically.
///
/// Returns the warnings for header values written as null.
pub fn save_orso(
    datasets: &[OrsoDataset],
    path: impl AsRef<Path>,
    config: &OrtWriterConfig,
) -> Result<Vec<ResolutionWarning>, OrtError> {
    let path = path.as_ref();
    let mut warnings = Vec::new();
    write_atomically(path, |file| {
        let mut out = std::io::BufWriter::new(file);
        warnings = write_ort(&mut out, datasets, config)?;
        out.flush()?;
        Ok::<(), OrtError>(())
    })?;
    log::info!("Saved {} datasets to {}", datasets.len(), path.display());
    Ok(warnings)
}

fn asserted_diff(base: &Json, plain: &Json, id: &DataSetId) -> Json {
    let id = match id {
        DataSetId::Index(i) => Json::from(*i),
        DataSetId::Name(n) => Json::String(n.clone()),
    };
    let mut out = Map::new();
    out.insert(DATA_SET_FIELD.to_string(), id);
    if let Json::Object(changes) = diff(base, plain) {
        out.extend(changes.into_iter().filter(|(k, _)| k != DATA_SET_FIELD));
    }
    Json::Object(out)
}

fn write_yaml<W: Write>(writer: &mut W, document: &Json) -> Result<(), OrtError> {
    let yaml = serde_yaml::to_string(document)?;
    for line in yaml.lines() {
        if line == "---" {
            continue;
        }
        writeln!(writer, "# {}", line)?;
    }
    Ok(())
}

fn write_table<W: Write>(
    writer: &mut W,
    dataset: &OrsoDataset,
    config: &OrtWriterConfig,
) -> Result<(), OrtError> {
    let width = config.column_width;
    let mut header = String::from("# # ");
    for (i, column) in dataset.columns().iter().enumerate() {
        let label = column.label();
        let pad = if i == 0 { width.saturating_sub(3) } else { width + 1 };
        let pad = pad.max(label.len() + 1);
        header.push_str(&format!("{:<pad$}", label, pad = pad));
    }
    writeln!(writer, "{}", header.trim_end())?;

    for row in dataset.data().rows() {
        let line = row
            .iter()
            .map(|v| format!("{:<width$}", format_float(*v, config.precision), width = width))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}
