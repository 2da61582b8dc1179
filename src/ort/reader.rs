use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value as Json;

use super::OrtError;
use crate::dataset::{check_unique_ids, DataTable, OrsoDataset};
use crate::diff::patched;
use crate::header::{self, DataSetId};
use crate::resolve::{ResolutionWarning, Resolver};
use crate::schema::{registry, ROOT_SCHEMA};
use crate::validator::HeaderValidator;

/// Contents of a text file
#[derive(Debug, Clone, PartialEq)]
pub struct OrtFile {
    /// Format version from the magic line
    pub version: String,
    /// Comment lines below the magic line
    pub comment: Option<String>,
    /// Datasets in file order
    pub datasets: Vec<OrsoDataset>,
    /// Recoverable problems found while resolving the headers
    pub warnings: Vec<ResolutionWarning>,
}

// Constant pattern, compiled by every decode test.
#[allow(clippy::expect_used)]
fn magic_line() -> &'static Regex {
    static MAGIC: OnceLock<Regex> = OnceLock::new();
    MAGIC.get_or_init(|| {
        Regex::new(
            r"^# ORSO reflectivity data file \| ([0-9]+(?:\.[0-9]+)*) standard \| YAML encoding \| https://www\.reflectometry\.org/\s*$",
        )
        .expect("magic line pattern is valid")
    })
}

/// Format version of a magic line, if it is one
pub fn parse_magic_line(line: &str) -> Option<String> {
    magic_line()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Default)]
struct Block {
    header: Vec<String>,
    rows: Vec<(usize, String)>,
}

impl Block {
    fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

struct Layout {
    version: String,
    comment: Vec<String>,
    blocks: Vec<Block>,
}

fn split_blocks(text: &str) -> Result<Layout, OrtError> {
    let mut lines = text.lines().enumerate();
    let first = lines.next().map(|(_, l)| l).unwrap_or_default();
    let version = parse_magic_line(first)
        .ok_or_else(|| OrtError::NotCompatibleFormat(first.to_string()))?;

    let mut comment = Vec::new();
    let mut preamble = true;
    let mut blocks = vec![Block::default()];

    for (index, line) in lines {
        let line = line.trim_start();
        if line.trim().is_empty() {
            continue;
        }

        let Some(content) = line.strip_prefix('#') else {
            preamble = false;
            if let Some(block) = blocks.last_mut() {
                block.rows.push((index + 1, line.to_string()));
            }
            continue;
        };
        let content = content.strip_prefix(' ').unwrap_or(content);

        if preamble {
            if let Some(text) = content.strip_prefix('#') {
                comment.push(text.strip_prefix(' ').unwrap_or(text).to_string());
                continue;
            }
            preamble = false;
        }

        let current_has_rows = blocks.last().map(|b| !b.rows.is_empty()).unwrap_or(false);
        if content.trim_end() == "---" {
            if blocks.last().map(|b| !b.is_empty()).unwrap_or(false) {
                blocks.push(Block::default());
            }
            continue;
        }
        if current_has_rows {
            blocks.push(Block::default());
        }
        if let Some(block) = blocks.last_mut() {
            block.header.push(content.to_string());
        }
    }

    blocks.retain(|b| !b.is_empty());
    Ok(Layout {
        version,
        comment,
        blocks,
    })
}

fn parse_documents(blocks: &[Block]) -> Result<Vec<Json>, OrtError> {
    let text = blocks
        .iter()
        .map(|b| b.header.join("\n"))
        .collect::<Vec<_>>()
        .join("\n---\n");

    let mut documents = Vec::with_capacity(blocks.len());
    for document in serde_yaml::Deserializer::from_str(&text) {
        documents.push(Json::deserialize(document)?);
    }

    if documents.len() != blocks.len() {
        return Err(OrtError::MalformedHeader(format!(
            "found {} header documents for {} data blocks",
            documents.len(),
            blocks.len()
        )));
    }
    if let Some(position) = documents.iter().position(|d| !d.is_object()) {
        return Err(OrtError::MalformedHeader(format!(
            "header document {} is not a mapping",
            position + 1
        )));
    }
    Ok(documents)
}

fn parse_rows(rows: &[(usize, String)], num_columns: usize) -> Result<DataTable, OrtError> {
    if rows.is_empty() {
        return Ok(DataTable::empty(num_columns));
    }
    let mut parsed = Vec::with_capacity(rows.len());
    for (line, text) in rows {
        let values = text
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| OrtError::MalformedData {
                    line: *line,
                    message: format!("'{}' is not a number", token),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        parsed.push(values);
    }
    Ok(DataTable::from_rows(&parsed)?)
}

/// Decode a text file held in memory
pub fn decode_ort(text: &str) -> Result<OrtFile, OrtError> {
    decode_ort_with(text, None)
}

/// Decode a text file, feeding the merged plain headers to `validator`
/// before they are resolved
pub fn read_ort_validated(text: &str, validator: &dyn HeaderValidator) -> Result<OrtFile, OrtError> {
    decode_ort_with(text, Some(validator))
}

fn decode_ort_with(text: &str, validator: Option<&dyn HeaderValidator>) -> Result<OrtFile, OrtError> {
    let layout = split_blocks(text)?;
    let documents = parse_documents(&layout.blocks)?;

    let plain: Vec<Json> = match documents.split_first() {
        Some((base, rest)) => std::iter::once(base.clone())
            .chain(rest.iter().map(|patch| patched(base, patch)))
            .collect(),
        None => Vec::new(),
    };

    if let Some(validator) = validator {
        validator.validate(&plain)?;
    }

    let mut resolver = Resolver::new(registry());
    let mut datasets = Vec::with_capacity(plain.len());
    for (index, (document, block)) in plain.iter().zip(&layout.blocks).enumerate() {
        resolver.enter_index(index);
        let info = resolver.resolve_record(ROOT_SCHEMA, document);
        resolver.leave();
        let info = info?;
        let data = parse_rows(&block.rows, header::column_count(&info))?;
        datasets.push(OrsoDataset::new(info, data)?);
    }

    let ids: Vec<DataSetId> = datasets
        .iter()
        .enumerate()
        .map(|(i, d)| d.data_set().unwrap_or(DataSetId::Index(i as i64)))
        .collect();
    check_unique_ids(&ids)?;

    log::debug!(
        "Decoded {} datasets (ORSO {}) with {} warnings",
        datasets.len(),
        layout.version,
        resolver.warnings().len()
    );

    Ok(OrtFile {
        version: layout.version,
        comment: if layout.comment.is_empty() {
            None
        } else {
            Some(layout.comment.join("\n"))
        },
        datasets,
        warnings: resolver.into_warnings(),
    })
}

/// Read a text file from any reader
pub fn read_ort<R: Read>(mut reader: R) -> Result<OrtFile, OrtError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_ort(&text)
}

/// Load a text file with its version, comment and warnings
pub fn load_orso_file(path: impl AsRef<Path>) -> Result<OrtFile, OrtError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let ort = read_ort(std::io::BufReader::new(file))?;
    log::info!("Loaded {} datasets from {}", ort.datasets.len(), path.display());
    Ok(ort)
}

/// Load the datasets of a text file
pub fn load_orso(path: impl AsRef<Path>) -> Result<Vec<OrsoDataset>, OrtError> {
    Ok(load_orso_file(path)?.datasets)
}
