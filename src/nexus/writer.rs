use std::collections::HashSet;
use std::io::{Seek, Write};
use std::path::Path;

use serde_json::Value as Json;

use super::{AttrValue, Group, Leaf, LeafData, NexusError, NexusWriterConfig, Node};
use crate::dataset::{batch_ids, OrsoDataset};
use crate::header::ColumnSpec;
use crate::output::write_atomically;
use crate::resolve::{join_path, Record, ResolutionWarning, Value, WarningKind};
use crate::schema::{COLUMNS_FIELD, JSON_MIMETYPE, ORSO_FORMAT_VERSION, ROOT_SCHEMA};

use super::keys;

struct Encoder {
    warnings: Vec<ResolutionWarning>,
}

impl Encoder {
    fn unrepresentable(&mut self, path: &str, reason: impl Into<String>) -> Node {
        let warning = ResolutionWarning::new(
            path,
            WarningKind::Unrepresentable {
                reason: reason.into(),
            },
        );
        log::warn!("{}", warning);
        self.warnings.push(warning);
        Node::Leaf(Leaf::new(LeafData::Empty))
    }

    fn blob(&mut self, path: &str, plain: &Json) -> Node {
        match serde_json::to_string(plain) {
            Ok(text) => {
                let mut leaf = Leaf::new(LeafData::Str(text));
                leaf.attrs
                    .insert(keys::MIMETYPE.to_string(), AttrValue::from(JSON_MIMETYPE));
                Node::Leaf(leaf)
            }
            Err(e) => self.unrepresentable(path, e.to_string()),
        }
    }

    fn record(&mut self, record: &Record, path: &str) -> Group {
        let mut group = Group::tagged(keys::ORSO_CLASS, record.schema_name());
        for (name, value) in record.fields() {
            if value.is_null() {
                continue;
            }
            let child = join_path(path, name);
            group.insert(name, self.value(value, &child));
        }
        for (name, raw) in record.extra() {
            let child = join_path(path, name);
            group.insert(name.clone(), self.raw(raw, &child));
        }
        group
    }

    fn value(&mut self, value: &Value, path: &str) -> Node {
        match value {
            Value::Null => Node::Leaf(Leaf::new(LeafData::Empty)),
            Value::Bool(b) => Node::Leaf(Leaf::new(LeafData::Bool(*b))),
            Value::Int(i) => Node::Leaf(Leaf::new(LeafData::Int(*i))),
            Value::Float(f) => Node::Leaf(Leaf::new(LeafData::Float(*f))),
            Value::Str(s) => Node::Leaf(Leaf::new(LeafData::Str(s.clone()))),
            Value::Timestamp(ts) => Node::Leaf(Leaf::new(LeafData::Str(ts.to_iso()))),
            Value::List(items) => {
                let mut group = Group::tagged(keys::SEQUENCE, true);
                for (i, item) in items.iter().enumerate() {
                    let mut node = self.value(item, &format!("{}[{}]", path, i));
                    node.attrs_mut()
                        .insert(keys::SEQUENCE_INDEX.to_string(), AttrValue::Int(i as i64));
                    group.insert(i.to_string(), node);
                }
                Node::Group(group)
            }
            Value::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, item) in entries {
                    let key = match key {
                        Value::Str(s) => s.clone(),
                        Value::Int(i) => i.to_string(),
                        Value::Bool(b) => b.to_string(),
                        Value::Timestamp(ts) => ts.to_iso(),
                        Value::Raw(Json::String(s)) => s.clone(),
                        other => {
                            return self.unrepresentable(
                                path,
                                format!("mapping key {:?} has no text form", other),
                            )
                        }
                    };
                    let child = join_path(path, &key);
                    object.insert(key, item.to_plain(&child, &mut self.warnings));
                }
                self.blob(path, &Json::Object(object))
            }
            Value::Record(record) => Node::Group(self.record(record, path)),
            Value::Raw(raw) => self.raw(raw, path),
        }
    }

    fn raw(&mut self, raw: &Json, path: &str) -> Node {
        let data = match raw {
            Json::Null => LeafData::Empty,
            Json::Bool(b) => LeafData::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => LeafData::Int(i),
                None => LeafData::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => LeafData::Str(s.clone()),
            Json::Array(_) | Json::Object(_) => return self.blob(path, raw),
        };
        Node::Leaf(Leaf::new(data))
    }
}

/// Unique leaf names for the data columns
fn column_names(columns: &[Option<ColumnSpec>]) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let base = column
                .as_ref()
                .map(ColumnSpec::name)
                .unwrap_or_else(|| format!("column_{}", i));
            let name = if seen.contains(&base) {
                format!("{}_{}", base, i)
            } else {
                base
            };
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn data_group(dataset: &OrsoDataset) -> Group {
    let columns: Vec<Option<ColumnSpec>> = dataset
        .info()
        .get(COLUMNS_FIELD)
        .and_then(Value::as_list)
        .unwrap_or_default()
        .iter()
        .map(|v| v.as_record().and_then(ColumnSpec::from_record))
        .collect();
    let names = column_names(&columns);

    let mut group = Group::tagged(keys::NX_CLASS, "NXdata");
    if let Some(signal) = names.get(1) {
        group.attrs.insert(keys::SIGNAL.to_string(), AttrValue::from(signal.as_str()));
    }
    if let Some(axis) = names.first() {
        group
            .attrs
            .insert(keys::AXES.to_string(), AttrValue::StrList(vec![axis.clone()]));
    }

    let mut leaves: Vec<Leaf> = Vec::with_capacity(names.len());
    for (i, column) in columns.iter().enumerate() {
        let values = dataset.data().column(i).unwrap_or_default().to_vec();
        let mut leaf = Leaf::new(LeafData::FloatArray(values));
        leaf.attrs
            .insert(keys::COLUMN_INDEX.to_string(), AttrValue::Int(i as i64));
        match column {
            Some(ColumnSpec::Data {
                unit,
                physical_quantity,
                ..
            }) => {
                if let Some(unit) = unit {
                    leaf.attrs.insert(keys::UNITS.to_string(), AttrValue::from(unit.as_str()));
                }
                if let Some(quantity) = physical_quantity {
                    leaf.attrs.insert(
                        keys::PHYSICAL_QUANTITY.to_string(),
                        AttrValue::from(quantity.as_str()),
                    );
                }
            }
            Some(ColumnSpec::Error { error_of, .. }) => {
                leaf.attrs
                    .insert(keys::ERROR_OF.to_string(), AttrValue::from(error_of.as_str()));
            }
            None => {}
        }
        leaves.push(leaf);
    }

    // Link every annotated column to its error column.
    for (i, column) in columns.iter().enumerate() {
        if let Some(ColumnSpec::Error { error_of, .. }) = column {
            let target = columns.iter().position(|c| {
                matches!(c, Some(ColumnSpec::Data { name, .. }) if name == error_of)
            });
            if let Some(target) = target {
                leaves[target]
                    .attrs
                    .insert(keys::UNCERTAINTIES.to_string(), AttrValue::from(names[i].as_str()));
            }
        }
    }

    for (name, leaf) in names.into_iter().zip(leaves) {
        group.insert(name, Node::Leaf(leaf));
    }
    group
}

/// Build the tree of a batch, with the warnings for values that had to be
/// replaced by placeholders
pub fn encode_nexus(
    datasets: &[OrsoDataset],
    config: &NexusWriterConfig,
) -> Result<(Group, Vec<ResolutionWarning>), NexusError> {
    if datasets.is_empty() {
        return Err(NexusError::NoDatasets);
    }
    let ids = batch_ids(datasets)?;
    let names: Vec<String> = ids.iter().map(ToString::to_string).collect();
    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(name) {
            return Err(NexusError::DuplicateEntry(name.clone()));
        }
    }

    let mut root = Group::tagged(keys::NX_CLASS, "NXroot");
    root.attrs.insert(keys::ORSO_VERSION.to_string(), AttrValue::from(ORSO_FORMAT_VERSION));
    root.attrs.insert(keys::DEFAULT.to_string(), AttrValue::from(names[0].as_str()));
    root.attrs.insert(
        keys::CREATOR.to_string(),
        AttrValue::from(concat!("orso ", env!("CARGO_PKG_VERSION"))),
    );
    if let Some(comment) = &config.comment {
        root.attrs.insert(keys::COMMENT.to_string(), AttrValue::from(comment.as_str()));
    }

    let mut encoder = Encoder {
        warnings: Vec::new(),
    };
    for (index, (dataset, name)) in datasets.iter().zip(&names).enumerate() {
        let mut entry = Group::tagged(keys::NX_CLASS, "NXentry");
        entry
            .attrs
            .insert(keys::SEQUENCE_INDEX.to_string(), AttrValue::Int(index as i64));

        let header = encoder.record(dataset.info(), &format!("[{}]", index));
        debug_assert_eq!(header.attr_str(keys::ORSO_CLASS), Some(ROOT_SCHEMA));
        entry.insert(keys::HEADER, Node::Group(header));
        entry.insert(keys::DATA, Node::Group(data_group(dataset)));
        root.insert(name.clone(), Node::Group(entry));
    }

    Ok((root, encoder.warnings))
}

/// Write a batch as a hierarchical container to `writer`
pub fn write_nexus<W: Write + Seek>(
    writer: W,
    datasets: &[OrsoDataset],
    config: &NexusWriterConfig,
) -> Result<(W, Vec<ResolutionWarning>), NexusError> {
    let (root, warnings) = encode_nexus(datasets, config)?;
    let writer = super::container::write_container(writer, &root, config.compression.method())?;
    Ok((writer, warnings))
}

/// Write a batch to `path` as a hierarchical container, atomically.
///
/// Returns the warnings for values replaced by placeholders.
pub fn save_nexus(
    datasets: &[OrsoDataset],
    path: impl AsRef<Path>,
    config: &NexusWriterConfig,
) -> Result<Vec<ResolutionWarning>, NexusError> {
    let path = path.as_ref();
    let mut warnings = Vec::new();
    write_atomically(path, |file| {
        let (mut out, w) = write_nexus(std::io::BufWriter::new(file), datasets, config)?;
        out.flush()?;
        warnings = w;
        Ok::<(), NexusError>(())
    })?;
    log::info!("Saved {} datasets to {}", datasets.len(), path.display());
    Ok(warnings)
}
