use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use super::keys;
use super::{Group, LeafData, NexusError, Node};
use crate::dataset::{check_unique_ids, DataTable, OrsoDataset};
use crate::header::DataSetId;
use crate::resolve::{Record, ResolutionError, ResolutionWarning, Resolver, Value, WarningKind};
use crate::schema::{registry, ScalarKind, SchemaDescriptor, TypeExpr, JSON_MIMETYPE, ROOT_SCHEMA};

/// Contents of a hierarchical file
#[derive(Debug, Clone, PartialEq)]
pub struct NexusFile {
    /// Format version stored on the root group
    pub version: String,
    /// Root comment, if any
    pub comment: Option<String>,
    /// Datasets in entry order
    pub datasets: Vec<OrsoDataset>,
    /// Recoverable problems found while decoding the headers
    pub warnings: Vec<ResolutionWarning>,
}

fn order_index(node: &Node, key: &str) -> i64 {
    node.attrs()
        .get(key)
        .and_then(|a| a.as_i64())
        .unwrap_or(i64::MAX)
}

/// Children ordered by an index attribute, then by name
fn ordered<'g>(group: &'g Group, key: &str) -> Vec<(&'g String, &'g Node)> {
    let mut children: Vec<_> = group.children.iter().collect();
    children.sort_by_key(|(_, node)| order_index(node, key));
    children
}

fn is_blob(node: &Node) -> bool {
    node.attrs().get(keys::MIMETYPE).and_then(|a| a.as_str()) == Some(JSON_MIMETYPE)
}

/// Plain form of a node, used as the fallback when typed decoding fails
fn node_to_raw(node: &Node) -> Json {
    match node {
        Node::Leaf(leaf) => match &leaf.data {
            LeafData::Empty => Json::Null,
            LeafData::Bool(b) => Json::Bool(*b),
            LeafData::Int(i) => Json::from(*i),
            LeafData::Float(f) => Json::from(*f),
            LeafData::Str(s) if is_blob(node) => {
                serde_json::from_str(s).unwrap_or_else(|_| Json::String(s.clone()))
            }
            LeafData::Str(s) => Json::String(s.clone()),
            LeafData::FloatArray(values) => {
                Json::Array(values.iter().map(|v| Json::from(*v)).collect())
            }
        },
        Node::Group(group) if group.attrs.contains_key(keys::SEQUENCE) => Json::Array(
            ordered(group, keys::SEQUENCE_INDEX)
                .into_iter()
                .map(|(_, child)| node_to_raw(child))
                .collect(),
        ),
        Node::Group(group) => Json::Object(
            group
                .children
                .iter()
                .map(|(name, child)| (name.clone(), node_to_raw(child)))
                .collect(),
        ),
    }
}

/// Stand-in deciding whether a field is present. Non-finite floats have no
/// plain form but are still values.
fn presence(node: &Node) -> Json {
    match node {
        Node::Leaf(leaf) => match leaf.data {
            LeafData::Float(f) if !f.is_finite() => Json::String(f.to_string()),
            _ => node_to_raw(node),
        },
        Node::Group(_) => node_to_raw(node),
    }
}

fn admits_float(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Scalar(ScalarKind::Float) => true,
        TypeExpr::Optional(inner) => admits_float(inner),
        TypeExpr::Union(candidates) => candidates.iter().any(admits_float),
        _ => false,
    }
}

/// Decode `node` against `ty`, following the record tags and sequence
/// markers the writer leaves in the tree
fn decode_node(
    resolver: &mut Resolver<'_>,
    ty: &TypeExpr,
    node: &Node,
) -> Result<Value, ResolutionError> {
    match node {
        Node::Group(group) => {
            if let Some(class) = group.attr_str(keys::ORSO_CLASS) {
                if ty.admits_record(class) {
                    if let Ok(descriptor) = resolver.registry().lookup(class) {
                        let record = decode_record(resolver, descriptor, group, false)?;
                        return Ok(Value::Record(record));
                    }
                }
                resolver.warn(WarningKind::UnexpectedTag {
                    expected: ty.to_string(),
                    found: class.to_string(),
                });
            } else if group.attrs.contains_key(keys::SEQUENCE) && ty.sequence_item(0).is_some() {
                return decode_sequence(resolver, ty, group);
            }
            resolver.resolve(ty, &node_to_raw(node))
        }
        Node::Leaf(leaf) => match leaf.data {
            LeafData::Float(f) if admits_float(ty) => Ok(Value::Float(f)),
            _ => resolver.resolve(ty, &node_to_raw(node)),
        },
    }
}

fn decode_sequence(
    resolver: &mut Resolver<'_>,
    ty: &TypeExpr,
    group: &Group,
) -> Result<Value, ResolutionError> {
    let mut children = ordered(group, keys::SEQUENCE_INDEX);
    if let Some(arity) = ty.tuple_arity() {
        if children.len() != arity {
            resolver.warn(WarningKind::TupleArity {
                expected: arity,
                found: children.len(),
            });
            children.truncate(arity);
        }
    }

    let mut items = Vec::with_capacity(children.len());
    for (i, (_, child)) in children.into_iter().enumerate() {
        let Some(item_ty) = ty.sequence_item(i) else {
            break;
        };
        resolver.enter_index(i);
        let decoded = decode_node(resolver, item_ty, child);
        resolver.leave();
        items.push(decoded?);
    }
    Ok(Value::List(items))
}

fn decode_record(
    resolver: &mut Resolver<'_>,
    descriptor: Arc<SchemaDescriptor>,
    group: &Group,
    root: bool,
) -> Result<Record, ResolutionError> {
    let mut values = IndexMap::with_capacity(descriptor.fields().len());
    for field in descriptor.fields() {
        let node = group.children.get(field.name);
        let raw = node.map(presence);
        resolver.enter(field.name);
        let resolved = resolver.field(&descriptor, field, raw.as_ref(), root, |r, _| match node {
            Some(node) => decode_node(r, &field.ty, node),
            None => Ok(Value::Null),
        });
        resolver.leave();
        values.insert(field.name, resolved?);
    }

    let extra = group
        .children
        .iter()
        .filter(|(name, _)| !descriptor.is_known(name))
        .map(|(name, node)| (name.clone(), node_to_raw(node)))
        .collect();

    resolver.finish_record(descriptor, values, extra)
}

fn decode_data(group: &Group) -> Result<DataTable, NexusError> {
    let mut columns = Vec::with_capacity(group.children.len());
    for (name, node) in ordered(group, keys::COLUMN_INDEX) {
        match node {
            Node::Leaf(leaf) => match &leaf.data {
                LeafData::FloatArray(values) => columns.push(values.clone()),
                _ => {
                    return Err(NexusError::MalformedTree(format!(
                        "data column '{}' is not a float array",
                        name
                    )))
                }
            },
            Node::Group(_) => {
                return Err(NexusError::MalformedTree(format!(
                    "data column '{}' is a group",
                    name
                )))
            }
        }
    }
    Ok(DataTable::from_columns(columns)?)
}

fn decode_entry(
    resolver: &mut Resolver<'_>,
    name: &str,
    entry: &Group,
) -> Result<OrsoDataset, NexusError> {
    let header = entry.group(keys::HEADER).ok_or_else(|| {
        NexusError::MalformedTree(format!("entry '{}' has no header group", name))
    })?;
    match header.attr_str(keys::ORSO_CLASS) {
        Some(ROOT_SCHEMA) => {}
        found => resolver.warn(WarningKind::UnexpectedTag {
            expected: ROOT_SCHEMA.to_string(),
            found: found.unwrap_or("untagged").to_string(),
        }),
    }
    let descriptor = resolver
        .registry()
        .lookup(ROOT_SCHEMA)
        .map_err(ResolutionError::from)?;
    let info = decode_record(resolver, descriptor, header, true)?;

    let data = match entry.group(keys::DATA) {
        Some(data) => decode_data(data)?,
        None => DataTable::empty(0),
    };
    Ok(OrsoDataset::new(info, data)?)
}

/// Decode the datasets of a tree
pub fn decode_nexus(root: &Group) -> Result<NexusFile, NexusError> {
    match root.attr_str(keys::NX_CLASS) {
        Some("NXroot") => {}
        other => {
            return Err(NexusError::NotOrbFile(format!(
                "root class is {:?}, expected \"NXroot\"",
                other
            )))
        }
    }
    let version = root
        .attr_str(keys::ORSO_VERSION)
        .ok_or_else(|| NexusError::MalformedTree("root has no format version".to_string()))?
        .to_string();

    let mut resolver = Resolver::new(registry());
    let mut datasets = Vec::new();
    for (name, node) in ordered(root, keys::SEQUENCE_INDEX) {
        let Node::Group(entry) = node else {
            continue;
        };
        if entry.attr_str(keys::NX_CLASS) != Some("NXentry") {
            continue;
        }
        resolver.enter_index(datasets.len());
        let decoded = decode_entry(&mut resolver, name, entry);
        resolver.leave();
        datasets.push(decoded?);
    }
    if datasets.is_empty() {
        return Err(NexusError::NoDatasets);
    }

    let ids: Vec<DataSetId> = datasets
        .iter()
        .enumerate()
        .map(|(i, d)| d.data_set().unwrap_or(DataSetId::Index(i as i64)))
        .collect();
    check_unique_ids(&ids)?;

    log::debug!(
        "Decoded {} entries (ORSO {}) with {} warnings",
        datasets.len(),
        version,
        resolver.warnings().len()
    );

    Ok(NexusFile {
        version,
        comment: root.attr_str(keys::COMMENT).map(str::to_string),
        datasets,
        warnings: resolver.into_warnings(),
    })
}

/// Read a hierarchical file from any seekable reader
pub fn read_nexus<R: Read + Seek>(reader: R) -> Result<NexusFile, NexusError> {
    let root = super::container::read_container(reader)?;
    decode_nexus(&root)
}

/// Load a hierarchical file with its version, comment and warnings
pub fn load_nexus_file(path: impl AsRef<Path>) -> Result<NexusFile, NexusError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let nexus = read_nexus(std::io::BufReader::new(file))?;
    log::info!("Loaded {} datasets from {}", nexus.datasets.len(), path.display());
    Ok(nexus)
}

/// Load the datasets of a hierarchical file
pub fn load_nexus(path: impl AsRef<Path>) -> Result<Vec<OrsoDataset>, NexusError> {
    Ok(load_nexus_file(path)?.datasets)
}
