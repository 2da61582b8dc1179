use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{AttrValue, Group, Leaf, NexusError, Node};
use crate::schema::ORB_MIMETYPE;

/// Entry holding the attributes of the group it sits in
const GROUP_ATTRS: &str = ".group.json";

fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '.' if i == 0 => out.push_str("%2E"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let code = rest.get(at..at + 3);
        let decoded = match code {
            Some("%25") => Some('%'),
            Some("%2F") => Some('/'),
            Some("%2E") => Some('.'),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[at + 3..];
            }
            None => {
                out.push('%');
                rest = &rest[at + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Write `root` into a ZIP container.
///
/// The first entry is the uncompressed `mimetype`. Every group becomes a
/// directory with a `.group.json` entry holding its attributes; every leaf a JSON
/// entry with its attributes and payload.
pub(super) fn write_container<W: Write + Seek>(
    writer: W,
    root: &Group,
    compression: CompressionMethod,
) -> Result<W, NexusError> {
    let mut zip = ZipWriter::new(writer);

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .unix_permissions(0o644);
    zip.start_file("mimetype", options)?;
    zip.write_all(ORB_MIMETYPE.as_bytes())?;

    let options = SimpleFileOptions::default()
        .compression_method(compression)
        .unix_permissions(0o644);
    write_group(&mut zip, "", root, options)?;

    Ok(zip.finish()?)
}

fn write_group<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    prefix: &str,
    group: &Group,
    options: SimpleFileOptions,
) -> Result<(), NexusError> {
    zip.start_file(format!("{}{}", prefix, GROUP_ATTRS), options)?;
    zip.write_all(&serde_json::to_vec(&group.attrs)?)?;

    for (name, child) in &group.children {
        let path = format!("{}{}", prefix, escape(name));
        match child {
            Node::Group(g) => {
                zip.add_directory(format!("{}/", path), options)?;
                write_group(zip, &format!("{}/", path), g, options)?;
            }
            Node::Leaf(leaf) => {
                zip.start_file(path, options)?;
                zip.write_all(&serde_json::to_vec(leaf)?)?;
            }
        }
    }
    Ok(())
}

/// Read the tree of a ZIP container, checking its mimetype
pub(super) fn read_container<R: Read + Seek>(reader: R) -> Result<Group, NexusError> {
    let mut archive = ZipArchive::new(reader)?;
    if archive.is_empty() {
        return Err(NexusError::NotOrbFile("empty container".to_string()));
    }

    {
        let mut first = archive.by_index(0)?;
        if first.name() != "mimetype" {
            return Err(NexusError::NotOrbFile(format!(
                "first entry is '{}', expected 'mimetype'",
                first.name()
            )));
        }
        let mut mimetype = String::new();
        first.read_to_string(&mut mimetype)?;
        if mimetype.trim() != ORB_MIMETYPE {
            return Err(NexusError::NotOrbFile(format!("mimetype is '{}'", mimetype.trim())));
        }
    }

    let mut root = Group::default();
    for index in 1..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            let name = entry.name().trim_end_matches('/').to_string();
            let segments: Vec<String> = name.split('/').map(unescape).collect();
            group_at(&mut root, &segments)?;
            continue;
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        let mut segments: Vec<&str> = name.split('/').collect();
        let Some(last) = segments.pop() else {
            continue;
        };
        let parents: Vec<String> = segments.into_iter().map(unescape).collect();
        let parent = group_at(&mut root, &parents)?;

        if last == GROUP_ATTRS {
            let attrs: BTreeMap<String, AttrValue> = serde_json::from_slice(&bytes)?;
            parent.attrs.extend(attrs);
        } else {
            let leaf: Leaf = serde_json::from_slice(&bytes)?;
            parent.insert(unescape(last), Node::Leaf(leaf));
        }
    }

    log::debug!("Read container with {} top-level nodes", root.children.len());
    Ok(root)
}

fn group_at<'g>(root: &'g mut Group, segments: &[String]) -> Result<&'g mut Group, NexusError> {
    let mut current = root;
    for segment in segments {
        let node = current
            .children
            .entry(segment.clone())
            .or_insert_with(|| Node::Group(Group::default()));
        current = match node {
            Node::Group(g) => g,
            Node::Leaf(_) => {
                return Err(NexusError::MalformedTree(format!(
                    "'{}' is both a leaf and a group",
                    segment
                )))
            }
        };
    }
    Ok(current)
}
