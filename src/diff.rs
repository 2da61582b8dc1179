//! Structural diff and merge of plain header trees.
//!
//! Multi-dataset text files store the first header in full and every later
//! header as a [`diff`] against it; readers rebuild them with [`merge`].
//!
//! A key removed from the new tree shows up in the diff as `null`. Merging
//! such a diff writes an explicit `null`; [`patched`] removes the key instead,
//! so deleted extra fields and map entries come back absent.

use serde_json::{Map, Value as Json};

/// Keys of `new` that are absent from or differ in `old`, recursing into
/// nested mappings; keys of `old` missing from `new` map to null.
pub fn diff(old: &Json, new: &Json) -> Json {
    match (old, new) {
        (Json::Object(old), Json::Object(new)) => Json::Object(diff_maps(old, new)),
        _ => new.clone(),
    }
}

fn diff_maps(old: &Map<String, Json>, new: &Map<String, Json>) -> Map<String, Json> {
    let mut out = Map::new();
    for (key, value) in new {
        match old.get(key) {
            Some(previous) if previous == value => {}
            Some(Json::Object(previous)) => {
                if let Json::Object(current) = value {
                    let nested = diff_maps(previous, current);
                    if !nested.is_empty() {
                        out.insert(key.clone(), Json::Object(nested));
                    }
                } else {
                    out.insert(key.clone(), value.clone());
                }
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    for key in old.keys() {
        if !new.contains_key(key) {
            out.insert(key.clone(), Json::Null);
        }
    }
    out
}

/// Apply `patch` onto `base` in place.
///
/// Nested mappings merge recursively; a non-mapping base value is replaced
/// by an empty mapping first. Everything else overwrites, including null.
pub fn merge(base: &mut Json, patch: &Json) {
    let Json::Object(patch) = patch else {
        *base = patch.clone();
        return;
    };
    if !base.is_object() {
        *base = Json::Object(Map::new());
    }
    if let Json::Object(target) = base {
        for (key, value) in patch {
            if value.is_object() {
                let slot = target.entry(key.clone()).or_insert_with(|| Json::Object(Map::new()));
                merge(slot, value);
            } else {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// [`merge`] into a copy of `base`
pub fn merged(base: &Json, patch: &Json) -> Json {
    let mut out = base.clone();
    merge(&mut out, patch);
    out
}

/// [`merged`], then drop every key the patch maps to null
pub fn patched(base: &Json, patch: &Json) -> Json {
    let mut out = merged(base, patch);
    drop_deleted(&mut out, patch);
    out
}

fn drop_deleted(target: &mut Json, patch: &Json) {
    let (Json::Object(target), Json::Object(patch)) = (target, patch) else {
        return;
    };
    target.retain(|key, _| !matches!(patch.get(key), Some(Json::Null)));
    for (key, value) in patch {
        if let Some(slot) = target.get_mut(key) {
            drop_deleted(slot, value);
        }
    }
}
