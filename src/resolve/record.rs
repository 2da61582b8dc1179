use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use super::{ResolutionError, ResolutionWarning, Resolver, Value};
use crate::schema::{registry, SchemaDescriptor, SchemaRegistry};

/// A header record resolved against its schema.
///
/// Every declared field has a slot; absent optional fields hold
/// [`Value::Null`]. Names unknown to the schema live in an ordered side
/// channel and are written back verbatim on encode.
#[derive(Clone)]
pub struct Record {
    descriptor: Arc<SchemaDescriptor>,
    fields: IndexMap<&'static str, Value>,
    extra: serde_json::Map<String, Json>,
}

impl Record {
    pub(crate) fn from_parts(
        descriptor: Arc<SchemaDescriptor>,
        fields: IndexMap<&'static str, Value>,
        extra: serde_json::Map<String, Json>,
    ) -> Self {
        Self {
            descriptor,
            fields,
            extra,
        }
    }

    /// Build a record of `schema` from already typed field values.
    ///
    /// Missing optional fields are set to null. Unknown names go to the
    /// extra-field channel as their plain projection. Missing required fields
    /// and failing record checks are errors.
    pub fn build<I, K>(schema: &str, fields: I) -> Result<Self, ResolutionError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        Self::build_in(registry(), schema, fields)
    }

    /// [`Record::build`] against an explicit registry
    pub fn build_in<I, K>(
        registry: &SchemaRegistry,
        schema: &str,
        fields: I,
    ) -> Result<Self, ResolutionError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let descriptor = registry.lookup(schema)?;
        let mut given: IndexMap<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v))
            .collect();

        let mut values = IndexMap::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            let value = given.shift_remove(field.name).unwrap_or(Value::Null);
            if value.is_null() && !field.optional {
                return Err(ResolutionError::MissingField {
                    record: descriptor.name().to_string(),
                    field: field.name.to_string(),
                });
            }
            values.insert(field.name, value);
        }

        let mut scratch = Vec::new();
        let extra = given
            .into_iter()
            .map(|(k, v)| {
                let plain = v.to_plain(&k, &mut scratch);
                (k, plain)
            })
            .collect();

        let record = Self::from_parts(descriptor, values, extra);
        record.run_check()?;
        Ok(record)
    }

    /// Resolve a raw tree as a record of `schema` with the default registry
    pub fn from_raw(schema: &str, raw: &Json) -> Result<(Self, Vec<ResolutionWarning>), ResolutionError> {
        let mut resolver = Resolver::new(registry());
        let record = resolver.resolve_record(schema, raw)?;
        Ok((record, resolver.into_warnings()))
    }

    pub(crate) fn run_check(&self) -> Result<(), ResolutionError> {
        if let Some(check) = self.descriptor.check() {
            check(self).map_err(|message| ResolutionError::Validation {
                record: self.schema_name().to_string(),
                message,
            })?;
        }
        Ok(())
    }

    /// Schema name, used as the record's tag
    pub fn schema_name(&self) -> &'static str {
        self.descriptor.name()
    }

    /// Descriptor this record was resolved against
    pub fn descriptor(&self) -> &Arc<SchemaDescriptor> {
        &self.descriptor
    }

    /// Value of a declared field, or `None` for undeclared names
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Declared fields in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Replace a declared field; undeclared names are stored as extras.
    ///
    /// Setting a required field to null is rejected.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ResolutionError> {
        match self.descriptor.field_named(name) {
            Some(field) => {
                if value.is_null() && !field.optional {
                    return Err(ResolutionError::MissingField {
                        record: self.schema_name().to_string(),
                        field: name.to_string(),
                    });
                }
                self.fields.insert(field.name, value);
                Ok(())
            }
            None => {
                let mut scratch = Vec::new();
                let plain = value.to_plain(name, &mut scratch);
                self.extra.insert(name.to_string(), plain);
                Ok(())
            }
        }
    }

    /// Fields not declared by the schema, in input order
    pub fn extra(&self) -> &serde_json::Map<String, Json> {
        &self.extra
    }

    /// Append or replace an extra field
    pub fn insert_extra(&mut self, name: impl Into<String>, value: Json) {
        self.extra.insert(name.into(), value);
    }

    /// Walk a dotted path through nested records, e.g.
    /// `data_source.sample.name`. Extras are not traversed.
    pub fn path(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let first = parts.next()?;
        let mut current = self.get(first)?;
        for part in parts {
            current = current.as_record()?.get(part)?;
        }
        Some(current)
    }

    /// Plain JSON mapping: declared fields in order (null optionals
    /// omitted), followed by extras.
    pub fn to_plain(&self) -> Json {
        let mut scratch = Vec::new();
        self.to_plain_at("", &mut scratch)
    }

    /// [`Record::to_plain`], collecting warnings for unrepresentable values
    pub fn to_plain_with_warnings(&self) -> (Json, Vec<ResolutionWarning>) {
        let mut warnings = Vec::new();
        let plain = self.to_plain_at("", &mut warnings);
        (plain, warnings)
    }

    pub(crate) fn to_plain_at(&self, path: &str, warnings: &mut Vec<ResolutionWarning>) -> Json {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            if value.is_null() && self.descriptor.is_optional(name) {
                continue;
            }
            let child = join_path(path, name);
            map.insert(name.to_string(), value.to_plain(&child, warnings));
        }
        for (name, value) in &self.extra {
            map.insert(name.clone(), value.clone());
        }
        Json::Object(map)
    }
}

pub(crate) fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema_name() == other.schema_name()
            && self.fields == other.fields
            && self.extra == other.extra
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema_name());
        for (name, value) in &self.fields {
            if !value.is_null() {
                s.field(name, value);
            }
        }
        if !self.extra.is_empty() {
            s.field("extra", &self.extra);
        }
        s.finish()
    }
}
