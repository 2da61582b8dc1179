use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use super::{Record, ResolutionError, ResolutionWarning, Timestamp, Value, WarningKind};
use crate::schema::{FieldDescriptor, ScalarKind, SchemaDescriptor, SchemaRegistry, TypeExpr};

/// How a failed coercion is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Failures are errors; used for union candidates
    Strict,
    /// Failures keep the raw value and record a warning
    Lenient,
}

/// Turns raw parsed trees into typed values.
///
/// A resolver collects the warnings of everything it resolved until they are
/// taken out with [`Resolver::take_warnings`] or [`Resolver::into_warnings`].
#[derive(Debug)]
pub struct Resolver<'r> {
    registry: &'r SchemaRegistry,
    warnings: Vec<ResolutionWarning>,
    path: Vec<String>,
}

impl<'r> Resolver<'r> {
    /// Resolver looking up record types in `registry`
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            warnings: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Registry used for record lookups
    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Resolve `raw` against `expr`, degrading failures to warnings where
    /// the type allows it
    pub fn resolve(&mut self, expr: &TypeExpr, raw: &Json) -> Result<Value, ResolutionError> {
        self.resolve_in(expr, raw, Mode::Lenient)
    }

    /// Resolve `raw` as the root record of type `schema`.
    ///
    /// Required fields of the root record must resolve; all other failures
    /// become warnings.
    pub fn resolve_record(&mut self, schema: &str, raw: &Json) -> Result<Record, ResolutionError> {
        let descriptor = self.registry.lookup(schema)?;
        if !raw.is_object() {
            return Err(ResolutionError::TypeMismatch {
                path: self.path_string(),
                expected: schema.to_string(),
                found: json_kind(raw).to_string(),
            });
        }
        self.record(descriptor, raw, true)
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    /// Take the collected warnings, leaving none behind
    pub fn take_warnings(&mut self) -> Vec<ResolutionWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Consume the resolver, returning its warnings
    pub fn into_warnings(self) -> Vec<ResolutionWarning> {
        self.warnings
    }

    pub(crate) fn enter(&mut self, name: &str) {
        self.path.push(name.to_string());
    }

    pub(crate) fn enter_index(&mut self, index: usize) {
        self.path.push(format!("[{}]", index));
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    pub(crate) fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    pub(crate) fn warn(&mut self, kind: WarningKind) {
        let warning = ResolutionWarning::new(self.path_string(), kind);
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn mark(&self) -> usize {
        self.warnings.len()
    }

    pub(crate) fn rollback(&mut self, mark: usize) {
        self.warnings.truncate(mark);
    }

    pub(crate) fn resolve_in(
        &mut self,
        expr: &TypeExpr,
        raw: &Json,
        mode: Mode,
    ) -> Result<Value, ResolutionError> {
        match expr {
            TypeExpr::Scalar(kind) => self.scalar(expr, *kind, raw, mode),
            TypeExpr::Optional(inner) => {
                if raw.is_null() {
                    Ok(Value::Null)
                } else {
                    self.resolve_in(inner, raw, mode)
                }
            }
            TypeExpr::Union(candidates) => self.union(expr, candidates, raw),
            TypeExpr::List(item) => match raw {
                Json::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, element) in items.iter().enumerate() {
                        self.enter_index(i);
                        let resolved = self.resolve_in(item, element, mode);
                        self.leave();
                        out.push(resolved?);
                    }
                    Ok(Value::List(out))
                }
                Json::Object(_) | Json::Null => self.mismatch(expr, raw, mode),
                scalar => {
                    self.enter_index(0);
                    let resolved = self.resolve_in(item, scalar, mode);
                    self.leave();
                    Ok(Value::List(vec![resolved?]))
                }
            },
            TypeExpr::Tuple(items) => self.tuple(items, raw, mode),
            TypeExpr::Map(None) => match raw {
                Json::Object(_) => {
                    self.warn(WarningKind::UntypedMap);
                    Ok(Value::Raw(raw.clone()))
                }
                _ => self.mismatch(expr, raw, mode),
            },
            TypeExpr::Map(Some(kv)) => {
                let (key_ty, value_ty) = (&kv.0, &kv.1);
                let Json::Object(object) = raw else {
                    return self.mismatch(expr, raw, mode);
                };
                let mut entries = Vec::with_capacity(object.len());
                for (key, value) in object {
                    self.enter(key);
                    let resolved = self
                        .resolve_in(key_ty, &Json::String(key.clone()), mode)
                        .and_then(|k| Ok((k, self.resolve_in(value_ty, value, mode)?)));
                    self.leave();
                    entries.push(resolved?);
                }
                Ok(Value::Map(entries))
            }
            TypeExpr::Literal(allowed) => self.literal(allowed, raw, mode),
            TypeExpr::Record(name) => {
                let descriptor = self.registry.lookup(name)?;
                if !raw.is_object() {
                    return self.mismatch(expr, raw, mode);
                }
                Ok(Value::Record(self.record(descriptor, raw, false)?))
            }
        }
    }

    fn mismatch(&mut self, expected: &TypeExpr, raw: &Json, mode: Mode) -> Result<Value, ResolutionError> {
        match mode {
            Mode::Strict => Err(ResolutionError::TypeMismatch {
                path: self.path_string(),
                expected: expected.to_string(),
                found: json_kind(raw).to_string(),
            }),
            Mode::Lenient => {
                self.warn(WarningKind::TypeMismatch {
                    expected: expected.to_string(),
                    found: json_kind(raw).to_string(),
                });
                Ok(Value::Raw(raw.clone()))
            }
        }
    }

    fn scalar(
        &mut self,
        expr: &TypeExpr,
        kind: ScalarKind,
        raw: &Json,
        mode: Mode,
    ) -> Result<Value, ResolutionError> {
        let coerced = match (kind, raw) {
            (ScalarKind::Any, _) => return Ok(Value::Raw(raw.clone())),
            (ScalarKind::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
            (ScalarKind::Bool, Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            // Only integral floats; anything else would lose digits.
            (ScalarKind::Int, Json::Number(n)) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                    .map(|v| v as i64)
            })
            .map(Value::Int),
            (ScalarKind::Int, Json::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
            (ScalarKind::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
            (ScalarKind::Float, Json::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
            (ScalarKind::Str, Json::String(s)) => Some(Value::Str(s.clone())),
            (ScalarKind::Str, Json::Number(n)) => Some(Value::Str(n.to_string())),
            (ScalarKind::Str, Json::Bool(b)) => Some(Value::Str(b.to_string())),
            (ScalarKind::DateTime, Json::String(s)) => Timestamp::parse(s).map(Value::Timestamp),
            _ => None,
        };
        match coerced {
            Some(value) => Ok(value),
            None => self.mismatch(expr, raw, mode),
        }
    }

    fn union(
        &mut self,
        expr: &TypeExpr,
        candidates: &[TypeExpr],
        raw: &Json,
    ) -> Result<Value, ResolutionError> {
        let (exact, rest): (Vec<&TypeExpr>, Vec<&TypeExpr>) =
            candidates.iter().partition(|c| c.matches_kind(raw));

        let mark = self.mark();
        let mut first_error = None;
        for candidate in exact.into_iter().chain(rest) {
            match self.resolve_in(candidate, raw, Mode::Strict) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    self.rollback(mark);
                    first_error.get_or_insert(e);
                }
            }
        }

        let path = self.path_string();
        let source = first_error.unwrap_or_else(|| ResolutionError::TypeMismatch {
            path: path.clone(),
            expected: expr.to_string(),
            found: json_kind(raw).to_string(),
        });
        Err(ResolutionError::UnionMismatch {
            path,
            expected: expr.to_string(),
            source: Box::new(source),
        })
    }

    fn tuple(&mut self, items: &[TypeExpr], raw: &Json, mode: Mode) -> Result<Value, ResolutionError> {
        let elements: Vec<&Json> = match raw {
            Json::Array(elements) => elements.iter().collect(),
            Json::Object(_) | Json::Null => {
                return self.mismatch(&TypeExpr::Tuple(items.to_vec()), raw, mode)
            }
            scalar => vec![scalar],
        };

        if raw.is_array() && elements.len() != items.len() {
            match mode {
                Mode::Strict => {
                    return Err(ResolutionError::TupleArity {
                        path: self.path_string(),
                        expected: items.len(),
                        found: elements.len(),
                    })
                }
                Mode::Lenient => self.warn(WarningKind::TupleArity {
                    expected: items.len(),
                    found: elements.len(),
                }),
            }
        }

        let mut out = Vec::with_capacity(items.len());
        for (i, (ty, element)) in items.iter().zip(elements).enumerate() {
            self.enter_index(i);
            let resolved = self.resolve_in(ty, element, mode);
            self.leave();
            out.push(resolved?);
        }
        Ok(Value::List(out))
    }

    fn literal(
        &mut self,
        allowed: &[&'static str],
        raw: &Json,
        mode: Mode,
    ) -> Result<Value, ResolutionError> {
        if let Json::String(s) = raw {
            if allowed.contains(&s.as_str()) {
                return Ok(Value::Str(s.clone()));
            }
        }
        let value = match raw {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        };
        let allowed = format!("{:?}", allowed);
        match mode {
            Mode::Strict => Err(ResolutionError::InvalidLiteral {
                path: self.path_string(),
                value,
                allowed,
            }),
            Mode::Lenient => {
                self.warn(WarningKind::InvalidLiteral {
                    value: value.clone(),
                    allowed,
                });
                Ok(Value::Str(value))
            }
        }
    }

    /// Fields are always resolved leniently; a record only fails on a
    /// missing required field or a failing check, even inside a union.
    fn record(
        &mut self,
        descriptor: Arc<SchemaDescriptor>,
        raw: &Json,
        root: bool,
    ) -> Result<Record, ResolutionError> {
        let empty = serde_json::Map::new();
        let object = raw.as_object().unwrap_or(&empty);

        let mut values = IndexMap::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            let raw_field = object.get(field.name);
            self.enter(field.name);
            let resolved = self.field(&descriptor, field, raw_field, root, |r, raw| {
                r.resolve_in(&field.ty, raw, Mode::Lenient)
            });
            self.leave();
            values.insert(field.name, resolved?);
        }

        let extra = object
            .iter()
            .filter(|(name, _)| !descriptor.is_known(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        self.finish_record(descriptor, values, extra)
    }

    /// Apply the per-field policy around `resolve`.
    ///
    /// Absent or null values are null for optional fields and an error for
    /// required ones. Other failures keep `raw` with a warning, except for
    /// required fields of the root record.
    pub(crate) fn field<F>(
        &mut self,
        descriptor: &SchemaDescriptor,
        field: &FieldDescriptor,
        raw: Option<&Json>,
        root: bool,
        resolve: F,
    ) -> Result<Value, ResolutionError>
    where
        F: FnOnce(&mut Self, &Json) -> Result<Value, ResolutionError>,
    {
        let raw = match raw {
            Some(raw) if !raw.is_null() => raw,
            _ if field.optional => return Ok(Value::Null),
            _ => {
                return Err(ResolutionError::MissingField {
                    record: descriptor.name().to_string(),
                    field: field.name.to_string(),
                })
            }
        };

        let fatal = root && !field.optional;
        let mark = self.mark();
        match resolve(self, raw) {
            Ok(Value::Raw(_)) if fatal && !accepts_raw(&field.ty) => {
                self.rollback(mark);
                Err(ResolutionError::Field {
                    record: descriptor.name().to_string(),
                    field: field.name.to_string(),
                    source: Box::new(ResolutionError::TypeMismatch {
                        path: self.path_string(),
                        expected: field.ty.to_string(),
                        found: json_kind(raw).to_string(),
                    }),
                })
            }
            Ok(value) => Ok(value),
            Err(e) if fatal => Err(ResolutionError::Field {
                record: descriptor.name().to_string(),
                field: field.name.to_string(),
                source: Box::new(e),
            }),
            Err(e) => {
                self.rollback(mark);
                self.warn(WarningKind::FieldFallback {
                    cause: e.to_string(),
                });
                Ok(Value::Raw(raw.clone()))
            }
        }
    }

    pub(crate) fn finish_record(
        &mut self,
        descriptor: Arc<SchemaDescriptor>,
        values: IndexMap<&'static str, Value>,
        extra: serde_json::Map<String, Json>,
    ) -> Result<Record, ResolutionError> {
        let record = Record::from_parts(descriptor, values, extra);
        record.run_check()?;
        Ok(record)
    }
}

/// Whether a raw value is a legitimate resolution result for `ty`
fn accepts_raw(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Scalar(ScalarKind::Any) | TypeExpr::Map(None) => true,
        TypeExpr::Optional(inner) => accepts_raw(inner),
        TypeExpr::Union(candidates) => candidates.iter().any(accepts_raw),
        _ => false,
    }
}

pub(crate) fn json_kind(raw: &Json) -> &'static str {
    match raw {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(n) if n.is_f64() => "float",
        Json::Number(_) => "int",
        Json::String(_) => "str",
        Json::Array(_) => "list",
        Json::Object(_) => "mapping",
    }
}
