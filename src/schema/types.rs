use std::fmt;

use serde_json::Value as Json;

use crate::resolve::Record;

/// Primitive kinds a scalar field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Boolean flag
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    Str,
    /// ISO-8601 date or date-time
    DateTime,
    /// Any value, kept untouched
    Any,
}

impl ScalarKind {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Str => "str",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Any => "any",
        }
    }

    fn matches_kind(&self, raw: &Json) -> bool {
        match (self, raw) {
            (ScalarKind::Any, _) => true,
            (ScalarKind::Bool, Json::Bool(_)) => true,
            (ScalarKind::Int, Json::Number(n)) => n.is_i64() || n.is_u64(),
            (ScalarKind::Float, Json::Number(n)) => n.is_f64(),
            (ScalarKind::Str, Json::String(_)) => true,
            _ => false,
        }
    }
}

/// Declared type of a schema field.
///
/// The set of tags is closed; the resolver evaluates it with a single
/// recursive match, so adding a tag is a compile-time checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A primitive value
    Scalar(ScalarKind),
    /// The inner type, or null
    Optional(Box<TypeExpr>),
    /// The first candidate (in declared order) that accepts the value
    Union(Vec<TypeExpr>),
    /// A homogeneous sequence
    List(Box<TypeExpr>),
    /// A sequence of fixed arity with per-position types
    Tuple(Vec<TypeExpr>),
    /// A keyed map; `None` when key and value types are not declared
    Map(Option<Box<(TypeExpr, TypeExpr)>>),
    /// One of a fixed set of strings
    Literal(Vec<&'static str>),
    /// A nested record, by registered schema name
    Record(&'static str),
}

impl TypeExpr {
    /// `bool`
    pub fn bool() -> Self {
        TypeExpr::Scalar(ScalarKind::Bool)
    }

    /// `int`
    pub fn int() -> Self {
        TypeExpr::Scalar(ScalarKind::Int)
    }

    /// `float`
    pub fn float() -> Self {
        TypeExpr::Scalar(ScalarKind::Float)
    }

    /// `str`
    pub fn str() -> Self {
        TypeExpr::Scalar(ScalarKind::Str)
    }

    /// `datetime`
    pub fn datetime() -> Self {
        TypeExpr::Scalar(ScalarKind::DateTime)
    }

    /// `any`
    pub fn any() -> Self {
        TypeExpr::Scalar(ScalarKind::Any)
    }

    /// Nullable `inner`
    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }

    /// Ordered union of candidates
    pub fn union(candidates: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(candidates)
    }

    /// List of `item`
    pub fn list(item: TypeExpr) -> Self {
        TypeExpr::List(Box::new(item))
    }

    /// Fixed-arity tuple
    pub fn tuple(items: Vec<TypeExpr>) -> Self {
        TypeExpr::Tuple(items)
    }

    /// Map with declared key and value types
    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map(Some(Box::new((key, value))))
    }

    /// Map without declared key/value types
    pub fn untyped_map() -> Self {
        TypeExpr::Map(None)
    }

    /// String enumeration
    pub fn literal(allowed: &[&'static str]) -> Self {
        TypeExpr::Literal(allowed.to_vec())
    }

    /// Nested record
    pub fn record(schema: &'static str) -> Self {
        TypeExpr::Record(schema)
    }

    /// Whether the native kind of `raw` matches this type exactly, without
    /// any coercion.
    pub fn matches_kind(&self, raw: &Json) -> bool {
        match self {
            TypeExpr::Scalar(kind) => kind.matches_kind(raw),
            TypeExpr::Optional(inner) => raw.is_null() || inner.matches_kind(raw),
            TypeExpr::Union(candidates) => candidates.iter().any(|c| c.matches_kind(raw)),
            TypeExpr::List(_) | TypeExpr::Tuple(_) => raw.is_array(),
            TypeExpr::Map(_) | TypeExpr::Record(_) => raw.is_object(),
            TypeExpr::Literal(_) => raw.is_string(),
        }
    }

    /// Element type at `index` when this type describes a sequence.
    ///
    /// Looks through `Optional` and picks the first sequence candidate of a
    /// `Union`.
    pub fn sequence_item(&self, index: usize) -> Option<&TypeExpr> {
        match self {
            TypeExpr::List(item) => Some(item),
            TypeExpr::Tuple(items) => items.get(index),
            TypeExpr::Optional(inner) => inner.sequence_item(index),
            TypeExpr::Union(candidates) => {
                candidates.iter().find_map(|c| c.sequence_item(index))
            }
            _ => None,
        }
    }

    /// Arity when this type is (or wraps) a tuple
    pub fn tuple_arity(&self) -> Option<usize> {
        match self {
            TypeExpr::Tuple(items) => Some(items.len()),
            TypeExpr::Optional(inner) => inner.tuple_arity(),
            _ => None,
        }
    }

    /// Whether a record of schema `name` is acceptable for this type
    pub fn admits_record(&self, name: &str) -> bool {
        match self {
            TypeExpr::Record(schema) => *schema == name,
            TypeExpr::Scalar(ScalarKind::Any) => true,
            TypeExpr::Optional(inner) => inner.admits_record(name),
            TypeExpr::Union(candidates) => candidates.iter().any(|c| c.admits_record(name)),
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Scalar(kind) => f.write_str(kind.name()),
            TypeExpr::Optional(inner) => write!(f, "{}?", inner),
            TypeExpr::Union(candidates) => {
                f.write_str("(")?;
                for (i, c) in candidates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
            TypeExpr::List(item) => write!(f, "[{}]", item),
            TypeExpr::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            TypeExpr::Map(Some(kv)) => write!(f, "{{{}: {}}}", kv.0, kv.1),
            TypeExpr::Map(None) => f.write_str("{..}"),
            TypeExpr::Literal(allowed) => {
                for (i, a) in allowed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "'{}'", a)?;
                }
                Ok(())
            }
            TypeExpr::Record(name) => f.write_str(name),
        }
    }
}

/// One named field of a record schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name as it appears in headers
    pub name: &'static str,
    /// Declared type
    pub ty: TypeExpr,
    /// Whether the field may be omitted (absent or null)
    pub optional: bool,
}

impl FieldDescriptor {
    /// A field that must be present and non-null
    pub fn required(name: &'static str, ty: TypeExpr) -> Self {
        Self {
            name,
            ty,
            optional: false,
        }
    }

    /// A field that may be omitted
    pub fn optional(name: &'static str, ty: TypeExpr) -> Self {
        Self {
            name,
            ty,
            optional: true,
        }
    }
}

/// Constructor-level check run after all fields of a record are resolved
pub type RecordCheck = fn(&Record) -> Result<(), String>;

/// Declarative description of one record type
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    check: Option<RecordCheck>,
}

impl SchemaDescriptor {
    /// Start a descriptor for the record type `name`
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            check: None,
        }
    }

    /// Append a required field
    pub fn field(mut self, name: &'static str, ty: TypeExpr) -> Self {
        self.fields.push(FieldDescriptor::required(name, ty));
        self
    }

    /// Append an optional field
    pub fn optional_field(mut self, name: &'static str, ty: TypeExpr) -> Self {
        self.fields.push(FieldDescriptor::optional(name, ty));
        self
    }

    /// Attach a constructor check
    pub fn with_check(mut self, check: RecordCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Record type name, used as the tag in tree encodings
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field by name
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a declared field
    pub fn is_known(&self, name: &str) -> bool {
        self.field_named(name).is_some()
    }

    /// Whether the declared field `name` may be omitted
    pub fn is_optional(&self, name: &str) -> bool {
        self.field_named(name).map(|f| f.optional).unwrap_or(true)
    }

    pub(crate) fn check(&self) -> Option<RecordCheck> {
        self.check
    }
}

impl PartialEq for SchemaDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}
