use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute attached to a group or leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Flag
    Bool(bool),
    /// Integer, e.g. an order index
    Int(i64),
    /// Float
    Float(f64),
    /// Text, e.g. a class tag or unit
    Str(String),
    /// List of names, e.g. plot axes
    StrList(Vec<String>),
}

impl AttrValue {
    /// String view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

/// Payload of a leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LeafData {
    /// Placeholder for a value without an encoding
    Empty,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(#[serde(with = "super::float_repr")] f64),
    /// String, also used for embedded JSON blobs
    Str(String),
    /// Data column
    FloatArray(#[serde(with = "super::float_repr::vec")] Vec<f64>),
}

/// Named container of attributes and children.
///
/// Children are kept sorted by name; any meaningful order is carried by
/// explicit index attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Attributes
    pub attrs: BTreeMap<String, AttrValue>,
    /// Child nodes by name
    pub children: BTreeMap<String, Node>,
}

/// Named value with attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Attributes
    pub attrs: BTreeMap<String, AttrValue>,
    /// Payload
    pub data: LeafData,
}

/// Node of the hierarchical tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Container
    Group(Group),
    /// Value
    Leaf(Leaf),
}

impl Group {
    /// Group with a single attribute
    pub fn tagged(key: &str, value: impl Into<AttrValue>) -> Self {
        let mut group = Self::default();
        group.attrs.insert(key.to_string(), value.into());
        group
    }

    /// String attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(AttrValue::as_str)
    }

    /// Child group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        match self.children.get(name) {
            Some(Node::Group(g)) => Some(g),
            _ => None,
        }
    }

    /// Add or replace a child
    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }
}

impl Leaf {
    /// Leaf without attributes
    pub fn new(data: LeafData) -> Self {
        Self {
            attrs: BTreeMap::new(),
            data,
        }
    }
}

impl Node {
    /// Attributes of either kind of node
    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        match self {
            Node::Group(g) => &g.attrs,
            Node::Leaf(l) => &l.attrs,
        }
    }

    /// Mutable attributes of either kind of node
    pub fn attrs_mut(&mut self) -> &mut BTreeMap<String, AttrValue> {
        match self {
            Node::Group(g) => &mut g.attrs,
            Node::Leaf(l) => &mut l.attrs,
        }
    }
}
