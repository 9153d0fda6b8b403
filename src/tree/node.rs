//! Lenient conversion of exported JSON into design nodes.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a document at the I/O boundary.
///
/// Once a document is parsed, analysis never fails.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Absolute position and size of a node in design space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let coord = |key: &str| obj.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self {
            x: coord("x"),
            y: coord("y"),
            width: coord("width"),
            height: coord("height"),
        })
    }
}

/// A single element of the design tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,
    pub node_type: Option<String>,
    pub children: Vec<Node>,
    pub bounding_box: Option<BoundingBox>,
}

impl Node {
    /// Build a node from a JSON object. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }

    /// Builds the subtree with an explicit stack; exports can nest far deeper
    /// than the call stack allows.
    fn from_object(root: &Map<String, Value>) -> Self {
        let mut stack = vec![Pending::new(root)];

        while let Some(top) = stack.last_mut() {
            match top.remaining.next() {
                Some(Value::Object(child)) => stack.push(Pending::new(child)),
                Some(_) => {}
                None => {
                    let Some(done) = stack.pop() else { break };
                    let node = done.finish();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return node,
                    }
                }
            }
        }

        Node::default()
    }

    /// Returns true if the node's type tag equals `kind`.
    pub fn is_type(&self, kind: &str) -> bool {
        self.node_type.as_deref() == Some(kind)
    }

    pub fn type_str(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }
}

/// A node whose children are still being built.
struct Pending<'a> {
    obj: &'a Map<String, Value>,
    remaining: std::slice::Iter<'a, Value>,
    children: Vec<Node>,
}

impl<'a> Pending<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        let items: &'a [Value] = match obj.get("children") {
            Some(Value::Array(items)) => items,
            _ => &[],
        };
        Self {
            obj,
            remaining: items.iter(),
            children: Vec::with_capacity(items.len()),
        }
    }

    fn finish(self) -> Node {
        let obj = self.obj;
        Node {
            id: obj.get("id").and_then(text_field),
            name: obj.get("name").and_then(text_field),
            node_type: obj
                .get("type")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            children: self.children,
            bounding_box: obj.get("absoluteBoundingBox").and_then(BoundingBox::from_value),
        }
    }
}

/// Strings and numbers are accepted; empty strings count as missing.
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A parsed design document in one of the accepted input shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Document {
    /// `null` or any value that carries no nodes.
    #[default]
    Empty,
    /// A `{"document": Node}` envelope, as produced by the file export API.
    Envelope(Node),
    /// A bare array of root nodes.
    Roots(Vec<Node>),
    /// A single root node.
    Single(Node),
}

impl Document {
    /// Classify an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Document::Roots(items.iter().filter_map(Node::from_value).collect()),
            Value::Object(obj) => match obj.get("document") {
                Some(Value::Object(doc)) => Document::Envelope(Node::from_object(doc)),
                _ => Document::Single(Node::from_object(obj)),
            },
            _ => Document::Empty,
        }
    }

    /// Parse a JSON string into a document.
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        Self::from_json_slice(input.as_bytes())
    }

    /// Parse a JSON byte slice into a document.
    pub fn from_json_slice(input: &[u8]) -> Result<Self, DocumentError> {
        let value = parse_unbounded(input)?;
        Ok(Self::from_value(&value))
    }

    /// Read and parse a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&content)
    }

    /// The root nodes traversal starts from.
    pub fn roots(&self) -> &[Node] {
        match self {
            Document::Empty => &[],
            Document::Envelope(node) | Document::Single(node) => std::slice::from_ref(node),
            Document::Roots(nodes) => nodes,
        }
    }
}

/// Parse JSON without serde_json's nesting limit, growing the stack on demand.
fn parse_unbounded(input: &[u8]) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(input);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::from_value(&value)
    }
}
