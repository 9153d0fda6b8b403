//! Design document tree model and traversal.
//!
//! Exported design files arrive in three shapes: a `{"document": ...}`
//! envelope, a bare array of root nodes, or a single root node. [`Document`]
//! normalizes all three so every analyzer walks the tree the same way.

mod node;
mod walker;

pub use node::{BoundingBox, Document, DocumentError, Node};
pub use walker::{walk, Visit};
