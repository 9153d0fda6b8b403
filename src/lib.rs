//! figma-organizer - tidy-up suggestions for exported design trees.
//!
//! Reads the JSON export of a design document (a tree of frames, groups,
//! components and text layers) and reports what could be cleaned up:
//! layers with generic or malformed names, containers whose children are
//! evenly spaced and could use auto-layout, and screen-sized frames that
//! probably need safe-area insets.
//!
//! # Architecture
//!
//! - `tree`: lenient document model and the shared depth-first walker
//! - `organize`: one [`organize::Analyzer`] per module plus the [`Runner`]
//!   that merges their results
//! - `savings`: time-saved estimate shown in the summary
//! - `config`: optional YAML configuration
//! - `report`: text, JSON, HTML and actionable-change output
//! - `server`: `POST /analyze` over HTTP

pub mod cli;
pub mod config;
pub mod organize;
pub mod report;
pub mod savings;
pub mod server;
pub mod tree;

pub use config::Config;
pub use organize::{analyze, AnalysisResult, Module, ModuleSelection, Runner};
pub use tree::{Document, Node};
