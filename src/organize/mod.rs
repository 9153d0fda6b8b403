//! Analyzer modules that turn a design tree into improvement suggestions.

mod component;
mod layout;
mod naming;
mod runner;
mod safe_area;
mod types;

pub use component::ComponentAnalyzer;
pub use layout::{detect_arrangement, find_layout_candidates, spacing_pattern, LayoutAnalyzer};
pub use naming::{find_rename_candidates, is_unclear_name, name_issues, suggest_name, NamingAnalyzer};
pub use runner::{analyze, count_nodes, ModuleSelection, NodeCounts, Runner};
pub use safe_area::{find_safe_area_candidates, needs_safe_area, SafeAreaAnalyzer, SAFE_AREA_ISSUE};
pub use types::{
    AnalysisResult, AnalysisSummary, Arrangement, AutoLayoutConfig, Candidates, ComponentCandidate,
    Confidence, LayoutCandidate, LayoutMode, Module, ModuleResult, ModuleSummary, Priority,
    RenameCandidate, RenameIssue, SafeAreaCandidate, SpacingPattern,
};

use crate::tree::Document;

/// A single analysis module.
///
/// Implementations must keep all traversal state inside `analyze`, so one
/// analyzer can serve many documents, including concurrently.
pub trait Analyzer: Send + Sync {
    /// The module this analyzer reports under.
    fn module(&self) -> Module;

    /// Analyze a document and return this module's result.
    fn analyze(&self, document: &Document) -> ModuleResult;
}
