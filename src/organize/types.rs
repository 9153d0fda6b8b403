//! Core types for analysis results.

use serde::Serialize;
use std::collections::BTreeMap;

/// Priority of a rename or safe-area suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank: high first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence of a layout or component suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Naming defects detected by the rename analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RenameIssue {
    #[serde(rename = "contains_spaces")]
    ContainsSpaces,
    #[serde(rename = "contains_special_chars")]
    ContainsSpecialChars,
    #[serde(rename = "not_kebab_case")]
    NotKebabCase,
    #[serde(rename = "too_long")]
    TooLong,
    #[serde(rename = "unclear_name")]
    UnclearName,
}

impl RenameIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenameIssue::ContainsSpaces => "contains_spaces",
            RenameIssue::ContainsSpecialChars => "contains_special_chars",
            RenameIssue::NotKebabCase => "not_kebab_case",
            RenameIssue::TooLong => "too_long",
            RenameIssue::UnclearName => "unclear_name",
        }
    }
}

impl std::fmt::Display for RenameIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A name shared by one or more nodes that should be changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCandidate {
    pub current_name: String,
    /// Id of the first node carrying the name.
    pub id: String,
    /// Ids of every node carrying the name, in traversal order.
    pub paths: Vec<String>,
    pub issues: Vec<RenameIssue>,
    pub suggested_name: String,
    pub priority: Priority,
}

/// Inferred axis alignment of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    Horizontal,
    Vertical,
    Mixed,
}

impl Arrangement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arrangement::Horizontal => "horizontal",
            Arrangement::Vertical => "vertical",
            Arrangement::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingPattern {
    pub has_consistent_spacing: bool,
    pub estimated_spacing: i64,
    pub spacing_variance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Horizontal => "HORIZONTAL",
            LayoutMode::Vertical => "VERTICAL",
        }
    }
}

/// Auto-layout settings proposed for a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLayoutConfig {
    pub mode: LayoutMode,
    pub spacing: i64,
    pub alignment: String,
}

/// A container whose children could be managed by auto-layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCandidate {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub reason: String,
    pub children_count: usize,
    pub arrangement: Arrangement,
    pub spacing_pattern: SpacingPattern,
    pub confidence: Confidence,
    pub suggested_config: AutoLayoutConfig,
}

/// A frame sized like a device screen that likely needs safe-area insets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAreaCandidate {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub reason: String,
    pub priority: Priority,
    pub recommendation: String,
    pub issues: Vec<String>,
}

/// A subtree that could be extracted into a reusable component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCandidate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub path: String,
    pub reason: String,
    pub confidence: Confidence,
    pub children_count: usize,
    pub is_repeated: bool,
    pub similar_nodes: Vec<String>,
    pub recommendation: String,
}

/// Candidates produced by one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Candidates {
    Rename(Vec<RenameCandidate>),
    Component(Vec<ComponentCandidate>),
    Layout(Vec<LayoutCandidate>),
    SafeArea(Vec<SafeAreaCandidate>),
}

impl Candidates {
    /// An empty candidate list of the kind `module` produces.
    pub fn empty(module: Module) -> Self {
        match module {
            Module::Rename => Candidates::Rename(Vec::new()),
            Module::Component => Candidates::Component(Vec::new()),
            Module::Layout => Candidates::Layout(Vec::new()),
            Module::SafeArea => Candidates::SafeArea(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Candidates::Rename(c) => c.len(),
            Candidates::Component(c) => c.len(),
            Candidates::Layout(c) => c.len(),
            Candidates::SafeArea(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Analyzer modules, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Module {
    #[serde(rename = "rename")]
    Rename,
    #[serde(rename = "component")]
    Component,
    #[serde(rename = "layout")]
    Layout,
    #[serde(rename = "safearea")]
    SafeArea,
}

impl Module {
    pub const ALL: [Module; 4] = [
        Module::Rename,
        Module::Component,
        Module::Layout,
        Module::SafeArea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Rename => "rename",
            Module::Component => "component",
            Module::Layout => "layout",
            Module::SafeArea => "safearea",
        }
    }

    /// Parse a module name, accepting the common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rename" | "naming" => Some(Module::Rename),
            "component" | "components" => Some(Module::Component),
            "layout" => Some(Module::Layout),
            "safearea" | "safe-area" | "safe_area" => Some(Module::SafeArea),
            _ => None,
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::parse(s).ok_or_else(|| format!("unknown module: {}", s))
    }
}

/// Output of one analyzer module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResult {
    pub module_name: String,
    pub enabled: bool,
    pub candidates_count: usize,
    pub candidates: Candidates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BTreeMap<String, usize>>,
}

impl ModuleResult {
    pub fn new(module: Module, candidates: Candidates) -> Self {
        Self {
            module_name: module.as_str().to_string(),
            enabled: true,
            candidates_count: candidates.len(),
            candidates,
            summary: None,
        }
    }

    /// Placeholder result for a module that was switched off.
    pub fn disabled(module: Module) -> Self {
        Self {
            module_name: module.as_str().to_string(),
            enabled: false,
            candidates_count: 0,
            candidates: Candidates::empty(module),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: BTreeMap<String, usize>) -> Self {
        self.summary = Some(summary);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub enabled: bool,
    pub candidates_count: usize,
}

/// Global counts for one analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_nodes: usize,
    pub frame_count: usize,
    pub group_count: usize,
    pub component_count: usize,
    pub text_count: usize,
    pub estimated_automation_savings: String,
    pub modules_summary: BTreeMap<String, ModuleSummary>,
    pub component_candidates_count: usize,
    pub rename_candidates_count: usize,
    pub layout_candidates_count: usize,
    pub safe_area_candidates_count: usize,
}

/// Everything one analysis call produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub component_candidates: Vec<ComponentCandidate>,
    pub rename_candidates: Vec<RenameCandidate>,
    pub layout_candidates: Vec<LayoutCandidate>,
    pub safe_area_candidates: Vec<SafeAreaCandidate>,
    pub summary: AnalysisSummary,
    pub modules: BTreeMap<String, ModuleResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_aliases() {
        assert_eq!(Module::parse("naming"), Some(Module::Rename));
        assert_eq!(Module::parse("Safe-Area"), Some(Module::SafeArea));
        assert_eq!(Module::parse("safe_area"), Some(Module::SafeArea));
        assert_eq!(Module::parse("colors"), None);
        assert!("layout".parse::<Module>().is_ok());
    }

    #[test]
    fn test_disabled_module_result() {
        let result = ModuleResult::disabled(Module::Layout);
        assert!(!result.enabled);
        assert_eq!(result.candidates_count, 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "moduleName": "layout",
                "enabled": false,
                "candidatesCount": 0,
                "candidates": []
            })
        );
    }

    #[test]
    fn test_issue_serialization() {
        let json = serde_json::to_string(&vec![RenameIssue::ContainsSpaces, RenameIssue::UnclearName])
            .unwrap();
        assert_eq!(json, r#"["contains_spaces","unclear_name"]"#);
    }
}
