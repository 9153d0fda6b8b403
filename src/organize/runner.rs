//! Aggregation runner that executes the enabled analyzers.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::savings;
use crate::tree::{walk, Document};

use super::{
    AnalysisResult, AnalysisSummary, Analyzer, Candidates, ComponentAnalyzer, LayoutAnalyzer,
    Module, ModuleResult, ModuleSummary, NamingAnalyzer, SafeAreaAnalyzer,
};

/// Which analyzer modules run. Every module is enabled by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSelection {
    enabled: BTreeMap<Module, bool>,
}

impl Default for ModuleSelection {
    fn default() -> Self {
        Self {
            enabled: Module::ALL.iter().map(|m| (*m, true)).collect(),
        }
    }
}

impl ModuleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a name → enabled map. Unknown names are ignored.
    pub fn from_map<K: AsRef<str>>(overrides: &HashMap<K, bool>) -> Self {
        let mut selection = Self::default();
        selection.apply(overrides.iter().map(|(k, v)| (k.as_ref(), *v)));
        selection
    }

    /// Apply name → enabled overrides on top of the current state.
    pub fn apply<'a, I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        for (name, enabled) in overrides {
            match Module::parse(name) {
                Some(module) => self.set(module, enabled),
                None => debug!(module = name, "ignoring unknown module"),
            }
        }
    }

    pub fn set(&mut self, module: Module, enabled: bool) {
        self.enabled.insert(module, enabled);
    }

    pub fn is_enabled(&self, module: Module) -> bool {
        self.enabled.get(&module).copied().unwrap_or(true)
    }
}

/// Runs the analyzer modules over a document and merges their output.
pub struct Runner {
    analyzers: Vec<Box<dyn Analyzer>>,
    selection: ModuleSelection,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Create a runner with every built-in analyzer enabled.
    pub fn new() -> Self {
        Self {
            analyzers: vec![
                Box::new(NamingAnalyzer),
                Box::new(ComponentAnalyzer),
                Box::new(LayoutAnalyzer),
                Box::new(SafeAreaAnalyzer),
            ],
            selection: ModuleSelection::default(),
        }
    }

    /// Set which modules run.
    pub fn modules(mut self, selection: ModuleSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &ModuleSelection {
        &self.selection
    }

    /// Analyze one document. All traversal state is local to this call.
    pub fn run(&self, document: &Document) -> AnalysisResult {
        let mut modules: BTreeMap<String, ModuleResult> = BTreeMap::new();

        for analyzer in &self.analyzers {
            let module = analyzer.module();
            let enabled = self.selection.is_enabled(module);
            debug!(module = module.as_str(), enabled, "running analyzer");

            let result = if enabled {
                analyzer.analyze(document)
            } else {
                ModuleResult::disabled(module)
            };
            modules.insert(module.as_str().to_string(), result);
        }

        let counts = count_nodes(document);

        let mut component_candidates = Vec::new();
        let mut rename_candidates = Vec::new();
        let mut layout_candidates = Vec::new();
        let mut safe_area_candidates = Vec::new();
        for result in modules.values().filter(|m| m.enabled) {
            match &result.candidates {
                Candidates::Component(c) => component_candidates.extend(c.iter().cloned()),
                Candidates::Rename(c) => rename_candidates.extend(c.iter().cloned()),
                Candidates::Layout(c) => layout_candidates.extend(c.iter().cloned()),
                Candidates::SafeArea(c) => safe_area_candidates.extend(c.iter().cloned()),
            }
        }

        let modules_summary = modules
            .iter()
            .map(|(name, m)| {
                (
                    name.clone(),
                    ModuleSummary {
                        enabled: m.enabled,
                        candidates_count: m.candidates_count,
                    },
                )
            })
            .collect();

        let summary = AnalysisSummary {
            total_nodes: counts.total,
            frame_count: counts.frames,
            group_count: counts.groups,
            component_count: counts.components,
            text_count: counts.texts,
            estimated_automation_savings: savings::estimate(
                component_candidates.len(),
                rename_candidates.len(),
                layout_candidates.len(),
            ),
            modules_summary,
            component_candidates_count: component_candidates.len(),
            rename_candidates_count: rename_candidates.len(),
            layout_candidates_count: layout_candidates.len(),
            safe_area_candidates_count: safe_area_candidates.len(),
        };

        debug!(
            total_nodes = summary.total_nodes,
            renames = summary.rename_candidates_count,
            layouts = summary.layout_candidates_count,
            safe_areas = summary.safe_area_candidates_count,
            "analysis complete"
        );

        AnalysisResult {
            component_candidates,
            rename_candidates,
            layout_candidates,
            safe_area_candidates,
            summary,
            modules,
        }
    }
}

/// Node counts by type tag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounts {
    pub total: usize,
    pub frames: usize,
    pub groups: usize,
    pub components: usize,
    pub texts: usize,
}

/// Count typed nodes. Nodes without a `type` are traversed but not counted.
pub fn count_nodes(document: &Document) -> NodeCounts {
    let mut counts = NodeCounts::default();
    walk(document, |visit| {
        let Some(kind) = visit.node.node_type.as_deref() else {
            return;
        };
        counts.total += 1;
        match kind {
            "FRAME" => counts.frames += 1,
            "GROUP" => counts.groups += 1,
            "COMPONENT" => counts.components += 1,
            "TEXT" => counts.texts += 1,
            _ => {}
        }
    });
    counts
}

/// Analyze a document with optional module overrides.
///
/// `enabled_modules` maps module names (`rename`, `component`, `layout`,
/// `safearea`, or their aliases) to whether they run.
pub fn analyze(document: &Document, enabled_modules: Option<&HashMap<String, bool>>) -> AnalysisResult {
    let selection = enabled_modules
        .map(ModuleSelection::from_map)
        .unwrap_or_default();
    Runner::new().modules(selection).run(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::from(json!({"document": {
            "id": "0:0", "name": "Document", "type": "DOCUMENT",
            "children": [{
                "id": "1:0", "name": "Page 1", "type": "CANVAS",
                "children": [
                    {
                        "id": "2:0", "name": "Home Screen", "type": "FRAME",
                        "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812},
                        "children": [
                            {"id": "3:0", "name": "Title", "type": "TEXT", "absoluteBoundingBox": {"x": 0, "y": 0, "width": 50, "height": 20}},
                            {"id": "3:1", "name": "Group 1", "type": "GROUP", "absoluteBoundingBox": {"x": 60, "y": 0, "width": 50, "height": 20}},
                            {"id": "3:2", "name": "Button", "type": "COMPONENT", "absoluteBoundingBox": {"x": 120, "y": 0, "width": 50, "height": 20}}
                        ]
                    },
                    {"name": "orphan", "type": "RECTANGLE"},
                    {"id": "2:9", "name": "untyped"}
                ]
            }]
        }}))
    }

    #[test]
    fn test_counts_typed_nodes() {
        let counts = count_nodes(&sample());
        assert_eq!(
            counts,
            NodeCounts {
                total: 7,
                frames: 1,
                groups: 1,
                components: 1,
                texts: 1
            }
        );
    }

    #[test]
    fn test_runs_all_modules_by_default() {
        let result = analyze(&sample(), None);
        assert_eq!(result.summary.total_nodes, 7);
        assert_eq!(result.modules.len(), 4);
        assert!(result.modules.values().all(|m| m.enabled));

        // "Page 1", "Home Screen", "Group 1"
        assert_eq!(result.rename_candidates.len(), 3);
        assert_eq!(result.layout_candidates.len(), 1);
        assert_eq!(result.safe_area_candidates.len(), 1);
        assert!(result.component_candidates.is_empty());

        assert_eq!(result.summary.rename_candidates_count, 3);
        assert_eq!(result.summary.modules_summary["layout"].candidates_count, 1);
        assert_eq!(result.summary.estimated_automation_savings, "< 1 saat");
    }

    #[test]
    fn test_disabled_module_excluded() {
        let mut overrides = HashMap::new();
        overrides.insert("naming".to_string(), false);
        overrides.insert("bogus".to_string(), false);
        let result = analyze(&sample(), Some(&overrides));

        assert!(result.rename_candidates.is_empty());
        let summary = &result.summary.modules_summary["rename"];
        assert!(!summary.enabled);
        assert_eq!(summary.candidates_count, 0);
        assert!(!result.modules["rename"].enabled);
        assert_eq!(result.layout_candidates.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let doc = sample();
        let runner = Runner::new();
        assert_eq!(runner.run(&doc), runner.run(&doc));
    }

    #[test]
    fn test_selection_overrides() {
        let mut selection = ModuleSelection::new();
        selection.apply([("safe-area", false), ("layout", false), ("layout", true)]);
        assert!(!selection.is_enabled(Module::SafeArea));
        assert!(selection.is_enabled(Module::Layout));
        assert!(selection.is_enabled(Module::Rename));
    }
}
