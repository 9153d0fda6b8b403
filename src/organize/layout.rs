//! Auto-layout candidate detection.
//!
//! A frame or group whose positioned children line up along one axis with
//! regular gaps is a good fit for auto-layout. Children are compared by their
//! absolute origin only; sizes are ignored.

use std::collections::BTreeMap;

use crate::tree::{walk, BoundingBox, Document, Node, Visit};

use super::{
    Analyzer, Arrangement, AutoLayoutConfig, Candidates, Confidence, LayoutCandidate, LayoutMode,
    Module, ModuleResult, SpacingPattern,
};

/// Children whose origins differ by less than this on an axis are aligned.
pub const ALIGNMENT_TOLERANCE: f64 = 5.0;

/// Spacing is consistent when its deviation stays under this share of the mean.
pub const SPACING_CONSISTENCY_RATIO: f64 = 0.2;

/// Minimum aligned children for a high-confidence suggestion.
pub const HIGH_CONFIDENCE_CHILDREN: usize = 3;

const CONTAINER_TYPES: &[&str] = &["FRAME", "GROUP"];

/// Suggests auto-layout for evenly arranged containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutAnalyzer;

impl Analyzer for LayoutAnalyzer {
    fn module(&self) -> Module {
        Module::Layout
    }

    fn analyze(&self, document: &Document) -> ModuleResult {
        let candidates = find_layout_candidates(document);

        let mut summary = BTreeMap::new();
        summary.insert("total".to_string(), candidates.len());
        for arrangement in [Arrangement::Horizontal, Arrangement::Vertical, Arrangement::Mixed] {
            let count = candidates
                .iter()
                .filter(|c| c.arrangement == arrangement)
                .count();
            summary.insert(arrangement.as_str().to_string(), count);
        }

        ModuleResult::new(Module::Layout, Candidates::Layout(candidates)).with_summary(summary)
    }
}

/// Find containers with at least two positioned children, in traversal order.
pub fn find_layout_candidates(document: &Document) -> Vec<LayoutCandidate> {
    let mut candidates = Vec::new();
    walk(document, |visit| {
        if let Some(candidate) = check_container(visit) {
            candidates.push(candidate);
        }
    });
    candidates
}

fn check_container(visit: &Visit<'_>) -> Option<LayoutCandidate> {
    let node = visit.node;
    let id = node.id.as_ref()?;
    if !CONTAINER_TYPES.iter().any(|t| node.is_type(t)) {
        return None;
    }

    let boxes = positioned_children(node);
    if boxes.len() < 2 {
        return None;
    }

    let arrangement = detect_arrangement(&boxes);
    let spacing = spacing_pattern(&boxes, arrangement);
    let confidence = if spacing.has_consistent_spacing && boxes.len() >= HIGH_CONFIDENCE_CHILDREN {
        Confidence::High
    } else {
        Confidence::Medium
    };

    // Mixed arrangements fall back to a horizontal stack.
    let mode = match arrangement {
        Arrangement::Vertical => LayoutMode::Vertical,
        Arrangement::Horizontal | Arrangement::Mixed => LayoutMode::Horizontal,
    };

    Some(LayoutCandidate {
        id: id.clone(),
        name: node.name.clone().unwrap_or_else(|| id.clone()),
        path: visit.path.clone(),
        node_type: node.type_str().to_string(),
        reason: describe(boxes.len(), arrangement, &spacing),
        children_count: boxes.len(),
        arrangement,
        spacing_pattern: spacing,
        confidence,
        suggested_config: AutoLayoutConfig {
            mode,
            spacing: spacing.estimated_spacing,
            alignment: "center".to_string(),
        },
    })
}

fn positioned_children(node: &Node) -> Vec<BoundingBox> {
    node.children
        .iter()
        .filter_map(|child| child.bounding_box)
        .collect()
}

/// Decide which axis the children share.
pub fn detect_arrangement(boxes: &[BoundingBox]) -> Arrangement {
    let y_variance = spread(boxes.iter().map(|b| b.y));
    let x_variance = spread(boxes.iter().map(|b| b.x));

    if y_variance < ALIGNMENT_TOLERANCE {
        Arrangement::Horizontal
    } else if x_variance < ALIGNMENT_TOLERANCE {
        Arrangement::Vertical
    } else {
        Arrangement::Mixed
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() {
        max - min
    } else {
        0.0
    }
}

/// Measure the gaps between consecutive children along the layout axis.
pub fn spacing_pattern(boxes: &[BoundingBox], arrangement: Arrangement) -> SpacingPattern {
    let mut positions: Vec<f64> = boxes
        .iter()
        .map(|b| match arrangement {
            Arrangement::Vertical => b.y,
            Arrangement::Horizontal | Arrangement::Mixed => b.x,
        })
        .collect();
    positions.sort_by(|a, b| a.total_cmp(b));

    let gaps: Vec<f64> = positions.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return SpacingPattern {
            has_consistent_spacing: false,
            estimated_spacing: 0,
            spacing_variance: 0,
        };
    }

    let count = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / count;
    let deviation = (gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / count).sqrt();

    let estimated_spacing = round_half_up(mean);
    let spacing_variance = round_half_up(deviation);

    SpacingPattern {
        has_consistent_spacing: (spacing_variance as f64)
            < estimated_spacing as f64 * SPACING_CONSISTENCY_RATIO,
        estimated_spacing,
        spacing_variance,
    }
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn describe(children: usize, arrangement: Arrangement, spacing: &SpacingPattern) -> String {
    let axis = match arrangement {
        Arrangement::Horizontal => "in a row",
        Arrangement::Vertical => "in a column",
        Arrangement::Mixed => "without a shared axis",
    };
    if spacing.has_consistent_spacing {
        format!(
            "{} children arranged {} with consistent {}px spacing",
            children, axis, spacing.estimated_spacing
        )
    } else {
        format!(
            "{} children arranged {} with uneven spacing (~{}px, deviation {}px)",
            children, axis, spacing.estimated_spacing, spacing.spacing_variance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bbox(x: f64, y: f64) -> serde_json::Value {
        json!({"x": x, "y": y, "width": 80, "height": 40})
    }

    fn container(kind: &str, positions: &[(f64, f64)]) -> Document {
        let children: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, (x, y))| json!({"id": format!("c{}", i), "type": "RECTANGLE", "absoluteBoundingBox": bbox(*x, *y)}))
            .collect();
        Document::from(json!({"id": "1:1", "name": "Toolbar", "type": kind, "children": children}))
    }

    #[test]
    fn test_even_row_is_high_confidence() {
        let candidates = find_layout_candidates(&container("FRAME", &[(0.0, 10.0), (100.0, 10.0), (200.0, 10.0)]));
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.arrangement, Arrangement::Horizontal);
        assert_eq!(c.spacing_pattern.estimated_spacing, 100);
        assert_eq!(c.spacing_pattern.spacing_variance, 0);
        assert!(c.spacing_pattern.has_consistent_spacing);
        assert_eq!(c.confidence, Confidence::High);
        assert_eq!(c.suggested_config.mode, LayoutMode::Horizontal);
        assert_eq!(c.suggested_config.spacing, 100);
        assert_eq!(c.suggested_config.alignment, "center");
        assert_eq!(c.children_count, 3);
    }

    #[test]
    fn test_column_is_vertical() {
        let candidates = find_layout_candidates(&container("GROUP", &[(20.0, 300.0), (22.0, 0.0), (21.0, 150.0)]));
        let c = &candidates[0];
        assert_eq!(c.arrangement, Arrangement::Vertical);
        assert_eq!(c.spacing_pattern.estimated_spacing, 150);
        assert_eq!(c.suggested_config.mode, LayoutMode::Vertical);
        assert_eq!(c.node_type, "GROUP");
    }

    #[test]
    fn test_mixed_falls_back_to_horizontal() {
        let candidates = find_layout_candidates(&container("FRAME", &[(0.0, 0.0), (50.0, 80.0)]));
        let c = &candidates[0];
        assert_eq!(c.arrangement, Arrangement::Mixed);
        assert_eq!(c.suggested_config.mode, LayoutMode::Horizontal);
    }

    #[test]
    fn test_two_children_never_high() {
        let candidates = find_layout_candidates(&container("FRAME", &[(0.0, 0.0), (40.0, 0.0)]));
        let c = &candidates[0];
        assert!(c.spacing_pattern.has_consistent_spacing);
        assert_eq!(c.confidence, Confidence::Medium);
    }

    #[test]
    fn test_uneven_spacing() {
        let candidates =
            find_layout_candidates(&container("FRAME", &[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0)]));
        let c = &candidates[0];
        // gaps 10 and 90: mean 50, deviation 40
        assert_eq!(c.spacing_pattern.estimated_spacing, 50);
        assert_eq!(c.spacing_pattern.spacing_variance, 40);
        assert!(!c.spacing_pattern.has_consistent_spacing);
        assert_eq!(c.confidence, Confidence::Medium);
    }

    #[test]
    fn test_overlapping_children_are_inconsistent() {
        let candidates = find_layout_candidates(&container("FRAME", &[(0.0, 0.0), (0.0, 0.0)]));
        assert!(!candidates[0].spacing_pattern.has_consistent_spacing);
    }

    #[test]
    fn test_ignores_non_containers_and_unpositioned_children() {
        assert!(find_layout_candidates(&container("COMPONENT", &[(0.0, 0.0), (10.0, 0.0)])).is_empty());
        assert!(find_layout_candidates(&container("FRAME", &[(0.0, 0.0)])).is_empty());

        let doc = Document::from(json!({
            "id": "1", "type": "FRAME",
            "children": [{"id": "a", "absoluteBoundingBox": bbox(0.0, 0.0)}, {"id": "b"}]
        }));
        assert!(find_layout_candidates(&doc).is_empty());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
    }

    #[test]
    fn test_nested_containers_report_paths() {
        let doc = Document::from(json!({"document": {
            "id": "0", "name": "Page", "type": "CANVAS",
            "children": [{
                "id": "1", "name": "Card", "type": "FRAME",
                "absoluteBoundingBox": bbox(0.0, 0.0),
                "children": [
                    {"id": "2", "absoluteBoundingBox": bbox(0.0, 0.0)},
                    {"id": "3", "absoluteBoundingBox": bbox(0.0, 60.0)}
                ]
            }]
        }}));
        let candidates = find_layout_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, "/Card");
        assert_eq!(candidates[0].name, "Card");
    }
}
