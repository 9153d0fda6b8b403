//! Safe-area detection for device-sized frames.

use crate::tree::{walk, Document, Visit};

use super::{Analyzer, Candidates, Module, ModuleResult, Priority, SafeAreaCandidate};

/// A side shorter than this is phone-narrow.
pub const NARROW_MAX: f64 = 600.0;

/// A side longer than this is screen-long.
pub const LONG_MIN: f64 = 500.0;

pub const SAFE_AREA_ISSUE: &str = "possible_safe_area_needed";

const DEFAULT_SCREEN_NAME: &str = "Screen";

const RECOMMENDATION: &str =
    "Add safe-area padding or constraints so content clears notches, status bars and home indicators";

/// Flags frames shaped like phone or tablet screens.
#[derive(Debug, Default, Clone, Copy)]
pub struct SafeAreaAnalyzer;

impl Analyzer for SafeAreaAnalyzer {
    fn module(&self) -> Module {
        Module::SafeArea
    }

    fn analyze(&self, document: &Document) -> ModuleResult {
        ModuleResult::new(
            Module::SafeArea,
            Candidates::SafeArea(find_safe_area_candidates(document)),
        )
    }
}

/// Find screen-shaped frames, in traversal order.
pub fn find_safe_area_candidates(document: &Document) -> Vec<SafeAreaCandidate> {
    let mut candidates = Vec::new();
    walk(document, |visit| {
        if let Some(candidate) = check_frame(visit) {
            candidates.push(candidate);
        }
    });
    candidates
}

/// Returns true when one side is narrow while the other is long.
pub fn needs_safe_area(width: f64, height: f64) -> bool {
    (width < NARROW_MAX && height > LONG_MIN) || (height < NARROW_MAX && width > LONG_MIN)
}

fn check_frame(visit: &Visit<'_>) -> Option<SafeAreaCandidate> {
    let node = visit.node;
    if !node.is_type("FRAME") {
        return None;
    }
    let id = node.id.as_ref()?;

    let (width, height) = node
        .bounding_box
        .map(|b| (b.width, b.height))
        .unwrap_or((0.0, 0.0));
    if !needs_safe_area(width, height) {
        return None;
    }

    let orientation = if height > width { "portrait" } else { "landscape" };

    Some(SafeAreaCandidate {
        id: id.clone(),
        name: node
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_SCREEN_NAME.to_string()),
        path: visit.path.clone(),
        node_type: "FRAME".to_string(),
        reason: format!(
            "{}x{} {} frame matches a device screen",
            width, height, orientation
        ),
        priority: Priority::Medium,
        recommendation: RECOMMENDATION.to_string(),
        issues: vec![SAFE_AREA_ISSUE.to_string()],
    })
}
