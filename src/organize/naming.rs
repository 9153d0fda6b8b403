//! Naming convention checks.
//!
//! Every distinct layer name is checked once, no matter how many nodes carry
//! it. Names are flagged for whitespace, characters outside `[A-Za-z0-9_-/]`,
//! excessive length, and generic placeholders left behind by the editor
//! ("Group 3", "Rectangle", "Copy of").

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::tree::{walk, Document};

use super::{Analyzer, Candidates, Module, ModuleResult, Priority, RenameCandidate, RenameIssue};

/// Names longer than this are flagged as `too_long`. Length is measured in
/// UTF-16 code units, the unit the design editor reports.
pub const MAX_NAME_LENGTH: usize = 50;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref SPECIAL_CHAR: Regex = Regex::new(r"[^A-Za-z0-9_\-/]").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\-]").unwrap();
    static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();

    static ref KEBAB_CASE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    static ref CAMEL_CASE: Regex = Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap();
    static ref PASCAL_CASE: Regex = Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap();

    /// Default names the editor assigns, plus scratch names nobody cleaned up.
    static ref UNCLEAR_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)^(Group|Frame|Shape|Element|Node|Item|Container)\s*[0-9]*$").unwrap(),
        Regex::new(r"(?i)^(Copy|Copy of|Duplicate|v1|v2|temp|temp1|test|test1)$").unwrap(),
        Regex::new(r"^(Layer|Layer [0-9]+|Rectangle|Ellipse)$").unwrap(),
        // SCREAMING_CASE tokens
        Regex::new(r"^[A-Z]+(_[A-Z]+)*$").unwrap(),
    ];
}

/// Suggests renames for badly named layers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NamingAnalyzer;

impl Analyzer for NamingAnalyzer {
    fn module(&self) -> Module {
        Module::Rename
    }

    fn analyze(&self, document: &Document) -> ModuleResult {
        let candidates = find_rename_candidates(document);
        let summary = summarize(&candidates);
        ModuleResult::new(Module::Rename, Candidates::Rename(candidates)).with_summary(summary)
    }
}

/// Names in first-seen order, each with the ids that carry it.
#[derive(Debug, Default)]
struct NameOccurrences {
    order: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl NameOccurrences {
    fn record(&mut self, name: String, id: String) {
        match self.index.get(&name) {
            Some(&i) => self.order[i].1.push(id),
            None => {
                self.index.insert(name.clone(), self.order.len());
                self.order.push((name, vec![id]));
            }
        }
    }
}

fn collect_names(document: &Document) -> NameOccurrences {
    let mut occurrences = NameOccurrences::default();
    walk(document, |visit| {
        if let (Some(id), Some(name)) = (&visit.node.id, &visit.node.name) {
            occurrences.record(name.trim().to_string(), id.clone());
        }
    });
    occurrences
}

/// Find every name with at least one issue, highest priority first.
pub fn find_rename_candidates(document: &Document) -> Vec<RenameCandidate> {
    let occurrences = collect_names(document);

    let mut candidates: Vec<RenameCandidate> = occurrences
        .order
        .into_iter()
        .filter_map(|(name, ids)| {
            let issues = name_issues(&name);
            if issues.is_empty() {
                return None;
            }
            Some(RenameCandidate {
                id: ids[0].clone(),
                suggested_name: suggest_name(&name),
                priority: priority_for(&issues),
                current_name: name,
                paths: ids,
                issues,
            })
        })
        .collect();

    // Stable: ties keep first-seen order
    candidates.sort_by_key(|c| c.priority.rank());
    candidates
}

/// Classify the naming defects of a single (already trimmed) name.
pub fn name_issues(name: &str) -> Vec<RenameIssue> {
    let mut issues = Vec::new();

    if WHITESPACE.is_match(name) {
        issues.push(RenameIssue::ContainsSpaces);
    }

    if SPECIAL_CHAR.is_match(name) {
        issues.push(RenameIssue::ContainsSpecialChars);
    }

    // Hierarchical names ("Icon/Home") are exempt from casing rules.
    if !name.contains('/') {
        let conventional =
            KEBAB_CASE.is_match(name) || CAMEL_CASE.is_match(name) || PASCAL_CASE.is_match(name);
        // Only reported next to a whitespace or character problem, never alone.
        if !conventional && !issues.is_empty() {
            issues.push(RenameIssue::NotKebabCase);
        }
    }

    if name.encode_utf16().count() > MAX_NAME_LENGTH {
        issues.push(RenameIssue::TooLong);
    }

    if is_unclear_name(name) {
        issues.push(RenameIssue::UnclearName);
    }

    let mut unique = Vec::with_capacity(issues.len());
    for issue in issues {
        if !unique.contains(&issue) {
            unique.push(issue);
        }
    }
    unique
}

/// Returns true for editor defaults and scratch names.
pub fn is_unclear_name(name: &str) -> bool {
    UNCLEAR_PATTERNS.iter().any(|p| p.is_match(name))
}

/// Propose a cleaned-up name. Slash-separated hierarchy is preserved.
pub fn suggest_name(name: &str) -> String {
    if name.contains('/') {
        return name.split('/').map(clean_segment).collect::<Vec<_>>().join("/");
    }

    let dashed = WHITESPACE_RUN.replace_all(name, "-");
    let dashed = NON_WORD.replace_all(&dashed, "-");
    let collapsed = DASH_RUN.replace_all(&dashed, "-").to_lowercase();
    collapsed.trim_matches('-').to_string()
}

fn clean_segment(segment: &str) -> String {
    let dashed = WHITESPACE_RUN.replace_all(segment.trim(), "-");
    let stripped = NON_WORD.replace_all(&dashed, "").to_lowercase();
    stripped.trim_matches('-').to_string()
}

fn priority_for(issues: &[RenameIssue]) -> Priority {
    if issues.contains(&RenameIssue::UnclearName) || issues.contains(&RenameIssue::ContainsSpaces) {
        Priority::High
    } else if issues.contains(&RenameIssue::ContainsSpecialChars) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn summarize(candidates: &[RenameCandidate]) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    summary.insert("total".to_string(), candidates.len());
    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        let count = candidates.iter().filter(|c| c.priority == priority).count();
        summary.insert(priority.as_str().to_string(), count);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_names(names: &[&str]) -> Document {
        let children: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({"id": format!("1:{}", i), "name": name, "type": "FRAME"}))
            .collect();
        Document::from(json!({"document": {"id": "0:0", "type": "DOCUMENT", "children": children}}))
    }

    #[test]
    fn test_name_with_space() {
        let candidates = find_rename_candidates(&doc_with_names(&["My Button"]));
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert!(c.issues.contains(&RenameIssue::ContainsSpaces));
        assert!(!c.issues.contains(&RenameIssue::UnclearName));
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.suggested_name, "my-button");
    }

    #[test]
    fn test_editor_default_name() {
        let candidates = find_rename_candidates(&doc_with_names(&["Group 3"]));
        let c = &candidates[0];
        assert!(c.issues.contains(&RenameIssue::UnclearName));
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.suggested_name, "group-3");
    }

    #[test]
    fn test_hierarchical_name_cleaned_per_segment() {
        assert_eq!(suggest_name("Icon/Home Page!"), "icon/home-page");
        let issues = name_issues("Icon/Home Page!");
        assert!(!issues.contains(&RenameIssue::NotKebabCase));
        assert!(issues.contains(&RenameIssue::ContainsSpaces));
    }

    #[test]
    fn test_clean_names_are_not_candidates() {
        let candidates =
            find_rename_candidates(&doc_with_names(&["primary-button", "cardHeader", "NavBar", "icon/home"]));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_not_kebab_case_is_secondary() {
        // snake_case is not a recognised convention, but it is never flagged alone
        assert!(name_issues("nav_bar").is_empty());

        let issues = name_issues("nav_bar!");
        assert_eq!(
            issues,
            vec![RenameIssue::ContainsSpecialChars, RenameIssue::NotKebabCase]
        );
    }

    #[test]
    fn test_special_chars_medium_priority() {
        let candidates = find_rename_candidates(&doc_with_names(&["button(primary)"]));
        assert_eq!(candidates[0].priority, Priority::Medium);
        assert_eq!(candidates[0].suggested_name, "button-primary");
    }

    #[test]
    fn test_too_long_low_priority() {
        let long = "a".repeat(51);
        let candidates = find_rename_candidates(&doc_with_names(&[&long]));
        assert_eq!(candidates[0].issues, vec![RenameIssue::TooLong]);
        assert_eq!(candidates[0].priority, Priority::Low);
        assert!(name_issues(&"a".repeat(50)).is_empty());
    }

    #[test]
    fn test_too_long_counts_utf16_units() {
        // Each emoji is a surrogate pair
        let emoji = "\u{1F600}".repeat(30);
        assert!(name_issues(&emoji).contains(&RenameIssue::TooLong));

        let accented = "\u{e9}".repeat(50);
        assert!(!name_issues(&accented).contains(&RenameIssue::TooLong));
    }

    #[test]
    fn test_unclear_patterns() {
        assert!(is_unclear_name("Frame"));
        assert!(is_unclear_name("container12"));
        assert!(is_unclear_name("copy of"));
        assert!(is_unclear_name("TEMP"));
        assert!(is_unclear_name("Layer 4"));
        assert!(is_unclear_name("Rectangle"));
        assert!(is_unclear_name("PRIMARY_COLOR"));
        assert!(!is_unclear_name("rectangle"));
        assert!(!is_unclear_name("Group of cards"));
    }

    #[test]
    fn test_duplicates_grouped_by_trimmed_name() {
        let candidates = find_rename_candidates(&doc_with_names(&["Card Item", " Card Item ", "Card Item"]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "1:0");
        assert_eq!(candidates[0].paths, vec!["1:0", "1:1", "1:2"]);
    }

    #[test]
    fn test_sorted_by_priority_then_first_seen() {
        let long = "b".repeat(60);
        let candidates = find_rename_candidates(&doc_with_names(&[
            &long,
            "price$",
            "Hero Banner",
            "Rectangle",
        ]));
        let names: Vec<_> = candidates.iter().map(|c| c.current_name.as_str()).collect();
        assert_eq!(names, vec!["Hero Banner", "Rectangle", "price$", long.as_str()]);
    }

    #[test]
    fn test_nodes_without_id_are_skipped() {
        let doc = Document::from(json!([{"name": "Bad Name"}, {"id": "1", "name": "Bad Name"}]));
        let candidates = find_rename_candidates(&doc);
        assert_eq!(candidates[0].paths, vec!["1"]);
    }

    #[test]
    fn test_module_summary_counts() {
        let result = NamingAnalyzer.analyze(&doc_with_names(&["Group 1", "price$"]));
        let summary = result.summary.unwrap();
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["high"], 1);
        assert_eq!(summary["medium"], 1);
        assert_eq!(summary["low"], 0);
    }
}
