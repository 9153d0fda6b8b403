//! Output formatting for analysis results.
//!
//! Supports five outputs:
//! - Pretty: colored terminal output for human readability
//! - Text: plain text report suitable for files and logs
//! - JSON: the full `AnalysisResult`
//! - HTML: standalone page for sharing with designers
//! - Actionable: JSON containing only the high priority/confidence changes

use colored::*;
use serde::Serialize;

use crate::organize::{
    AnalysisResult, AnalysisSummary, Confidence, LayoutCandidate, Priority, RenameCandidate,
    SafeAreaCandidate,
};

const TOOL_NAME: &str = "figma-organizer";

/// Medium-priority renames shown in the text report.
const TEXT_MEDIUM_LIMIT: usize = 5;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Render a report in one of the string formats ("text", "json", "html").
pub fn render(format: &str, result: &AnalysisResult) -> anyhow::Result<String> {
    match format {
        "text" => Ok(render_text(result)),
        "json" => render_json(result),
        "html" => Ok(render_html(result)),
        other => anyhow::bail!("format {:?} cannot be rendered to a string", other),
    }
}

/// File extension used when writing a report of `format` to disk.
pub fn extension_for(format: &str) -> &'static str {
    match format {
        "json" => "json",
        "html" => "html",
        _ => "txt",
    }
}

// =============================================================================
// JSON Format
// =============================================================================

pub fn render_json(result: &AnalysisResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Changes worth applying without review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableChanges<'a> {
    pub version: &'static str,
    pub renames: Vec<&'a RenameCandidate>,
    pub layouts: Vec<&'a LayoutCandidate>,
    pub safe_areas: Vec<&'a SafeAreaCandidate>,
    pub total: usize,
}

impl ActionableChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Keep only high-priority renames and safe areas and high-confidence layouts.
pub fn actionable_changes(result: &AnalysisResult) -> ActionableChanges<'_> {
    let renames: Vec<_> = result
        .rename_candidates
        .iter()
        .filter(|c| c.priority == Priority::High)
        .collect();
    let layouts: Vec<_> = result
        .layout_candidates
        .iter()
        .filter(|c| c.confidence == Confidence::High)
        .collect();
    let safe_areas: Vec<_> = result
        .safe_area_candidates
        .iter()
        .filter(|c| c.priority == Priority::High)
        .collect();

    ActionableChanges {
        version: env!("CARGO_PKG_VERSION"),
        total: renames.len() + layouts.len() + safe_areas.len(),
        renames,
        layouts,
        safe_areas,
    }
}

pub fn render_actionable(result: &AnalysisResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&actionable_changes(result))?)
}

// =============================================================================
// Text Format
// =============================================================================

pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str("         FIGMA ORGANIZER - ANALYSIS REPORT\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    text_summary(&mut out, &result.summary);
    text_renames(&mut out, &result.rename_candidates);
    text_layouts(&mut out, &result.layout_candidates);
    text_safe_areas(&mut out, &result.safe_area_candidates);

    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out
}

fn text_summary(out: &mut String, summary: &AnalysisSummary) {
    out.push_str("SUMMARY\n");
    out.push_str(THIN_RULE);
    out.push('\n');
    let rows = [
        ("Total nodes:", summary.total_nodes.to_string()),
        ("Frames:", summary.frame_count.to_string()),
        ("Groups:", summary.group_count.to_string()),
        ("Components:", summary.component_count.to_string()),
        ("Text layers:", summary.text_count.to_string()),
        ("Rename suggestions:", summary.rename_candidates_count.to_string()),
        ("Auto-layout suggestions:", summary.layout_candidates_count.to_string()),
        ("Safe-area suggestions:", summary.safe_area_candidates_count.to_string()),
        ("Estimated savings:", summary.estimated_automation_savings.clone()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{:<29}{}\n", label, value));
    }
    out.push('\n');
}

fn text_renames(out: &mut String, candidates: &[RenameCandidate]) {
    if candidates.is_empty() {
        out.push_str("No renames needed\n\n");
        return;
    }

    out.push_str("RENAME SUGGESTIONS\n");
    out.push_str(THIN_RULE);
    out.push_str("\n\n");

    let high: Vec<_> = candidates.iter().filter(|c| c.priority == Priority::High).collect();
    let medium: Vec<_> = candidates.iter().filter(|c| c.priority == Priority::Medium).collect();

    if !high.is_empty() {
        out.push_str("Do now (high priority)\n");
        for c in high {
            out.push_str(&format!("\n  \"{}\" -> \"{}\"\n", c.current_name, c.suggested_name));
            out.push_str(&format!("     Issues: {}\n", join_issues(c)));
            out.push_str(&format!("     Occurrences: {}\n", c.paths.len()));
        }
    }

    if !medium.is_empty() {
        out.push_str("\n\nRecommended (medium priority)\n");
        for c in medium.iter().take(TEXT_MEDIUM_LIMIT) {
            out.push_str(&format!("\n  \"{}\" -> \"{}\"\n", c.current_name, c.suggested_name));
            out.push_str(&format!("     Issues: {}\n", join_issues(c)));
        }
        if medium.len() > TEXT_MEDIUM_LIMIT {
            out.push_str(&format!("\n  ... and {} more\n", medium.len() - TEXT_MEDIUM_LIMIT));
        }
    }

    out.push('\n');
}

fn text_layouts(out: &mut String, candidates: &[LayoutCandidate]) {
    if candidates.is_empty() {
        return;
    }

    out.push_str("\nAUTO-LAYOUT SUGGESTIONS\n");
    out.push_str(THIN_RULE);
    out.push('\n');
    for c in candidates {
        out.push_str(&format!(
            "\n  {} [{}] {} spacing {} ({} confidence)\n",
            c.name,
            c.node_type,
            c.suggested_config.mode.as_str(),
            c.suggested_config.spacing,
            c.confidence
        ));
        out.push_str(&format!("     {}\n", c.reason));
    }
    out.push('\n');
}

fn text_safe_areas(out: &mut String, candidates: &[SafeAreaCandidate]) {
    if candidates.is_empty() {
        return;
    }

    out.push_str("\nSAFE-AREA SUGGESTIONS\n");
    out.push_str(THIN_RULE);
    out.push('\n');
    for c in candidates {
        out.push_str(&format!("\n  {} ({})\n", c.name, c.reason));
    }
    out.push('\n');
}

fn join_issues(c: &RenameCandidate) -> String {
    c.issues
        .iter()
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// HTML Format
// =============================================================================

const HTML_STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; color: #333; padding: 20px; }
.container { max-width: 1200px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }
h1 { color: #2563eb; margin-bottom: 10px; font-size: 28px; }
h2 { color: #2563eb; font-size: 20px; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 3px solid #e5e7eb; }
.subtitle { color: #666; margin-bottom: 30px; font-size: 14px; }
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 40px; }
.stat-card { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 8px; text-align: center; }
.stat-card.rename { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
.stat-value { font-size: 32px; font-weight: bold; margin-bottom: 5px; }
.stat-label { font-size: 14px; opacity: 0.9; }
.section { margin-bottom: 40px; }
.empty-state { background: #f3f4f6; padding: 30px; border-radius: 8px; text-align: center; color: #666; }
.empty-state h3 { color: #10b981; margin-bottom: 10px; }
.card { background: #f9fafb; border: 1px solid #e5e7eb; border-radius: 6px; padding: 20px; margin-bottom: 15px; }
.card-title { font-size: 16px; font-weight: 600; color: #111; margin-bottom: 10px; }
.card-meta { display: flex; gap: 10px; margin-bottom: 10px; flex-wrap: wrap; }
.badge { display: inline-block; font-size: 12px; padding: 4px 8px; border-radius: 4px; background: #e5e7eb; color: #374151; font-weight: 500; }
.badge.high { background: #fee2e2; color: #991b1b; }
.badge.medium { background: #fef3c7; color: #92400e; }
.badge.low { background: #dbeafe; color: #1e40af; }
.issues-list { display: flex; gap: 8px; flex-wrap: wrap; margin-top: 10px; }
.issue-tag { font-size: 12px; background: #fecaca; color: #7f1d1d; padding: 4px 8px; border-radius: 4px; }
footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e7eb; color: #999; font-size: 12px; }
"#;

pub fn render_html(result: &AnalysisResult) -> String {
    let summary = &result.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Figma Organizer - Analysis Report</title>\n");
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    html.push_str("<h1>Figma Organizer - Analysis Report</h1>\n");
    html.push_str("<p class=\"subtitle\">Suggestions for tidying up your design system</p>\n");

    html.push_str("<div class=\"summary\">\n");
    stat_card(&mut html, "", &summary.total_nodes.to_string(), "Total nodes");
    stat_card(
        &mut html,
        " rename",
        &summary.rename_candidates_count.to_string(),
        "Renames",
    );
    stat_card(
        &mut html,
        "",
        &summary.layout_candidates_count.to_string(),
        "Auto-layout",
    );
    stat_card(
        &mut html,
        "",
        &summary.safe_area_candidates_count.to_string(),
        "Safe areas",
    );
    stat_card(
        &mut html,
        "",
        &summary.estimated_automation_savings,
        "Estimated savings",
    );
    html.push_str("</div>\n");

    html_renames(&mut html, &result.rename_candidates);
    html_layouts(&mut html, &result.layout_candidates);
    html_safe_areas(&mut html, &result.safe_area_candidates);

    html.push_str(&format!(
        "<footer><p>Generated by {} v{}</p></footer>\n",
        TOOL_NAME,
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn stat_card(html: &mut String, class: &str, value: &str, label: &str) {
    html.push_str(&format!(
        "<div class=\"stat-card{}\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>\n",
        class,
        escape_html(value),
        label
    ));
}

fn empty_section(html: &mut String, title: &str, message: &str) {
    html.push_str(&format!(
        "<div class=\"section\"><h2>{}</h2><div class=\"empty-state\"><h3>All good</h3><p>{}</p></div></div>\n",
        title, message
    ));
}

fn html_renames(html: &mut String, candidates: &[RenameCandidate]) {
    if candidates.is_empty() {
        empty_section(html, "Renames", "Layer names already follow the conventions.");
        return;
    }

    html.push_str(&format!(
        "<div class=\"section\"><h2>Renames ({})</h2>\n",
        candidates.len()
    ));
    for c in candidates {
        let tags: String = c
            .issues
            .iter()
            .map(|i| format!("<span class=\"issue-tag\">{}</span>", i.as_str()))
            .collect();
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-title\">\"{}\" &rarr; \"{}\"</div>\
             <div class=\"card-meta\"><span class=\"badge {}\">{}</span><span>{} occurrences</span></div>\
             <div class=\"issues-list\">{}</div></div>\n",
            escape_html(&c.current_name),
            escape_html(&c.suggested_name),
            c.priority.as_str(),
            c.priority.as_str().to_uppercase(),
            c.paths.len(),
            tags
        ));
    }
    html.push_str("</div>\n");
}

fn html_layouts(html: &mut String, candidates: &[LayoutCandidate]) {
    if candidates.is_empty() {
        empty_section(html, "Auto-layout", "No containers need auto-layout.");
        return;
    }

    html.push_str(&format!(
        "<div class=\"section\"><h2>Auto-layout ({})</h2>\n",
        candidates.len()
    ));
    for c in candidates {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-title\">{}</div>\
             <div class=\"card-meta\"><span class=\"badge {}\">{}</span><span>{}</span><span>{} / {}px</span></div>\
             <p>{}</p></div>\n",
            escape_html(&c.name),
            c.confidence.as_str(),
            c.confidence.as_str().to_uppercase(),
            escape_html(&c.path),
            c.suggested_config.mode.as_str(),
            c.suggested_config.spacing,
            escape_html(&c.reason)
        ));
    }
    html.push_str("</div>\n");
}

fn html_safe_areas(html: &mut String, candidates: &[SafeAreaCandidate]) {
    if candidates.is_empty() {
        empty_section(html, "Safe areas", "No screen-sized frames found.");
        return;
    }

    html.push_str(&format!(
        "<div class=\"section\"><h2>Safe areas ({})</h2>\n",
        candidates.len()
    ));
    for c in candidates {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-title\">{}</div>\
             <div class=\"card-meta\"><span class=\"badge {}\">{}</span><span>{}</span></div>\
             <p>{}</p><p>{}</p></div>\n",
            escape_html(&c.name),
            c.priority.as_str(),
            c.priority.as_str().to_uppercase(),
            escape_html(&c.path),
            escape_html(&c.reason),
            escape_html(&c.recommendation)
        ));
    }
    html.push_str("</div>\n");
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, result: &AnalysisResult) {
    println!();
    print!("  ");
    print!("{}", TOOL_NAME.cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    println!();

    write_summary(&result.summary);
    println!();

    if !result.rename_candidates.is_empty() {
        write_renames(&result.rename_candidates);
        println!();
    }

    if !result.layout_candidates.is_empty() {
        write_layouts(&result.layout_candidates);
        println!();
    }

    if !result.safe_area_candidates.is_empty() {
        write_safe_areas(&result.safe_area_candidates);
        println!();
    }

    write_modules(result);
    println!();
}

fn write_summary(summary: &AnalysisSummary) {
    println!(
        "  {} nodes  {} frames  {} groups  {} components  {} text",
        summary.total_nodes.to_string().bold(),
        summary.frame_count,
        summary.group_count,
        summary.component_count,
        summary.text_count
    );
    print!("  Estimated savings: ");
    println!("{}", summary.estimated_automation_savings.green());
}

fn write_priority_tag(priority: Priority) {
    match priority {
        Priority::High => print!("    {} ", "HIGH".red()),
        Priority::Medium => print!("    {} ", "MED ".yellow()),
        Priority::Low => print!("    {} ", "LOW ".blue()),
    }
}

fn write_renames(candidates: &[RenameCandidate]) {
    println!("  {} ({}):", "Renames".bold(), candidates.len());
    println!();

    for c in candidates {
        write_priority_tag(c.priority);
        print!("{}", format!("{:?}", c.current_name).dimmed());
        print!(" -> ");
        print!("{}", c.suggested_name.blue());
        if c.paths.len() > 1 {
            print!("{}", format!("  (x{})", c.paths.len()).dimmed());
        }
        println!();
        println!("            {}", join_issues(c));
    }
}

fn write_layouts(candidates: &[LayoutCandidate]) {
    println!("  {} ({}):", "Auto-layout".bold(), candidates.len());
    println!();

    for c in candidates {
        match c.confidence {
            Confidence::High => print!("    {} ", "HIGH".green()),
            _ => print!("    {} ", "MED ".yellow()),
        }
        print!("{}", c.name.blue());
        println!(
            "{}",
            format!(
                "  {} {}px",
                c.suggested_config.mode.as_str(),
                c.suggested_config.spacing
            )
            .dimmed()
        );
        println!("            {}", c.reason);
    }
}

fn write_safe_areas(candidates: &[SafeAreaCandidate]) {
    println!("  {} ({}):", "Safe areas".bold(), candidates.len());
    println!();

    for c in candidates {
        write_priority_tag(c.priority);
        println!("{}", c.name.blue());
        println!("            {}", c.reason);
    }
}

fn write_modules(result: &AnalysisResult) {
    println!("  {}", "Modules:".bold());
    for (name, module) in &result.summary.modules_summary {
        if module.enabled {
            println!("    {:<12} {:>3} candidates", name, module.candidates_count);
        } else {
            println!("    {:<12} {}", name, "disabled".dimmed());
        }
    }
}
