//! Command-line interface for figma-organizer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{self, Config, REPORT_FORMATS};
use crate::organize::{AnalysisResult, Module, Runner};
use crate::report;
use crate::server;
use crate::tree::Document;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Tidy up exported design files.
///
/// Reads a JSON export of a design document and suggests layer renames,
/// auto-layout for evenly spaced containers, and safe-area insets for
/// screen-sized frames.
#[derive(Parser)]
#[command(name = "figma-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a design export (file or directory of .json files)
    Analyze(AnalyzeArgs),
    /// Serve the analyzer over HTTP (POST /analyze)
    Serve(ServeArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// JSON export or directory of exports
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, text, json, or html
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the report here instead of stdout (a directory when analyzing a directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write high priority/confidence changes as JSON to this path
    #[arg(long)]
    pub actionable: Option<PathBuf>,

    /// Enable a module (rename, component, layout, safearea)
    #[arg(long, value_name = "MODULE")]
    pub enable: Vec<Module>,

    /// Disable a module (rename, component, layout, safearea)
    #[arg(long, value_name = "MODULE")]
    pub disable: Vec<Module>,

    /// Exit non-zero when any actionable change is found
    #[arg(long)]
    pub fail_on_high: bool,
}

/// Arguments for the serve command.
#[derive(Parser)]
pub struct ServeArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind (default from config, else 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (default from config, else 3001)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "figma-organizer.yaml")]
    pub output: PathBuf,
}

/// Install the stderr log subscriber.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.parse().unwrap_or_default());
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// One analyzed export.
struct Analyzed {
    path: PathBuf,
    result: AnalysisResult,
}

/// Collect JSON exports under `root`.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden and dependency directories
            !(e.depth() > 0
                && e.file_type().is_dir()
                && (name.starts_with('.') || name == "node_modules"))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if config.is_path_excluded(path) {
            info!(path = %path.display(), "excluded by config");
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Analyze files in parallel. Unparsable files are reported and skipped.
fn analyze_files(files: &[PathBuf], runner: &Runner) -> Vec<Analyzed> {
    files
        .par_iter()
        .filter_map(|path| match Document::from_file(path) {
            Ok(document) => Some(Analyzed {
                path: path.clone(),
                result: runner.run(&document),
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file");
                eprintln!("Warning: skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

fn report_name(source: &Path, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    format!("{}.{}", stem, suffix)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let config = match config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let format = args
        .format
        .clone()
        .unwrap_or_else(|| config.report_format().to_string());
    if !REPORT_FORMATS.contains(&format.as_str()) {
        eprintln!(
            "Error: invalid format {:?}, must be one of: {}",
            format,
            REPORT_FORMATS.join(", ")
        );
        return Ok(EXIT_ERROR);
    }
    if format == "pretty" && args.output.is_some() {
        eprintln!("Error: --output needs a text, json, or html format");
        return Ok(EXIT_ERROR);
    }

    let mut selection = config.module_selection();
    for module in &args.enable {
        selection.set(*module, true);
    }
    for module in &args.disable {
        selection.set(*module, false);
    }
    let runner = Runner::new().modules(selection);

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let analyzed = if metadata.is_dir() {
        let files = collect_files(&args.path, &config)?;
        if files.is_empty() {
            eprintln!("Warning: no .json files to analyze");
            return Ok(EXIT_SUCCESS);
        }
        info!(files = files.len(), "analyzing directory");
        analyze_files(&files, &runner)
    } else {
        match Document::from_file(&args.path) {
            Ok(document) => vec![Analyzed {
                path: args.path.clone(),
                result: runner.run(&document),
            }],
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    };

    let batch = metadata.is_dir();
    emit_reports(&analyzed, &format, args.output.as_deref(), batch)?;

    if let Some(target) = &args.actionable {
        for item in &analyzed {
            let json = report::render_actionable(&item.result)?;
            let path = if batch {
                target.join(report_name(&item.path, "actionable.json"))
            } else {
                target.clone()
            };
            write_file(&path, &json)?;
        }
    }

    let actionable_total: usize = analyzed
        .iter()
        .map(|a| report::actionable_changes(&a.result).total)
        .sum();
    if args.fail_on_high && actionable_total > 0 {
        return Ok(EXIT_FAILED);
    }

    Ok(EXIT_SUCCESS)
}

fn emit_reports(
    analyzed: &[Analyzed],
    format: &str,
    output: Option<&Path>,
    batch: bool,
) -> anyhow::Result<()> {
    if format == "pretty" {
        for item in analyzed {
            report::write_pretty(&item.path.to_string_lossy(), &item.result);
        }
        return Ok(());
    }

    match (output, batch) {
        (Some(target), false) => {
            if let Some(item) = analyzed.first() {
                write_file(target, &report::render(format, &item.result)?)?;
            }
        }
        (Some(dir), true) => {
            let suffix = format!("report.{}", report::extension_for(format));
            for item in analyzed {
                let rendered = report::render(format, &item.result)?;
                write_file(&dir.join(report_name(&item.path, &suffix)), &rendered)?;
            }
        }
        (None, true) if format == "json" => {
            let entries: Vec<serde_json::Value> = analyzed
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "file": item.path.to_string_lossy(),
                        "results": &item.result,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        (None, true) if format == "html" => {
            anyhow::bail!("--output <dir> is required for html reports of a directory");
        }
        (None, _) => {
            for item in analyzed {
                if batch {
                    println!("# {}", item.path.display());
                }
                println!("{}", report::render(format, &item.result)?);
            }
        }
    }

    Ok(())
}

/// Run the serve command.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<i32> {
    let config = match config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let host = args.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(&host, port, config.module_selection()))?;
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Err(e) = write_file(&args.output, config::DEFAULT_CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to choose modules", args.output.display());
    println!("  2. Run: figma-organizer analyze export.json --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{"document": {"id": "0", "type": "DOCUMENT", "children": [
        {"id": "1", "name": "Group 5", "type": "GROUP"}
    ]}}"#;

    fn analyze_args(path: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            path,
            config: None,
            format: Some("json".to_string()),
            output: None,
            actionable: None,
            enable: vec![],
            disable: vec![],
            fail_on_high: false,
        }
    }

    #[test]
    fn test_collect_files_skips_hidden_and_excluded() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".cache")).unwrap();
        std::fs::create_dir_all(temp.path().join("archive")).unwrap();
        std::fs::write(temp.path().join("a.json"), EXPORT).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        std::fs::write(temp.path().join(".cache/b.json"), EXPORT).unwrap();
        std::fs::write(temp.path().join("archive/c.json"), EXPORT).unwrap();

        let config = Config {
            excluded_paths: vec!["**/archive/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(temp.path(), &config).unwrap();
        assert_eq!(files, vec![temp.path().join("a.json")]);
    }

    #[test]
    fn test_analyze_writes_output_and_actionable() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.json");
        std::fs::write(&input, EXPORT).unwrap();

        let mut args = analyze_args(input);
        args.output = Some(temp.path().join("out/report.json"));
        args.actionable = Some(temp.path().join("actionable.json"));
        args.fail_on_high = true;

        let code = run_analyze(&args).unwrap();
        assert_eq!(code, EXIT_FAILED);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(temp.path().join("out/report.json")).unwrap())
                .unwrap();
        assert_eq!(report["summary"]["groupCount"], 1);

        let actionable: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(temp.path().join("actionable.json")).unwrap())
                .unwrap();
        assert_eq!(actionable["total"], 1);
    }

    #[test]
    fn test_analyze_directory_to_output_dir() {
        let temp = TempDir::new().unwrap();
        let exports = temp.path().join("exports");
        std::fs::create_dir_all(&exports).unwrap();
        std::fs::write(exports.join("home.json"), EXPORT).unwrap();
        std::fs::write(exports.join("broken.json"), "{").unwrap();

        let mut args = analyze_args(exports);
        args.format = Some("html".to_string());
        args.output = Some(temp.path().join("reports"));
        args.disable = vec![Module::Rename];
        args.fail_on_high = true;

        assert_eq!(run_analyze(&args).unwrap(), EXIT_SUCCESS);
        assert!(temp.path().join("reports/home.report.html").exists());
        assert!(!temp.path().join("reports/broken.report.html").exists());
    }

    #[test]
    fn test_invalid_format_and_missing_path() {
        let temp = TempDir::new().unwrap();
        let mut args = analyze_args(temp.path().join("missing.json"));
        assert_eq!(run_analyze(&args).unwrap(), EXIT_ERROR);

        args.format = Some("pdf".to_string());
        assert_eq!(run_analyze(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            output: temp.path().join("figma-organizer.yaml"),
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let written = Config::parse_file(&args.output).unwrap();
        assert_eq!(written.modules.len(), 4);
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }
}
