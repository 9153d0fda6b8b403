//! Configuration file schema for figma-organizer.
//!
//! Configuration is optional: without a file every module runs and reports
//! use the pretty format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::organize::{Module, ModuleSelection};

/// Config file names searched for in the current directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[
    "figma-organizer.yaml",
    "organizer.yaml",
    ".figma-organizer.yaml",
];

/// Report formats accepted by `report.format` and `--format`.
pub const REPORT_FORMATS: &[&str] = &["pretty", "text", "json", "html"];

/// Default config written by `figma-organizer init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"version: "1.0"
name: "Design system"

# Analyzer modules. Remove a line or set it to false to skip that module.
modules:
  rename: true
  component: true
  layout: true
  safearea: true

# Globs skipped when analyzing a directory of exports.
excluded_paths:
  - "**/node_modules/**"

report:
  format: pretty

server:
  host: 127.0.0.1
  port: 3001
"#;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Module name (or alias) to enabled flag.
    #[serde(default)]
    pub modules: BTreeMap<String, bool>,
    /// Glob patterns excluded from directory scans.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// The module selection described by `modules`.
    pub fn module_selection(&self) -> ModuleSelection {
        let mut selection = ModuleSelection::default();
        selection.apply(self.modules.iter().map(|(k, v)| (k.as_str(), *v)));
        selection
    }

    /// Report format, defaulting to "pretty".
    pub fn report_format(&self) -> &str {
        self.report.format.as_deref().unwrap_or("pretty")
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Report defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReportConfig {
    /// pretty, text, json or html
    #[serde(default)]
    pub format: Option<String>,
}

/// Address of the HTTP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Find a config file in the current directory, if any.
pub fn discover() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Load the config at `path`, or the discovered one, or defaults.
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match discover() {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };

    let config = Config::parse_file(&path)
        .map_err(|e| anyhow::anyhow!("parsing config {}: {}", path.display(), e))?;
    validate(&config)?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for name in config.modules.keys() {
        if Module::parse(name).is_none() {
            anyhow::bail!(
                "unknown module {:?}, must be one of: rename, component, layout, safearea",
                name
            );
        }
    }

    if let Some(format) = &config.report.format {
        if !REPORT_FORMATS.contains(&format.as_str()) {
            anyhow::bail!(
                "invalid report format {:?}, must be one of: {}",
                format,
                REPORT_FORMATS.join(", ")
            );
        }
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
