use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};

pub mod loader;

pub use loader::{load_config, ConfigLoader};

/// File name of the per-project configuration in the working directory
pub const PROJECT_CONFIG_FILE: &str = "ai-json.toml";

/// Glob used when neither inputs nor a stream config are given
pub const DEFAULT_GLOB: &str = ".material/samples/*.json";

pub const DEFAULT_MAX_ISSUES: usize = 50;

/// Get the global directory holding `config.toml`
pub fn get_global_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "ai-json", "ai-json")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("unknown format: {other}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Effective analyzer settings after every layer has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub default_globs: Vec<String>,
    pub format: OutputFormat,
    pub max_issues: usize,
    pub strict: bool,
    pub min_confidence: f64,
    pub event_types: Vec<String>,
    pub log_level: Option<String>,
}

/// One configuration file; every key is optional and only set keys override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub default_globs: Option<Vec<String>>,
    pub format: Option<OutputFormat>,
    pub max_issues: Option<usize>,
    pub strict: Option<bool>,
    pub min_confidence: Option<f64>,
    pub event_types: Option<Vec<String>>,
    pub log_level: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_globs: vec![DEFAULT_GLOB.to_string()],
            format: OutputFormat::Text,
            max_issues: DEFAULT_MAX_ISSUES,
            strict: false,
            min_confidence: 0.0,
            event_types: Vec::new(),
            log_level: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay the keys a config file sets
    pub fn apply(&mut self, file: ConfigFile) {
        if let Some(globs) = file.default_globs {
            self.default_globs = globs;
        }
        if let Some(format) = file.format {
            self.format = format;
        }
        if let Some(max_issues) = file.max_issues {
            self.max_issues = max_issues;
        }
        if let Some(strict) = file.strict {
            self.strict = strict;
        }
        if let Some(min_confidence) = file.min_confidence {
            self.min_confidence = min_confidence;
        }
        if let Some(event_types) = file.event_types {
            self.event_types = event_types;
        }
        if file.log_level.is_some() {
            self.log_level = file.log_level;
        }
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply `AI_JSON_*` overrides read through `lookup`; unparsable values are ignored
    pub fn merge_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup("AI_JSON_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => debug!("Ignoring AI_JSON_FORMAT: {}", e),
            }
        }

        if let Some(max_issues) = lookup("AI_JSON_MAX_ISSUES") {
            if let Ok(value) = max_issues.trim().parse::<usize>() {
                self.max_issues = value;
            }
        }

        if let Some(strict) = lookup("AI_JSON_STRICT") {
            if let Ok(value) = strict.trim().parse::<bool>() {
                self.strict = value;
            }
        }

        if let Some(min_confidence) = lookup("AI_JSON_MIN_CONFIDENCE") {
            if let Ok(value) = min_confidence.trim().parse::<f64>() {
                if value.is_finite() {
                    self.min_confidence = value;
                }
            }
        }

        if let Some(log_level) = lookup("AI_JSON_LOG_LEVEL") {
            if !log_level.trim().is_empty() {
                self.log_level = Some(log_level);
            }
        }
    }
}
