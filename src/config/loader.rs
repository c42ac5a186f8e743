use super::{get_global_dir, AnalyzerConfig, ConfigFile, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Builds an [`AnalyzerConfig`] layer by layer
pub struct ConfigLoader {
    config: AnalyzerConfig,
    global_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::new(),
            global_dir: get_global_dir().ok(),
        }
    }

    /// Replace the directory searched for the global `config.toml`
    pub fn with_global_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    pub async fn load_global(&mut self) -> Result<()> {
        let Some(global_dir) = &self.global_dir else {
            return Ok(());
        };
        let config_path = global_dir.join("config.toml");

        if config_path.exists() {
            let file = read_config_file(&config_path).await?;
            self.config.apply(file);
            debug!("Applied global config {}", config_path.display());
        }
        Ok(())
    }

    /// Apply `ai-json.toml` from `project_dir` when present
    pub async fn load_project(&mut self, project_dir: &Path) -> Result<()> {
        let config_path = project_dir.join(PROJECT_CONFIG_FILE);

        if config_path.exists() {
            let file = read_config_file(&config_path).await?;
            self.config.apply(file);
            debug!("Applied project config {}", config_path.display());
        }
        Ok(())
    }

    /// Apply an explicitly named config file, which must exist
    pub async fn load_file(&mut self, path: &Path) -> Result<()> {
        let file = read_config_file(path).await?;
        self.config.apply(file);
        debug!("Applied config {}", path.display());
        Ok(())
    }

    pub fn merge_env_vars(&mut self) {
        self.config.merge_env_vars();
    }

    pub fn get_config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn into_config(self) -> AnalyzerConfig {
        self.config
    }
}

async fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
}

/// Defaults, then global config, then the explicit file or the project file
/// in `project_dir`, then environment overrides
pub async fn load_config(explicit: Option<&Path>, project_dir: &Path) -> Result<AnalyzerConfig> {
    let mut loader = ConfigLoader::new();
    loader.load_global().await?;
    match explicit {
        Some(path) => loader.load_file(path).await?,
        None => loader.load_project(project_dir).await?,
    }
    loader.merge_env_vars();
    Ok(loader.into_config())
}
