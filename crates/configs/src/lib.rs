use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: Backend::File, path: default_path(), quota_bytes: None }
    }
}

fn default_path() -> PathBuf { PathBuf::from("data/storage.json") }

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Load from `CONFIG_PATH` (default `storage.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "storage.toml".to_string());
    if std::fs::metadata(&path).is_err() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load the default config file, apply a store path override, then validate.
    pub fn load_and_validate(path_override: Option<PathBuf>) -> Result<Self> {
        let mut cfg = load_default()?;
        if let Some(path) = path_override {
            cfg.storage.path = path;
        }
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        if let Some(filter) = &self.logging.filter {
            if filter.trim().is_empty() {
                self.logging.filter = None;
            }
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // an empty path in TOML falls back to STORAGE_PATH
        if self.path.as_os_str().is_empty() {
            if let Ok(path) = std::env::var("STORAGE_PATH") {
                self.path = PathBuf::from(path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::File && self.path.as_os_str().is_empty() {
            return Err(anyhow!(
                "storage.path is empty; set it in the config file or via STORAGE_PATH"
            ));
        }
        if self.quota_bytes == Some(0) {
            return Err(anyhow!("storage.quota_bytes must be >= 1 when set"));
        }
        Ok(())
    }
}
