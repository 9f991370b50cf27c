use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GROWTH_CHUNK: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_growth_chunk")]
    pub growth_chunk: usize,

    #[serde(default = "default_interval")]
    pub polling_interval: Duration,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            growth_chunk: default_growth_chunk(),
            polling_interval: default_interval(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            ansi: default_ansi(),
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Loads `path` if given, otherwise the platform default location. A
    /// missing default file yields the built-in defaults; a missing explicit
    /// file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "jvmtelemetry", "JVM-Telemetry")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_chunk == 0 {
            return Err(AppError::Config(
                "growth_chunk must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_growth_chunk() -> usize {
    DEFAULT_GROWTH_CHUNK
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_level() -> String {
    "info".to_string()
}

fn default_ansi() -> bool {
    true
}
