use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Sample source error: {0}")]
    Source(String),

    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl AppError {
    /// True for errors confined to a single input line; the source can keep
    /// going after them.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Parse { .. } => true,
            AppError::Io(e) => e.kind() == std::io::ErrorKind::InvalidData,
            _ => false,
        }
    }
}
