//! Error types for the hallkeep binary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] hallkeep_core::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shared state lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, AppError>;
