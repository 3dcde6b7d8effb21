//! Error types for hallkeep core

use thiserror::Error;

use crate::models::RoomStatus;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Illegal transition: cannot {operation} while room is {status}")]
    IllegalTransition {
        operation: &'static str,
        status: RoomStatus,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Errors that are local to the caller and never touched shared state
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::IllegalTransition { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
