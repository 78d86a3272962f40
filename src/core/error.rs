//! Error types for the editing core

use thiserror::Error;

/// Main error type for the editing core
#[derive(Debug, Error)]
pub enum Error {
    #[error("history error: {0}")]
    History(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
