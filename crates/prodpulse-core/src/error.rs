//! Error types shared across the ProdPulse workspace.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, PulseError>;

/// One variant per failure class; every class is logged and survived,
/// nothing propagates past the binary entry point.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Channel error: {0}")]
    Channel(String),
}
