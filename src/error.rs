//! Error taxonomy shared by the estimators, the asset layer and the session controller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("Malformed sample in {asset} (line {line}): {message}")]
    Parse {
        asset: String,
        line: u64,
        message: String,
    },

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Unable to read asset {name}: {message}")]
    AssetRead { name: String, message: String },

    #[error("Unable to resolve media reference: {0}")]
    Resolution(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Measurement cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl VitalsError {
    pub fn storage(err: anyhow::Error) -> Self {
        VitalsError::Storage(format!("{err:#}"))
    }
}

pub type VitalsResult<T> = Result<T, VitalsError>;
