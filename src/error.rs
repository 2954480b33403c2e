// src/error.rs
//! Error types for reading acquisition.

use thiserror::Error;

/// Reason a smartctl reading was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("exit status {status} has fatal bits {bits:?} set")]
    FatalExitStatus { status: i64, bits: Vec<u8> },

    #[error("smartctl reported error: {0}")]
    ErrorMessage(String),
}

/// Errors surfaced by the collector.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("smartctl returned bad data for device {device}: {reason}")]
    Rejected { device: String, reason: Rejection },
}

impl CollectorError {
    /// Device the error is scoped to.
    pub fn device(&self) -> &str {
        match self {
            CollectorError::Rejected { device, .. } => device,
        }
    }
}
