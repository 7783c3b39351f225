use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while generating scenarios
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input is missing required column '{column}'")]
    Schema { column: String },

    #[error("Malformed row at line {line}: {message}")]
    RowParse { line: u64, message: String },

    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Generation returned no content: {reason}")]
    EmptyResponse { reason: String },

    #[error("Invalid scenario response: {message}")]
    InvalidResponse { message: String },

    #[error("Failed to write output to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScenarioError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Whether the error only affects a single row or record.
    ///
    /// Recoverable errors are logged and the offending item is skipped;
    /// everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RowParse { .. }
                | Self::Request(_)
                | Self::Api { .. }
                | Self::EmptyResponse { .. }
                | Self::InvalidResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
