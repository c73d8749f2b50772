use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Operation;

/// A primitive call rejected by the underlying crypto library.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct ProviderError {
    pub operation: Operation,
    pub message: String,
}

impl ProviderError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("statistics need at least 2 samples, got {samples}")]
    InsufficientSamples { samples: usize },

    #[error("{algorithm}: warmup cycle {cycle} failed: {reason}")]
    Warmup {
        algorithm: String,
        cycle: usize,
        reason: String,
    },

    #[error("{algorithm}: iteration {iteration}: {source}")]
    Provider {
        algorithm: String,
        iteration: usize,
        #[source]
        source: ProviderError,
    },

    #[error("algorithm {0} is not provided by this build")]
    UnknownAlgorithm(String),

    #[error("failed to read catalog {}: {source}", path.display())]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed catalog {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{sink} export failed: {source}")]
    Export {
        sink: &'static str,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
