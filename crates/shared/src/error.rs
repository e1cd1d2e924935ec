use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineErrorKind {
    Emission,
    AssetLoad,
    Timeout,
}

/// Failure surfaced by a reactive pipeline. Renders as its bare message so it
/// can be shown directly as an error log line.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct PipelineError {
    pub kind: PipelineErrorKind,
    pub message: String,
}

impl PipelineError {
    pub fn new(kind: PipelineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn emission(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Emission, message)
    }

    pub fn asset_load(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::AssetLoad, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Timeout, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);
