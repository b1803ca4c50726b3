// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for QA engine calls

use thiserror::Error;

/// Errors returned by a QA engine while indexing, retrieving or generating
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine answered with a non-success status
    #[error("QA engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Engine did not answer within the configured timeout
    #[error("QA engine request timed out after {duration_sec}s")]
    Timeout { duration_sec: u64 },

    /// Engine could not be reached
    #[error("QA engine unreachable: {0}")]
    Transport(String),

    /// Engine answered with a body that could not be decoded
    #[error("Invalid QA engine response: {0}")]
    InvalidResponse(String),

    /// Index could not be built from the document
    #[error("Failed to build index '{index_name}': {reason}")]
    IndexBuildFailed { index_name: String, reason: String },

    /// Index name not of the shape this service generates
    #[error("Invalid index name: {0}")]
    InvalidIndexName(String),
}

impl EngineError {
    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Status { .. } => "ENGINE_STATUS",
            EngineError::Timeout { .. } => "ENGINE_TIMEOUT",
            EngineError::Transport(_) => "ENGINE_TRANSPORT",
            EngineError::InvalidResponse(_) => "ENGINE_INVALID_RESPONSE",
            EngineError::IndexBuildFailed { .. } => "INDEX_BUILD_FAILED",
            EngineError::InvalidIndexName(_) => "INVALID_INDEX_NAME",
        }
    }

    /// Whether a caller could reasonably try again.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Timeout { .. } | EngineError::Transport(_) => true,
            EngineError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
