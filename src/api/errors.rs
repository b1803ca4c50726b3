// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::engine::EngineError;
use crate::service::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError {
        field: String,
        message: String,
    },
    NoActiveDocument,
    EngineFailure {
        code: &'static str,
        message: String,
        retryable: bool,
    },
    Timeout,
    StorageError(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::NoActiveDocument => (
                "no_active_document",
                "No document uploaded or session expired".to_string(),
                None,
            ),
            ApiError::EngineFailure {
                code,
                message,
                retryable,
            } => {
                let mut details = HashMap::new();
                details.insert(
                    "code".to_string(),
                    serde_json::Value::String(code.to_string()),
                );
                details.insert(
                    "retryable".to_string(),
                    serde_json::Value::Bool(*retryable),
                );
                ("engine_error", message.clone(), Some(details))
            }
            ApiError::Timeout => ("timeout", "QA engine timed out".to_string(), None),
            ApiError::StorageError(msg) => ("storage_error", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::NoActiveDocument => 409,
            ApiError::EngineFailure { .. } => 502,
            ApiError::Timeout => 504,
            ApiError::StorageError(_) | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::NoActiveDocument => write!(f, "No document uploaded or session expired"),
            ApiError::EngineFailure { message, .. } => write!(f, "QA engine error: {}", message),
            ApiError::Timeout => write!(f, "QA engine timed out"),
            ApiError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NoActiveDocument => ApiError::NoActiveDocument,
            ServiceError::MissingField { field } => ApiError::ValidationError {
                field: field.to_string(),
                message: format!("{} is required", field),
            },
            ServiceError::Storage(e) => ApiError::StorageError(e.to_string()),
            ServiceError::Engine(e) => e.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Timeout { .. } => ApiError::Timeout,
            other => ApiError::EngineFailure {
                code: other.error_code(),
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
