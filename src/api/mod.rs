// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod ask;
pub mod clear;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod upload;

pub use ask::{ask_handler, AskRequest, AskResponse};
pub use clear::{clear_handler, ClearResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, index_handler, HealthResponse};
pub use http_server::{create_app, spawn_session_sweeper, start_server, AppState};
pub use upload::{upload_handler, UploadResponse, NO_FILE_UPLOADED};
