// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod documents;
pub mod engine;
pub mod service;
pub mod session;
pub mod version;

pub use api::{create_app, start_server, AppState};
pub use config::ServiceConfig;
pub use documents::{generate_index_name, UploadStorage};
pub use engine::{EngineError, HttpQaEngine, QaAnswer, QaEngine, QaRequest};
pub use service::{DocumentService, ServiceError};
pub use session::{SessionManager, SessionState, SessionStore, SessionTokens};
