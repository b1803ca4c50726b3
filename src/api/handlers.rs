// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;

/// Application page, embedded at build time
pub const INDEX_HTML: &str = include_str!("../../templates/index.html");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

/// GET / - Render the entry page
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.store().len().await,
    })
}
