// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask endpoint handler

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::request::AskRequest;
use super::response::AskResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /ask - Answer a question about the session's document
///
/// # Request
/// - `question`: form field (required)
///
/// # Response
/// - `response`: answer text
/// - `sources`: supporting passages in retrieval order
/// - a re-issued session cookie, so the session's expiry slides with use
///
/// # Errors
/// - 409 Conflict: no document uploaded in this session, or session expired
/// - 400 Bad Request: question missing or blank
/// - 502/504: QA engine failed or timed out
pub async fn ask_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Option<Form<AskRequest>>,
) -> Result<Response, ApiError> {
    let request = form.map(|Form(request)| request).unwrap_or_default();

    let session = state.sessions.resolve(&jar).await.ok_or_else(|| {
        debug!("Ask without a live session");
        ApiError::NoActiveDocument
    })?;

    let entry = session.handle.lock().await;
    if entry.is_closed() {
        debug!(session_id = %session.id, "Session cleared while ask waited");
        return Err(ApiError::NoActiveDocument);
    }

    let jar = state
        .sessions
        .refresh(jar, &session.id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    let result = state.service.ask(&entry.state, request.question()).await;
    drop(entry);

    // The refreshed cookie goes out with failures too
    Ok(match result {
        Ok(answer) => (jar, Json(AskResponse::from(answer))).into_response(),
        Err(e) => (jar, ApiError::from(e)).into_response(),
    })
}
