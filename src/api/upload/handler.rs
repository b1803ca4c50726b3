// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{cookie::CookieJar, Multipart};
use bytes::Bytes;
use tracing::{debug, warn};

use super::response::{UploadResponse, NO_FILE_UPLOADED};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::session::ResolvedSession;

/// Name of the multipart part carrying the document
pub const FILE_FIELD: &str = "file";

/// A file part pulled out of the multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: Bytes,
}

/// POST /upload - Store a document and bind it to the caller's session
///
/// # Request
/// - multipart form with a `file` part
///
/// # Response
/// - `{"success": true}` and a session cookie when one did not exist yet
/// - 400 `{"success": false, "error": "No file uploaded"}` when the part is absent
///
/// # Errors
/// - 400 Bad Request: malformed multipart body
/// - 500 Internal Server Error: file could not be written
pub async fn upload_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Option<Multipart>,
) -> Result<Response, ApiError> {
    let file = match multipart {
        Some(multipart) => read_file_part(multipart).await?,
        None => None,
    };

    let Some(file) = file else {
        debug!("Upload without a file part");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(UploadResponse::failure(NO_FILE_UPLOADED)),
        )
            .into_response());
    };

    let (mut jar, mut session) = resolve_session(&state, jar).await?;
    let mut entry = session.handle.clone().lock_owned().await;

    if entry.is_closed() {
        // Cleared or swept while this upload waited. The old cookie no
        // longer resolves, so this yields a fresh session nobody else holds.
        debug!(session_id = %session.id, "Session closed while upload waited");
        drop(entry);
        (jar, session) = resolve_session(&state, jar).await?;
        entry = session.handle.clone().lock_owned().await;
    }

    state
        .service
        .upload(&mut entry.state, &file.file_name, &file.contents)
        .await?;
    drop(entry);

    Ok((jar, Json(UploadResponse::ok())).into_response())
}

/// Existing or new session for an upload; idle sessions evicted to make
/// room are released here
async fn resolve_session(
    state: &AppState,
    jar: CookieJar,
) -> Result<(CookieJar, ResolvedSession), ApiError> {
    let (jar, session) = state
        .sessions
        .resolve_or_create(jar)
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    for evicted in &session.evicted {
        if let Some(document) = evicted.document() {
            state.service.release(document).await;
        }
    }

    Ok((jar, session))
}

/// Find the `file` part. Parts without a filename count as absent.
pub async fn read_file_part(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        ApiError::InvalidRequest(format!("Malformed multipart body: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let contents = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read file part: {}", e)))?;

        return Ok(Some(UploadedFile {
            file_name,
            contents,
        }));
    }

    Ok(None)
}
