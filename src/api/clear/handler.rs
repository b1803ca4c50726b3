// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Clear endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;

/// Response from POST /clear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
}

/// POST /clear - Delete the session's document and end the session
///
/// Always succeeds, including when nothing was uploaded or the file is
/// already gone.
pub async fn clear_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ClearResponse>) {
    // Removed from the store first, so no later request can find it; the
    // lock then waits out any request still running in this session. A
    // request that resolved the handle earlier sees the entry closed.
    let (jar, session) = state.sessions.invalidate(jar).await;
    if let Some(handle) = session {
        let mut entry = handle.lock().await;
        entry.close();
        state.service.clear(&mut entry.state).await;
    }

    (jar, Json(ClearResponse { success: true }))
}
