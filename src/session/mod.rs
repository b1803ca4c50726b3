// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client sessions
//!
//! A session is created by the first successful upload, found again through
//! the signed `docqa_session` cookie, and invalidated by clear or by idling
//! past its TTL.

pub mod state;
pub mod store;
pub mod token;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tracing::{debug, warn};

pub use state::{ActiveDocument, SessionState};
pub use store::{SessionEntry, SessionHandle, SessionStore, SessionStoreConfig};
pub use token::{SessionClaims, SessionTokens};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "docqa_session";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session token has expired")]
    TokenExpired,

    #[error("Failed to issue session token: {0}")]
    TokenIssue(String),
}

/// A session resolved for the current request
pub struct ResolvedSession {
    pub id: String,
    pub handle: SessionHandle,
    /// Sessions evicted to make room; their resources are still allocated
    pub evicted: Vec<SessionState>,
}

/// Binds the server-side store to the client's session cookie
pub struct SessionManager {
    store: SessionStore,
    tokens: SessionTokens,
}

impl SessionManager {
    pub fn new(store: SessionStore, tokens: SessionTokens) -> Self {
        Self { store, tokens }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    /// Session id named by the request's cookie, if the token verifies
    pub fn session_id(&self, jar: &CookieJar) -> Option<String> {
        let cookie = jar.get(SESSION_COOKIE)?;
        match self.tokens.verify(cookie.value()) {
            Ok(session_id) => Some(session_id),
            Err(e) => {
                warn!("Ignoring session cookie: {}", e);
                None
            }
        }
    }

    /// Existing live session for this request. Never creates one.
    pub async fn resolve(&self, jar: &CookieJar) -> Option<ResolvedSession> {
        let id = self.session_id(jar)?;
        let handle = self.store.get(&id).await?;
        Some(ResolvedSession {
            id,
            handle,
            evicted: Vec::new(),
        })
    }

    /// Existing live session, or a new one with its cookie added to `jar`
    pub async fn resolve_or_create(
        &self,
        jar: CookieJar,
    ) -> Result<(CookieJar, ResolvedSession), SessionError> {
        if let Some(session) = self.resolve(&jar).await {
            debug!(session_id = %session.id, "Reusing session");
            let jar = self.refresh(jar, &session.id)?;
            return Ok((jar, session));
        }

        let (id, handle, evicted) = self.store.create().await;
        let token = match self.tokens.issue(&id) {
            Ok(token) => token,
            Err(e) => {
                self.store.invalidate(&id).await;
                return Err(e);
            }
        };
        debug!(session_id = %id, "Created session");

        let jar = jar.add(session_cookie(token));
        Ok((
            jar,
            ResolvedSession {
                id,
                handle,
                evicted,
            },
        ))
    }

    /// Re-issue the session token so its expiry slides with activity, the
    /// same way the store's idle timeout does
    pub fn refresh(&self, jar: CookieJar, session_id: &str) -> Result<CookieJar, SessionError> {
        let token = self.tokens.issue(session_id)?;
        Ok(jar.add(session_cookie(token)))
    }

    /// Forget the request's session server-side, expired or not, and tell
    /// the client to drop its cookie. Returns the removed session.
    pub async fn invalidate(&self, jar: CookieJar) -> (CookieJar, Option<SessionHandle>) {
        let session_id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| match self.tokens.verify_allow_expired(cookie.value()) {
                Ok(session_id) => Some(session_id),
                Err(e) => {
                    warn!("Ignoring session cookie on clear: {}", e);
                    None
                }
            });

        let handle = match session_id {
            Some(session_id) => self.store.invalidate(&session_id).await,
            None => None,
        };
        (expire_cookie(jar), handle)
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Remove the session cookie from the client
pub fn expire_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
