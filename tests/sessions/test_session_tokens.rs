// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Session token and cookie tests

use axum_extra::extract::cookie::{Cookie, CookieJar};
use docqa_server::session::{
    SessionError, SessionManager, SessionStore, SessionStoreConfig, SessionTokens, SESSION_COOKIE,
};
use std::time::Duration;

const SECRET: &[u8] = b"an-integration-test-secret-32-bytes!";

#[tokio::test]
async fn test_token_expires_after_ttl() {
    let tokens = SessionTokens::new(SECRET, Duration::from_secs(1));
    let token = tokens.issue("session-1").unwrap();
    assert_eq!(tokens.verify(&token).unwrap(), "session-1");

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(matches!(
        tokens.verify(&token),
        Err(SessionError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_cookie_from_restarted_process_is_ignored() {
    let before = SessionManager::new(
        SessionStore::new(SessionStoreConfig::default()),
        SessionTokens::with_random_secret(Duration::from_secs(60)),
    );
    let (jar, _) = before.resolve_or_create(CookieJar::new()).await.unwrap();
    let value = jar.get(SESSION_COOKIE).unwrap().value().to_string();

    let after = SessionManager::new(
        SessionStore::new(SessionStoreConfig::default()),
        SessionTokens::with_random_secret(Duration::from_secs(60)),
    );
    let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, value));

    assert!(after.resolve(&jar).await.is_none());

    // Upload on the restarted process starts a fresh session
    let (jar, session) = after.resolve_or_create(jar).await.unwrap();
    let issued = jar.get(SESSION_COOKIE).unwrap();
    assert_eq!(after.tokens().verify(issued.value()).unwrap(), session.id);
}

#[tokio::test]
async fn test_valid_token_for_unknown_session() {
    let manager = SessionManager::new(
        SessionStore::new(SessionStoreConfig::default()),
        SessionTokens::new(SECRET, Duration::from_secs(60)),
    );
    let token = manager.tokens().issue("never-created").unwrap();
    let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token));

    assert!(manager.resolve(&jar).await.is_none());
    assert!(manager.store().is_empty().await);
}
