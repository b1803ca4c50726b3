// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Session store lifecycle tests
//!
//! These tests verify that:
//! - Idle sessions are removed by cleanup and hand back their documents
//! - A session serving a request is never swept
//! - A full store evicts idle sessions before admitting a new one
//! - Requests within one session are serialized

use docqa_server::session::{ActiveDocument, SessionStore, SessionStoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn document(index_name: &str) -> ActiveDocument {
    ActiveDocument {
        original_name: "report.pdf".to_string(),
        file_path: PathBuf::from(format!("uploads/{}-report.pdf", index_name)),
        index_name: index_name.to_string(),
        size_bytes: 4,
    }
}

fn idle_store(max_sessions: usize) -> SessionStore {
    SessionStore::new(SessionStoreConfig {
        max_sessions,
        idle_timeout_seconds: 0,
    })
}

#[tokio::test]
async fn test_cleanup_returns_documents_of_idle_sessions() {
    let store = idle_store(10);
    let (_, handle, _) = store.create().await;
    handle
        .lock()
        .await
        .state
        .replace_document(document("IndexAaaaaaaa"));
    store.create().await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    let expired = store.cleanup_expired().await;

    assert_eq!(expired.len(), 2);
    let documents: Vec<&str> = expired
        .iter()
        .filter_map(|state| state.document())
        .map(|doc| doc.index_name.as_str())
        .collect();
    assert_eq!(documents, vec!["IndexAaaaaaaa"]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_busy_session_not_swept() {
    let store = idle_store(10);
    let (id, handle, _) = store.create().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let guard = handle.lock().await;
    assert!(store.cleanup_expired().await.is_empty());
    assert!(store.exists(&id).await);
    drop(guard);

    assert_eq!(store.cleanup_expired().await.len(), 1);
    assert!(!store.exists(&id).await);
}

#[tokio::test]
async fn test_full_store_evicts_idle_sessions() {
    let store = idle_store(2);
    let (_, first, _) = store.create().await;
    first
        .lock()
        .await
        .state
        .replace_document(document("IndexBbbbbbbb"));
    store.create().await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    let (id, _, evicted) = store.create().await;

    assert_eq!(evicted.len(), 2);
    assert_eq!(
        evicted
            .iter()
            .filter(|state| state.document().is_some())
            .count(),
        1
    );
    assert_eq!(store.len().await, 1);
    assert!(store.exists(&id).await);
}

#[tokio::test]
async fn test_active_session_survives() {
    let store = SessionStore::new(SessionStoreConfig::default());
    let (id, _, _) = store.create().await;

    assert!(store.get(&id).await.is_some());
    assert!(store.cleanup_expired().await.is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_requests_in_one_session_are_serialized() {
    let store = Arc::new(SessionStore::new(SessionStoreConfig::default()));
    let (id, _, _) = store.create().await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            let handle = store.get(&id).await.unwrap();
            let mut entry = handle.lock().await;
            let before = entry.state.document().map(|doc| doc.size_bytes);
            tokio::time::sleep(Duration::from_millis(5)).await;
            // Nobody else touched the state while the lock was held
            assert_eq!(entry.state.document().map(|doc| doc.size_bytes), before);
            let mut doc = document(&format!("Index{:08x}", i));
            doc.size_bytes = i;
            entry.state.replace_document(doc);
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    let handle = store.get(&id).await.unwrap();
    assert!(handle.lock().await.state.document().is_some());
}
