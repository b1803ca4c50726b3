// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP QA engine client tests against a local stand-in engine

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, post},
    Json, Router,
};
use docqa_server::engine::{
    EngineError, HttpQaEngine, QaEngine, QaRequest, VectorStoreParams,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

async fn query(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded
        .queries
        .lock()
        .unwrap()
        .push((bearer(&headers), body.clone()));

    if body["question"] == "fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "index build failed" })),
        );
    }
    if body["question"] == "unindexable" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "no text layer" })),
        );
    }
    if body["question"] == "slow" {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    (
        StatusCode::OK,
        Json(json!({
            "response": "The total is 42 EUR.",
            "source_nodes": [
                { "text": "Total due: 42 EUR", "score": 0.91 },
                { "text": "Invoice 2024-117" }
            ]
        })),
    )
}

async fn delete_index(
    State(recorded): State<Recorded>,
    Path(name): Path<String>,
) -> StatusCode {
    recorded.deletes.lock().unwrap().push(name.clone());
    if name == "IndexF0000000" {
        StatusCode::NOT_FOUND
    } else if name == "IndexE0000000" {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn spawn_engine() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1/qa/query", post(query))
        .route("/v1/indexes/:name", delete(delete_index))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), recorded)
}

fn request(question: &str) -> QaRequest {
    QaRequest {
        input_files: vec!["uploads/IndexAbc12345-report.pdf".to_string()],
        vector_store_params: VectorStoreParams {
            vector_store_type: "WeaviateVectorStore".to_string(),
            index_name: "IndexAbc12345".to_string(),
        },
        question: question.to_string(),
    }
}

#[tokio::test]
async fn test_query_wire_format() {
    let (url, recorded) = spawn_engine().await;
    let engine =
        HttpQaEngine::new(&url, Some("sk-test".to_string()), Duration::from_secs(5)).unwrap();

    let answer = engine.query(request("What is the total?")).await.unwrap();
    assert_eq!(answer.response, "The total is 42 EUR.");
    assert_eq!(
        answer.source_texts(),
        vec!["Total due: 42 EUR".to_string(), "Invoice 2024-117".to_string()]
    );
    assert_eq!(answer.source_nodes[1].score, None);

    let queries = recorded.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    let (auth, body) = &queries[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(
        *body,
        json!({
            "input_files": ["uploads/IndexAbc12345-report.pdf"],
            "vector_store_params": {
                "vector_store_type": "WeaviateVectorStore",
                "index_name": "IndexAbc12345"
            },
            "question": "What is the total?"
        })
    );
}

#[tokio::test]
async fn test_query_without_api_key_sends_no_auth() {
    let (url, recorded) = spawn_engine().await;
    let engine = HttpQaEngine::new(&url, None, Duration::from_secs(5)).unwrap();

    engine.query(request("total?")).await.unwrap();

    let queries = recorded.queries.lock().unwrap();
    assert_eq!(queries[0].0, None);
}

#[tokio::test]
async fn test_query_error_status() {
    let (url, _recorded) = spawn_engine().await;
    let engine = HttpQaEngine::new(&url, None, Duration::from_secs(5)).unwrap();

    let err = engine.query(request("fail")).await.unwrap_err();
    match err {
        EngineError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("index build failed"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_timeout() {
    let (url, _recorded) = spawn_engine().await;
    let engine = HttpQaEngine::new(&url, None, Duration::from_millis(300)).unwrap();

    let err = engine.query(request("slow")).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_delete_index() {
    let (url, recorded) = spawn_engine().await;
    let engine =
        HttpQaEngine::new(&url, Some("sk-test".to_string()), Duration::from_secs(5)).unwrap();

    engine.delete_index("IndexAbc12345").await.unwrap();
    // Already gone counts as deleted
    engine.delete_index("IndexF0000000").await.unwrap();

    let err = engine.delete_index("IndexE0000000").await.unwrap_err();
    assert!(matches!(err, EngineError::Status { status: 500, .. }));

    assert_eq!(
        *recorded.deletes.lock().unwrap(),
        vec![
            "IndexAbc12345".to_string(),
            "IndexF0000000".to_string(),
            "IndexE0000000".to_string()
        ]
    );
}

#[tokio::test]
async fn test_query_unindexable_document() {
    let (url, _recorded) = spawn_engine().await;
    let engine = HttpQaEngine::new(&url, None, Duration::from_secs(5)).unwrap();

    let err = engine.query(request("unindexable")).await.unwrap_err();
    match err {
        EngineError::IndexBuildFailed { index_name, reason } => {
            assert_eq!(index_name, "IndexAbc12345");
            assert!(reason.contains("no text layer"));
        }
        other => panic!("expected index build failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_index_rejects_malformed_name() {
    let (url, recorded) = spawn_engine().await;
    let engine = HttpQaEngine::new(&url, None, Duration::from_secs(5)).unwrap();

    for name in ["../admin", "IndexAbc12345/extra", "index", ""] {
        let err = engine.delete_index(name).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidIndexName(_)));
    }
    assert!(recorded.deletes.lock().unwrap().is_empty());
}
