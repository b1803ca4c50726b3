// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::ask::ask_handler;
use super::clear::clear_handler;
use super::handlers::{health_handler, index_handler};
use super::upload::upload_handler;
use crate::config::ServiceConfig;
use crate::documents::UploadStorage;
use crate::engine::{HttpQaEngine, QaEngine};
use crate::service::DocumentService;
use crate::session::{SessionManager, SessionStore, SessionStoreConfig, SessionTokens};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DocumentService>,
    pub sessions: Arc<SessionManager>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        service: DocumentService,
        sessions: SessionManager,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            service: Arc::new(service),
            sessions: Arc::new(sessions),
            max_upload_bytes,
        }
    }

    /// Wire the service from configuration around the given QA engine
    pub fn from_config(config: &ServiceConfig, engine: Arc<dyn QaEngine>) -> Self {
        let tokens = match &config.session_secret {
            Some(secret) => SessionTokens::new(secret.as_bytes(), config.session_ttl()),
            None => {
                warn!("No session secret configured; sessions will not survive a restart");
                SessionTokens::with_random_secret(config.session_ttl())
            }
        };

        let store = SessionStore::new(SessionStoreConfig {
            idle_timeout_seconds: config.session_ttl_secs,
            ..Default::default()
        });

        let service = DocumentService::new(
            UploadStorage::new(&config.uploads_dir),
            engine,
            config.vector_store_type.clone(),
        );

        Self::new(
            service,
            SessionManager::new(store, tokens),
            config.max_upload_bytes,
        )
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/ask", post(ask_handler))
        .route("/clear", post(clear_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Periodically drop idle sessions and release their documents
pub fn spawn_session_sweeper(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let expired = state.sessions.store().cleanup_expired().await;
            if expired.is_empty() {
                continue;
            }

            let mut released = 0;
            for session in &expired {
                if let Some(document) = session.document() {
                    state.service.release(document).await;
                    released += 1;
                }
            }
            info!(
                sessions = expired.len(),
                documents = released,
                "Swept idle sessions"
            );
        }
    })
}

/// Run the service until `shutdown` resolves
pub async fn start_server(
    config: ServiceConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    config.validate()?;

    let engine: Arc<dyn QaEngine> = Arc::new(HttpQaEngine::new(
        &config.qa_engine_url,
        config.llm_api_key.clone(),
        config.qa_timeout(),
    )?);
    let state = AppState::from_config(&config, engine);
    state.service.storage().ensure_dir().await?;

    let sweeper = spawn_session_sweeper(state.clone(), config.session_cleanup_interval());
    let app = create_app(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Document QA server listening on {} (uploads: {}, engine: {})",
        listener.local_addr()?,
        config.uploads_dir.display(),
        config.qa_engine_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    sweeper.abort();
    info!("Document QA server stopped");
    Ok(())
}
