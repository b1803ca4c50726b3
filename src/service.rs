// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document lifecycle for a session: upload, ask, clear
//!
//! Every operation works on a [`SessionState`] the caller has already
//! locked, so requests within one session never interleave.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::documents::{generate_index_name, StorageError, UploadStorage};
use crate::engine::{EngineError, QaAnswer, QaEngine, QaRequest, VectorStoreParams};
use crate::session::{ActiveDocument, SessionState};

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Ask (or another document operation) before any upload, or after
    /// the session was cleared or expired
    #[error("No document uploaded or session expired")]
    NoActiveDocument,

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub struct DocumentService {
    storage: UploadStorage,
    engine: Arc<dyn QaEngine>,
    vector_store_type: String,
}

impl DocumentService {
    pub fn new(
        storage: UploadStorage,
        engine: Arc<dyn QaEngine>,
        vector_store_type: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            engine,
            vector_store_type: vector_store_type.into(),
        }
    }

    pub fn storage(&self) -> &UploadStorage {
        &self.storage
    }

    /// Persist an uploaded file and bind it, with a fresh index name, to the
    /// session. A document the session held before is released afterwards.
    pub async fn upload(
        &self,
        session: &mut SessionState,
        original_name: &str,
        contents: &[u8],
    ) -> Result<ActiveDocument, ServiceError> {
        let index_name = generate_index_name();
        let file_path = self
            .storage
            .store(&index_name, original_name, contents)
            .await?;

        let document = ActiveDocument {
            original_name: original_name.to_string(),
            file_path,
            index_name,
            size_bytes: contents.len() as u64,
        };

        info!(
            index_name = %document.index_name,
            path = %document.file_path.display(),
            bytes = document.size_bytes,
            "Document uploaded"
        );

        if let Some(previous) = session.replace_document(document.clone()) {
            self.release(&previous).await;
        }

        Ok(document)
    }

    /// Answer `question` against the session's document
    pub async fn ask(
        &self,
        session: &SessionState,
        question: &str,
    ) -> Result<QaAnswer, ServiceError> {
        let document = session.document().ok_or(ServiceError::NoActiveDocument)?;

        if question.trim().is_empty() {
            return Err(ServiceError::MissingField { field: "question" });
        }

        let request = QaRequest {
            input_files: vec![path_string(&document.file_path)],
            vector_store_params: VectorStoreParams {
                vector_store_type: self.vector_store_type.clone(),
                index_name: document.index_name.clone(),
            },
            question: question.to_string(),
        };

        let answer = self.engine.query(request).await.map_err(|e| {
            warn!(
                index_name = %document.index_name,
                code = e.error_code(),
                "QA engine failed: {}",
                e
            );
            e
        })?;

        info!(
            index_name = %document.index_name,
            sources = answer.source_nodes.len(),
            "Question answered"
        );
        Ok(answer)
    }

    /// Delete the session's file (if any) and empty the session.
    /// Never fails; cleanup problems are logged.
    pub async fn clear(&self, session: &mut SessionState) -> Option<ActiveDocument> {
        let document = session.clear()?;
        self.release(&document).await;
        info!(index_name = %document.index_name, "Session document cleared");
        Some(document)
    }

    /// Best-effort removal of a document's file and remote index
    pub async fn release(&self, document: &ActiveDocument) {
        if let Err(e) = self.storage.delete(&document.file_path).await {
            warn!("Failed to delete {}: {}", document.file_path.display(), e);
        }

        if let Err(e) = self.engine.delete_index(&document.index_name).await {
            warn!(
                index_name = %document.index_name,
                code = e.error_code(),
                "Failed to delete index: {}",
                e
            );
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
