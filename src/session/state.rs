// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The document a session is currently asking questions about.
/// File and index name are always created and replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDocument {
    /// Client-supplied name, kept only as metadata
    pub original_name: String,
    /// Server-chosen location under the uploads directory
    pub file_path: PathBuf,
    pub index_name: String,
    pub size_bytes: u64,
}

/// Session-scoped values carried between requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    document: Option<ActiveDocument>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&ActiveDocument> {
        self.document.as_ref()
    }

    /// Bind a new document, returning the one it replaces
    pub fn replace_document(&mut self, document: ActiveDocument) -> Option<ActiveDocument> {
        self.document.replace(document)
    }

    /// Drop every session-scoped value, returning the document that was bound
    pub fn clear(&mut self) -> Option<ActiveDocument> {
        self.document.take()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_none()
    }
}
