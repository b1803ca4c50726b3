// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server-local storage for uploaded documents
//!
//! Files land in a single uploads directory shared by all sessions. The
//! stored name is `<index_name>-<sanitized original name>`, so a client
//! filename can neither escape the directory nor overwrite another
//! session's upload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Used when sanitizing leaves nothing of the client filename
const FALLBACK_FILE_NAME: &str = "document.pdf";

/// Upper bound on the sanitized part of a stored file name
const MAX_FILE_NAME_LEN: usize = 128;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create uploads directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the uploads directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.root.clone(),
                source,
            })
    }

    /// Destination for an upload bound to `index_name`
    pub fn path_for(&self, index_name: &str, original_name: &str) -> PathBuf {
        self.root
            .join(format!("{}-{}", index_name, sanitize_file_name(original_name)))
    }

    /// Persist `contents`, replacing any file already at the destination
    pub async fn store(
        &self,
        index_name: &str,
        original_name: &str,
        contents: &[u8],
    ) -> Result<PathBuf, StorageError> {
        self.ensure_dir().await?;

        let path = self.path_for(index_name, original_name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = contents.len(), "Stored upload");
        Ok(path)
    }

    /// Remove a stored file.
    ///
    /// Returns `Ok(false)` when the file is already gone.
    pub async fn delete(&self, path: &Path) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Delete {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Reduce an untrusted client filename to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let truncated: String = trimmed.chars().take(MAX_FILE_NAME_LEN).collect();

    if truncated.is_empty() || truncated.chars().all(|c| c == '_') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        truncated
    }
}
