// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! QA engine boundary
//!
//! Indexing, embedding, retrieval and generation all live behind
//! [`QaEngine`]. The service only supplies document paths, an index name
//! and the question.

pub mod errors;
pub mod http_client;
pub mod types;

use async_trait::async_trait;

pub use errors::EngineError;
pub use http_client::HttpQaEngine;
pub use types::{QaAnswer, QaRequest, SourceNode, VectorStoreParams};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QaEngine: Send + Sync {
    /// Build or reuse the named index for the request's documents and
    /// answer the question against it.
    ///
    /// Same index name and same document path may reuse the existing index.
    async fn query(&self, request: QaRequest) -> Result<QaAnswer, EngineError>;

    /// Drop a named index. Engines that cannot delete indexes keep the
    /// default, which does nothing.
    async fn delete_index(&self, _index_name: &str) -> Result<(), EngineError> {
        Ok(())
    }
}
