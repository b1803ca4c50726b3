// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request and answer types exchanged with the QA engine

use serde::{Deserialize, Serialize};

/// Vector store the engine should build or reuse for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreParams {
    pub vector_store_type: String,
    pub index_name: String,
}

/// A single question against a set of documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRequest {
    /// Server-local document paths (always one in this service)
    pub input_files: Vec<String>,
    pub vector_store_params: VectorStoreParams,
    pub question: String,
}

/// A retrieved chunk that supports the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Engine answer with its supporting sources, in the engine's order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
    pub response: String,
    #[serde(default)]
    pub source_nodes: Vec<SourceNode>,
}

impl QaAnswer {
    /// Literal text of every source, order preserved
    pub fn source_texts(&self) -> Vec<String> {
        self.source_nodes.iter().map(|node| node.text.clone()).collect()
    }
}
