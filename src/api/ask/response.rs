// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask response types

use serde::{Deserialize, Serialize};

use crate::engine::QaAnswer;

/// Response from POST /ask
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text produced by the QA engine
    pub response: String,
    /// Literal text of each supporting chunk, in retrieval order
    pub sources: Vec<String>,
}

impl From<QaAnswer> for AskResponse {
    fn from(answer: QaAnswer) -> Self {
        let sources = answer.source_texts();
        Self {
            response: answer.response,
            sources,
        }
    }
}
