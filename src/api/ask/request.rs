// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask request types

use serde::{Deserialize, Serialize};

/// Form body of POST /ask
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// Natural-language question about the uploaded document
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// Question text, empty when the field was not sent
    pub fn question(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }
}
