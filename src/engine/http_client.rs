// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for a remote QA engine service

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::{EngineError, QaAnswer, QaEngine, QaRequest};
use crate::documents::is_valid_index_name;

pub struct HttpQaEngine {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpQaEngine {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let _parsed_url =
            reqwest::Url::parse(base_url).map_err(|e| anyhow!("Invalid URL: {}", e))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout {
                duration_sec: self.timeout.as_secs(),
            }
        } else {
            EngineError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl QaEngine for HttpQaEngine {
    async fn query(&self, request: QaRequest) -> Result<QaAnswer, EngineError> {
        let url = format!("{}/v1/qa/query", self.base_url);
        debug!(
            index_name = %request.vector_store_params.index_name,
            files = request.input_files.len(),
            "Sending QA query"
        );

        let response = self
            .authorize(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // The engine answers 422 when the document cannot be indexed
            if status == StatusCode::UNPROCESSABLE_ENTITY {
                return Err(EngineError::IndexBuildFailed {
                    index_name: request.vector_store_params.index_name,
                    reason: body,
                });
            }
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<QaAnswer>()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }

    async fn delete_index(&self, index_name: &str) -> Result<(), EngineError> {
        // The name becomes a path segment
        if !is_valid_index_name(index_name) {
            return Err(EngineError::InvalidIndexName(index_name.to_string()));
        }

        let url = format!("{}/v1/indexes/{}", self.base_url, index_name);
        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        // Already gone counts as deleted
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(EngineError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
