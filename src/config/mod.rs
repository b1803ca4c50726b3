// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every setting can be supplied as a command-line flag or an environment
//! variable. The LLM credential and the session secret are injected here at
//! process start and scoped to the service instance.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Minimum length of a configured session secret in bytes
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Default vector store used by the QA engine
pub const DEFAULT_VECTOR_STORE_TYPE: &str = "WeaviateVectorStore";

#[derive(Parser, Clone)]
#[command(name = "docqa-server")]
#[command(about = "Upload a PDF and ask questions about it", long_about = None)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "DOCQA_LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// Directory that receives uploaded documents
    #[arg(long, env = "DOCQA_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Secret used to sign session tokens (random per process when unset)
    #[arg(long, env = "DOCQA_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Idle lifetime of a session in seconds
    #[arg(long, env = "DOCQA_SESSION_TTL_SECS", default_value_t = 3600)]
    pub session_ttl_secs: u64,

    /// How often idle sessions are swept, in seconds
    #[arg(long, env = "DOCQA_SESSION_CLEANUP_INTERVAL_SECS", default_value_t = 300)]
    pub session_cleanup_interval_secs: u64,

    /// Largest accepted request body
    #[arg(long, env = "DOCQA_MAX_UPLOAD_BYTES", default_value_t = 32 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Base URL of the QA engine service
    #[arg(long, env = "DOCQA_QA_ENGINE_URL", default_value = "http://127.0.0.1:8700")]
    pub qa_engine_url: String,

    /// API key forwarded to the QA engine's LLM backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Vector store type requested from the QA engine
    #[arg(long, env = "DOCQA_VECTOR_STORE_TYPE", default_value = DEFAULT_VECTOR_STORE_TYPE)]
    pub vector_store_type: String,

    /// Timeout for a single QA engine call, in seconds
    #[arg(long, env = "DOCQA_QA_TIMEOUT_SECS", default_value_t = 120)]
    pub qa_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            session_secret: None,
            session_ttl_secs: 3600,
            session_cleanup_interval_secs: 300,
            max_upload_bytes: 32 * 1024 * 1024,
            qa_engine_url: "http://127.0.0.1:8700".to_string(),
            llm_api_key: None,
            vector_store_type: DEFAULT_VECTOR_STORE_TYPE.to_string(),
            qa_timeout_secs: 120,
        }
    }
}

// Secrets stay out of Debug output
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("uploads_dir", &self.uploads_dir)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field(
                "session_cleanup_interval_secs",
                &self.session_cleanup_interval_secs,
            )
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("qa_engine_url", &self.qa_engine_url)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("vector_store_type", &self.vector_store_type)
            .field("qa_timeout_secs", &self.qa_timeout_secs)
            .finish()
    }
}

impl ServiceConfig {
    /// Validate the configuration before the service starts
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if let Some(secret) = &self.session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(anyhow!(
                    "Session secret too short: {} bytes (min: {} bytes)",
                    secret.len(),
                    MIN_SESSION_SECRET_LEN
                ));
            }
        }

        let engine_url = url::Url::parse(&self.qa_engine_url)
            .map_err(|e| anyhow!("Invalid QA engine URL '{}': {}", self.qa_engine_url, e))?;
        if engine_url.scheme() != "http" && engine_url.scheme() != "https" {
            return Err(anyhow!(
                "QA engine URL must use http or https, got '{}'",
                engine_url.scheme()
            ));
        }

        if self.session_ttl_secs == 0 {
            return Err(anyhow!("session_ttl_secs must be greater than 0"));
        }
        if self.session_cleanup_interval_secs == 0 {
            return Err(anyhow!("session_cleanup_interval_secs must be greater than 0"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("max_upload_bytes must be greater than 0"));
        }
        if self.qa_timeout_secs == 0 {
            return Err(anyhow!("qa_timeout_secs must be greater than 0"));
        }
        if self.vector_store_type.trim().is_empty() {
            return Err(anyhow!("vector_store_type must not be empty"));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow!("Invalid listen address '{}': {}", self.listen_addr, e))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session_cleanup_interval_secs)
    }

    pub fn qa_timeout(&self) -> Duration {
        Duration::from_secs(self.qa_timeout_secs)
    }
}
