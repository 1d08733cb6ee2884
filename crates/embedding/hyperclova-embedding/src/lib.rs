//! # HyperCLOVA X Embedding Service
//!
//! This crate provides an implementation of the `EmbeddingService` and
//! `BlockingEmbeddingService` traits using Naver Cloud Platform's HyperCLOVA X
//! embedding API tool.
//!
//! ## HyperClovaEmbedding
//!
//! Sends one `POST` per text to
//! `https://{host}/testapp/v1/api-tools/embedding/{model}/{app_id}` with body `{"text": ...}`
//! and returns `result.embedding` when the response's `status.code` is `"20000"`.
//!
//! Batches are embedded one text at a time, in input order: request N+1 is not sent until
//! response N has been fully read. The first failure aborts the batch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hyperclova_embedding::{HyperClovaConfig, HyperClovaEmbedding};
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     // Credentials not passed here are read from NCP_CLOVASTUDIO_API_KEY,
//!     // NCP_APIGW_API_KEY and NCP_EMB_APP_ID.
//!     let config = HyperClovaConfig::builder()
//!         .model("clir-emb-dolphin")
//!         .build()?;
//!     let service = HyperClovaEmbedding::new(config);
//!
//!     let embedding = service.embed_query("Hello world").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Models
//!
//! - `clir-emb-dolphin` (default)
//! - `clir-sts-dolphin`

use std::borrow::Cow;

use async_trait::async_trait;
use embedding::{BlockingEmbeddingService, EmbeddingService};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, info, warn};

mod config;
mod error;
mod wire;

pub use config::{
    HyperClovaConfig, HyperClovaConfigBuilder, HyperClovaModel, SecretString, API_GATEWAY_KEY_ENV,
    API_HOST_ENV, API_KEY_ENV, APP_ID_ENV, DEFAULT_API_HOST, MODEL_ENV,
};
pub use error::{HyperClovaError, Result};
pub use wire::{EmbeddingInput, SUCCESS_CODE};

use wire::{parse_embedding_response, API_GATEWAY_KEY_HEADER, API_KEY_HEADER};

const LOG_PREVIEW_LEN: usize = 200;

/// HyperCLOVA X embedding client. Holds only the immutable configuration; every call
/// opens its own HTTP client and releases it before returning.
#[derive(Debug, Clone)]
pub struct HyperClovaEmbedding {
    config: HyperClovaConfig,
}

impl HyperClovaEmbedding {
    pub fn new(config: HyperClovaConfig) -> Self {
        Self { config }
    }

    /// Creates a client from environment variables with the default model and host.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HyperClovaConfig::from_env()?))
    }

    pub fn config(&self) -> &HyperClovaConfig {
        &self.config
    }

    pub fn model(&self) -> HyperClovaModel {
        self.config.model()
    }

    /// Embeds one text without blocking the calling thread.
    ///
    /// # Errors
    ///
    /// - [`HyperClovaError::Provider`] when `status.code` is not `"20000"`
    /// - [`HyperClovaError::Transport`] for connection and I/O failures
    /// - [`HyperClovaError::Decode`] when the body is not the expected JSON
    pub async fn embed(&self, input: impl Into<EmbeddingInput>) -> Result<Vec<f32>> {
        let input = input.into();
        self.log_request(&input);

        // Scoped to this call: the client and its connections are dropped on every exit path.
        // Errors drop the URL: its last segment is the app id.
        let client = reqwest::Client::builder().build()?;
        let response = client
            .post(self.config.endpoint_url())
            .headers(self.headers())
            .json(&input)
            .send()
            .await
            .map_err(|e| e.without_url())?;
        let body = response.text().await.map_err(|e| e.without_url())?;

        self.finish(&body)
    }

    /// Embeds a raw JSON value: a string or an object with a string `text` member.
    ///
    /// Any other value fails with [`HyperClovaError::InvalidInput`] before a request is made.
    pub async fn embed_value(&self, value: Value) -> Result<Vec<f32>> {
        let input = EmbeddingInput::try_from(value)?;
        self.embed(input).await
    }

    /// Blocking counterpart of [`embed`](Self::embed). Occupies the calling thread for the
    /// whole round trip; do not call from inside an async runtime worker.
    pub fn embed_blocking(&self, input: impl Into<EmbeddingInput>) -> Result<Vec<f32>> {
        let input = input.into();
        self.log_request(&input);

        let client = reqwest::blocking::Client::builder().build()?;
        let response = client
            .post(self.config.endpoint_url())
            .headers(self.headers())
            .json(&input)
            .send()
            .map_err(|e| e.without_url())?;
        let body = response.text().map_err(|e| e.without_url())?;

        self.finish(&body)
    }

    /// Blocking counterpart of [`embed_value`](Self::embed_value).
    pub fn embed_value_blocking(&self, value: Value) -> Result<Vec<f32>> {
        let input = EmbeddingInput::try_from(value)?;
        self.embed_blocking(input)
    }

    /// Embeds each text in order, one request at a time.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        info!(
            model = %self.config.model(),
            batch_size = texts.len(),
            "step: HyperCLOVA X embed_batch request"
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            debug!(index, "step: HyperCLOVA X embed_batch item");
            embeddings.push(self.embed(text).await?);
        }

        info!(count = embeddings.len(), "step: HyperCLOVA X embed_batch done");
        Ok(embeddings)
    }

    /// Blocking counterpart of [`embed_batch`](Self::embed_batch).
    pub fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        info!(
            model = %self.config.model(),
            batch_size = texts.len(),
            "step: HyperCLOVA X embed_batch request (blocking)"
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            debug!(index, "step: HyperCLOVA X embed_batch item");
            embeddings.push(self.embed_blocking(text)?);
        }

        info!(count = embeddings.len(), "step: HyperCLOVA X embed_batch done");
        Ok(embeddings)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            self.config.api_key_header().clone(),
        );
        headers.insert(
            HeaderName::from_static(API_GATEWAY_KEY_HEADER),
            self.config.api_gateway_key_header().clone(),
        );
        headers
    }

    fn log_request(&self, input: &EmbeddingInput) {
        info!(
            model = %self.config.model(),
            text_preview = %text_preview(&input.text),
            text_len = input.text.len(),
            "step: HyperCLOVA X embed request"
        );
    }

    fn finish(&self, body: &str) -> Result<Vec<f32>> {
        match parse_embedding_response(body) {
            Ok(embedding) => {
                info!(dimension = embedding.len(), "step: HyperCLOVA X embed done");
                Ok(embedding)
            }
            Err(e) => {
                if let HyperClovaError::Provider { code, .. } = &e {
                    warn!(
                        model = %self.config.model(),
                        code = code.as_deref().unwrap_or("none"),
                        "step: HyperCLOVA X embed rejected by provider"
                    );
                }
                Err(e)
            }
        }
    }
}

/// First `LOG_PREVIEW_LEN` bytes of `text`, cut back to a char boundary.
fn text_preview(text: &str) -> Cow<'_, str> {
    if text.len() <= LOG_PREVIEW_LEN {
        return Cow::Borrowed(text);
    }
    let mut end = LOG_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", &text[..end]))
}

#[async_trait]
impl EmbeddingService for HyperClovaEmbedding {
    async fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.embed_batch(texts).await?)
    }
}

impl BlockingEmbeddingService for HyperClovaEmbedding {
    fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.embed_batch_blocking(texts)?)
    }
}

#[cfg(test)]
mod config_test;
