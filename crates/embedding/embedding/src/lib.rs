//! # Text Embeddings
//!
//! This crate defines the embedding service interfaces a prompt-orchestration host expects from
//! an embedding provider: "embed a list of documents" and "embed a single query".
//!
//! Both capabilities come in two forms:
//! - [`EmbeddingService`]: the calling task suspends while the provider answers.
//! - [`BlockingEmbeddingService`]: the calling thread is occupied for the whole round trip.
//!
//! Providers report failures as `anyhow::Error`; a provider's own error type travels inside it
//! and can be recovered with `downcast_ref`.

use async_trait::async_trait;

/// Service for generating text embeddings without blocking the calling thread.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates one embedding vector per text, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;

    /// Generates the embedding vector for a single query string.
    ///
    /// Equivalent to the only element of `embed_documents(&[text])`.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        let mut embeddings = self.embed_documents(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned for query"))
    }
}

/// Blocking counterpart of [`EmbeddingService`].
///
/// Must not be called from inside an async runtime worker.
pub trait BlockingEmbeddingService: Send + Sync {
    /// Generates one embedding vector per text, in input order.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;

    /// Generates the embedding vector for a single query string.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        let mut embeddings = self.embed_documents(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned for query"))
    }
}
