//! # hcx-embed-cli
//!
//! Command-line front end for the HyperCLOVA X embedding client: argument parsing, config
//! loading, logging setup and the two execution modes.

pub mod cli;
pub mod logger;

use anyhow::Result;
use embedding::{BlockingEmbeddingService, EmbeddingService};

pub use cli::{collect_texts, load_config, Cli};

/// Embeds `texts` and renders the result as JSON: one vector for a query, otherwise an
/// array of vectors in input order.
pub async fn embed_to_json<S>(service: &S, texts: &[String], query: bool) -> Result<String>
where
    S: EmbeddingService + ?Sized,
{
    if query {
        let vector = service.embed_query(first_text(texts)?).await?;
        Ok(serde_json::to_string(&vector)?)
    } else {
        let vectors = service.embed_documents(texts).await?;
        Ok(serde_json::to_string(&vectors)?)
    }
}

/// Blocking counterpart of [`embed_to_json`].
pub fn embed_to_json_blocking<S>(service: &S, texts: &[String], query: bool) -> Result<String>
where
    S: BlockingEmbeddingService + ?Sized,
{
    if query {
        let vector = service.embed_query(first_text(texts)?)?;
        Ok(serde_json::to_string(&vector)?)
    } else {
        let vectors = service.embed_documents(texts)?;
        Ok(serde_json::to_string(&vectors)?)
    }
}

fn first_text(texts: &[String]) -> Result<&str> {
    texts
        .first()
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("No query text given"))
}
