//! CLI parser, config loading and text collection.

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::Parser;
use hyperclova_embedding::HyperClovaConfig;

#[derive(Parser, Debug)]
#[command(name = "hcx-embed")]
#[command(about = "Embed texts with HyperCLOVA X and print the vectors as JSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Embedding model (clir-emb-dolphin or clir-sts-dolphin); overrides NCP_EMB_MODEL.
    #[arg(short, long)]
    pub model: Option<String>,

    /// API host; overrides NCP_CLOVASTUDIO_API_HOST.
    #[arg(long)]
    pub host: Option<String>,

    /// Embed exactly one text as a query and print a single vector.
    #[arg(short, long)]
    pub query: bool,

    /// Use the blocking HTTP client instead of the async one.
    #[arg(short, long)]
    pub blocking: bool,

    /// Texts to embed. When omitted, non-empty lines are read from stdin.
    pub texts: Vec<String>,
}

/// Builds the client config. Credentials always come from env (or `.env`).
pub fn load_config(cli: &Cli) -> Result<HyperClovaConfig> {
    let mut builder = HyperClovaConfig::builder();
    if let Some(model) = &cli.model {
        builder = builder.model(model.as_str());
    }
    if let Some(host) = &cli.host {
        builder = builder.api_host(host.as_str());
    }
    builder.build().context(
        "Load HyperCLOVA X config from .env (NCP_CLOVASTUDIO_API_KEY, NCP_APIGW_API_KEY, NCP_EMB_APP_ID)",
    )
}

/// Returns the texts given as arguments, or the non-empty lines of `input` when there are none.
pub fn collect_texts(args: &[String], query: bool, input: impl BufRead) -> Result<Vec<String>> {
    let texts = if args.is_empty() {
        let mut texts = Vec::new();
        for line in input.lines() {
            let line = line.context("Read text from stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                texts.push(line.to_string());
            }
        }
        texts
    } else {
        args.to_vec()
    };

    if query && texts.len() != 1 {
        anyhow::bail!("--query takes exactly one text, got {}", texts.len());
    }
    Ok(texts)
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;
