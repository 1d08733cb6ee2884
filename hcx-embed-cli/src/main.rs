//! hcx-embed: embed texts with HyperCLOVA X and print the vectors as JSON.
//! Credentials from env / `.env`; model and host can be overridden on the command line.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use hcx_embed_cli::{collect_texts, embed_to_json, embed_to_json_blocking, load_config, logger, Cli};
use hyperclova_embedding::HyperClovaEmbedding;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let texts = collect_texts(&cli.texts, cli.query, io::stdin().lock())?;
    if texts.is_empty() {
        anyhow::bail!("No text to embed: pass texts as arguments or pipe them on stdin");
    }

    let service = HyperClovaEmbedding::new(config);
    info!(
        model = %service.model(),
        count = texts.len(),
        blocking = cli.blocking,
        "hcx-embed start"
    );

    // The blocking client runs its own runtime, so it must stay outside of tokio.
    let output = if cli.blocking {
        embed_to_json_blocking(&service, &texts, cli.query)?
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Build tokio runtime")?;
        runtime.block_on(embed_to_json(&service, &texts, cli.query))?
    };

    println!("{}", output);
    Ok(())
}
