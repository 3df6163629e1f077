//! Rank the games in a context bundle file and print the Top-K as JSON.
//!
//! Stdout carries only the JSON result; logs go to stderr.
//!
//! ```bash
//! topk-demo --bundle data/processed/context_bundles/7656...__cc=us__lang=en.json --top-k 5
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use game_context_core::cli;
use game_context_core::selection::{ScoreWeights, TopKSelector};
use game_context_core::types::ContextBundle;

#[derive(Parser, Debug)]
#[command(name = "topk-demo")]
#[command(about = "Demo: Top-K candidates from a context bundle (pre-filtering)")]
#[command(version)]
struct Args {
    /// Path to a context bundle JSON file
    #[arg(long)]
    bundle: PathBuf,

    #[arg(long, default_value_t = 10)]
    top_k: usize,

    #[arg(long, default_value_t = 0.60)]
    w_quality: f64,

    #[arg(long, default_value_t = 0.25)]
    w_live: f64,

    #[arg(long, default_value_t = 0.15)]
    w_discount: f64,

    /// How many contributors the reason string names
    #[arg(long, default_value_t = 2)]
    reason_top_n: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    cli::init_tracing();

    let bytes = std::fs::read(&args.bundle)
        .with_context(|| format!("Failed to read bundle: {}", args.bundle.display()))?;
    let bundle: ContextBundle = serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid context bundle: {}", args.bundle.display()))?;

    let selector = TopKSelector::weighted(
        ScoreWeights {
            quality_trust: args.w_quality,
            live: args.w_live,
            discount: args.w_discount,
        },
        args.reason_top_n,
    );
    let result = selector.select(&bundle, args.top_k);
    tracing::info!(candidates = bundle.games.len(), returned = result.top_k.len(), "ranked");

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
