//! Build processed per-game bundles with a TTL.
//!
//! Appids whose stored bundle is still fresh are skipped unless `--force`.
//! Otherwise the raw inputs are refetched, normalized into `interim/` and
//! scored into `processed/game_bundles/`.
//!
//! ```bash
//! build-signals-bundle --appids-file appids.txt --ttl-hours 12
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use game_context_core::cli::{self, AppIdArgs, ClientArgs, DataArgs, LocaleArgs};
use game_context_core::client::SCHEMA_ENDPOINT;
use game_context_core::pipeline::{GameSignalsPipeline, RefreshOutcome};

#[derive(Parser, Debug)]
#[command(name = "build-signals-bundle")]
#[command(about = "Refresh raw signals and build TTL'd quality/live/discount bundles")]
#[command(version)]
struct Args {
    #[command(flatten)]
    appids: AppIdArgs,

    /// Review language filter passed to appreviews
    #[arg(long, default_value = "all")]
    review_lang: String,

    /// Bundle lifetime in hours
    #[arg(long, default_value_t = 24.0)]
    ttl_hours: f64,

    /// Rebuild even if the stored bundle has not expired
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    locale: LocaleArgs,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    client: ClientArgs,
}

fn ttl_seconds(hours: f64) -> Result<i64> {
    let secs = hours * 3600.0;
    if !secs.is_finite() || secs < 0.0 || secs >= i64::MAX as f64 {
        bail!("--ttl-hours must be a finite, non-negative number of hours, got {hours}");
    }
    Ok(secs as i64)
}

fn main() -> Result<()> {
    cli::load_env();
    let args = Args::parse();
    cli::init_tracing();

    let appids = args.appids.require()?;
    let now = cli::now_ts();
    let ttl_seconds = ttl_seconds(args.ttl_hours)?;

    let store = args.data.store();
    let mut client = args.client.client(&args.data)?;
    let pipeline = GameSignalsPipeline::new(&store, args.locale.locale())
        .review_lang(&args.review_lang)
        .ttl_seconds(ttl_seconds)
        .force(args.force);

    if appids.iter().any(|&appid| args.force || !pipeline.is_fresh(appid, now)) {
        client.ensure_api_key(SCHEMA_ENDPOINT)?;
    }

    let (mut rebuilt, mut skipped) = (0usize, 0usize);
    let mut failed = Vec::new();
    for &appid in &appids {
        match pipeline.refresh(&mut client, appid, now) {
            Ok(RefreshOutcome::Fresh) => skipped += 1,
            Ok(RefreshOutcome::Rebuilt { .. }) => rebuilt += 1,
            Err(err) => {
                tracing::error!(%appid, error = %err, "bundle build failed");
                failed.push(appid);
            }
        }
    }

    println!("rebuilt={rebuilt} skipped_fresh={skipped} failed={}", failed.len());
    if !failed.is_empty() {
        bail!("Failed appids: {:?}", failed);
    }
    Ok(())
}
