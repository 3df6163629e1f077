//! Fetch raw Steam payloads into `data/raw/`.
//!
//! For every appid: appdetails (per locale), review summary, achievement
//! schema and news. With `--steam-id`, also the user's owned and recently
//! played games.
//!
//! ```bash
//! build-raw-cache --appids 570,730 --steam-id 76561197960287930
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use game_context_core::cli::{self, AppIdArgs, ClientArgs, DataArgs, LocaleArgs};
use game_context_core::client::SCHEMA_ENDPOINT;
use game_context_core::pipeline::GameSignalsPipeline;
use game_context_core::types::SteamId;

#[derive(Parser, Debug)]
#[command(name = "build-raw-cache")]
#[command(about = "Fetch appdetails/reviews/schema/news (and optionally owned games) into the raw cache")]
#[command(version)]
struct Args {
    #[command(flatten)]
    appids: AppIdArgs,

    /// Also fetch owned and recently played games for this SteamID64
    #[arg(long)]
    steam_id: Option<String>,

    /// Review language filter passed to appreviews
    #[arg(long, default_value = "all")]
    review_lang: String,

    #[command(flatten)]
    locale: LocaleArgs,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    client: ClientArgs,
}

fn main() -> Result<()> {
    cli::load_env();
    let args = Args::parse();
    cli::init_tracing();

    let steam_id = args
        .steam_id
        .as_deref()
        .map(str::parse::<SteamId>)
        .transpose()
        .context("Invalid --steam-id")?;
    let appids = args.appids.resolve()?;
    if appids.is_empty() && steam_id.is_none() {
        bail!("Nothing to fetch: pass --appids, --appids-file or --steam-id");
    }

    let store = args.data.store();
    let mut client = args.client.client(&args.data)?;
    if !appids.is_empty() {
        client.ensure_api_key(SCHEMA_ENDPOINT)?;
    }

    if let Some(steam_id) = &steam_id {
        client
            .owned_games(steam_id)
            .with_context(|| format!("Failed to fetch owned games for {steam_id}"))?;
        client
            .recently_played_games(steam_id)
            .with_context(|| format!("Failed to fetch recently played games for {steam_id}"))?;
        println!("fetched owned/recent games for {steam_id}");
    }

    let pipeline = GameSignalsPipeline::new(&store, args.locale.locale()).review_lang(&args.review_lang);
    let mut failed = Vec::new();
    for (i, &appid) in appids.iter().enumerate() {
        match pipeline.fetch_raw(&mut client, appid) {
            Ok(()) => println!("[{}/{}] {appid} ok", i + 1, appids.len()),
            Err(err) => {
                tracing::error!(%appid, error = %err, "raw fetch failed");
                failed.push(appid);
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} appids failed: {:?}", failed.len(), appids.len(), failed);
    }
    Ok(())
}
