//! Build a user's behavior snapshot from their owned games.
//!
//! Reads `raw/owned_games/{steamid}.json`, writes the normalized table to
//! `interim/user_games/` and the activity state plus anchors to
//! `processed/user_behavior/`.
//!
//! ```bash
//! build-user-behavior --steam-id 76561197960287930 --fetch-if-missing
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use game_context_core::behavior::{AnchorSettings, BehaviorSettings};
use game_context_core::cache::{CacheKey, Collection};
use game_context_core::cli::{self, ClientArgs, DataArgs};
use game_context_core::pipeline::UserBehaviorPipeline;
use game_context_core::types::SteamId;

#[derive(Parser, Debug)]
#[command(name = "build-user-behavior")]
#[command(about = "Build a user behavior snapshot (activity state, anchors) from owned games")]
#[command(version)]
struct Args {
    /// SteamID64
    #[arg(long)]
    steam_id: String,

    /// 2-week hours above which the user is active
    #[arg(long, default_value_t = 5.0)]
    active_threshold_hours: f64,

    /// Days since last play still counted as cooling off
    #[arg(long, default_value_t = 14)]
    cooling_off_days: i64,

    #[arg(long, default_value_t = 10)]
    max_anchors: usize,

    /// Attach the `_debug` block explaining the activity state
    #[arg(long)]
    include_debug_log: bool,

    /// Fetch owned games from the Web API when the raw record is missing
    #[arg(long)]
    fetch_if_missing: bool,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    client: ClientArgs,
}

fn main() -> Result<()> {
    cli::load_env();
    let args = Args::parse();
    cli::init_tracing();

    let steam_id: SteamId = args.steam_id.parse().context("Invalid --steam-id")?;
    let now = cli::now_ts();
    let store = args.data.store();

    let settings = BehaviorSettings {
        active_threshold_hours: args.active_threshold_hours,
        cooling_off_days: args.cooling_off_days,
        anchors: AnchorSettings {
            max_anchors: args.max_anchors,
            ..AnchorSettings::default()
        },
        include_debug: args.include_debug_log,
        ..BehaviorSettings::default()
    };
    let pipeline = UserBehaviorPipeline::new(&store, settings);

    if !pipeline.has_raw(&steam_id)? {
        if !args.fetch_if_missing {
            let path = store.path_for(&CacheKey::new(Collection::OwnedGames, &steam_id))?;
            bail!(
                "Missing raw owned_games: {}. Run build-raw-cache first or use --fetch-if-missing",
                path.display()
            );
        }
        let mut client = args.client.client(&args.data)?;
        pipeline
            .fetch_owned_games(&mut client, &steam_id)
            .with_context(|| format!("Failed to fetch owned games for {steam_id}"))?;
    }

    let snapshot = pipeline.snapshot(&steam_id, now)?;

    if let Some(debug) = &snapshot.behavior.debug {
        println!("activity_state_debug: {}", serde_json::to_string(debug)?);
    }
    println!(
        "wrote interim user_games: {}",
        store.path_for(&CacheKey::user_games(&steam_id))?.display()
    );
    println!(
        "wrote processed behavior: {}",
        store.path_for(&CacheKey::user_behavior(&steam_id))?.display()
    );
    Ok(())
}
