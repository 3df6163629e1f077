//! Assemble one user's context bundle from processed snapshots.
//!
//! Missing and expired game bundles are recorded in the bundle's meta rather
//! than failing the run. `--strict` exits with status 2 when validation finds
//! issues.
//!
//! ```bash
//! build-context-bundle --steam-id 76561197960287930 --from-anchors --validate
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use game_context_core::assembly::{validate, ContextBundleAssembler};
use game_context_core::cli::{self, DataArgs, LocaleArgs};
use game_context_core::types::SteamId;

#[derive(Parser, Debug)]
#[command(name = "build-context-bundle")]
#[command(about = "Assemble a context bundle (user behavior + game contexts)")]
#[command(version)]
struct Args {
    /// SteamID64
    #[arg(long)]
    steam_id: String,

    /// Comma-separated appids, e.g. 570,730
    #[arg(long)]
    appids: Option<String>,

    /// Use the behavior's anchor appids when --appids is omitted
    #[arg(long)]
    from_anchors: bool,

    /// Include per-game _bundle_meta for TTL debugging
    #[arg(long)]
    include_game_bundle_meta: bool,

    /// Print validation issues
    #[arg(long)]
    validate: bool,

    /// Exit with status 2 if validation finds issues (implies --validate)
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    locale: LocaleArgs,

    #[command(flatten)]
    data: DataArgs,
}

fn main() -> Result<()> {
    cli::load_env();
    let args = Args::parse();
    cli::init_tracing();

    let steam_id: SteamId = args.steam_id.parse().context("Invalid --steam-id")?;
    let locale = args.locale.locale();
    let now = cli::now_ts();
    let store = args.data.store();
    let assembler =
        ContextBundleAssembler::new(&store).include_game_bundle_meta(args.include_game_bundle_meta);

    let mut appids = match &args.appids {
        Some(csv) => cli::parse_appid_csv(csv).context("Invalid --appids")?,
        None => Vec::new(),
    };
    if appids.is_empty() && args.from_anchors {
        appids = assembler
            .load_behavior(&steam_id)?
            .behavior
            .context_anchor_appids;
        tracing::info!(count = appids.len(), "using behavior anchors as appids");
    }

    let bundle = assembler.assemble(&steam_id, &appids, &locale, now)?;
    let key = assembler.write(&bundle)?;
    println!("{}", store.path_for(&key)?.display());

    if args.validate || args.strict {
        let issues = validate(&bundle);
        if issues.is_empty() {
            println!("validation_ok");
        } else {
            println!("validation_issues:");
            for issue in &issues {
                println!("- {issue}");
            }
            if args.strict {
                std::process::exit(2);
            }
        }
    }
    Ok(())
}
