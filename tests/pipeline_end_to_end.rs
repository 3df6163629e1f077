use std::cell::Cell;
use std::time::Duration;

use game_context_core::assembly::{validate, ContextBundleAssembler};
use game_context_core::behavior::BehaviorSettings;
use game_context_core::cache::{CacheKey, CacheStore, Collection, FsStore, MemoryStore};
use game_context_core::client::{ClientConfig, ClientError, HttpResponse, SteamClient, Transport};
use game_context_core::pipeline::{
    GameSignalsPipeline, PipelineError, RefreshOutcome, UserBehaviorPipeline,
};
use game_context_core::selection::TopKSelector;
use game_context_core::signals::InterimGameSignals;
use game_context_core::types::{ActivityState, AppId, Locale, SteamId};
use serde_json::{json, Value};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

/// Serves canned Steam payloads keyed on the endpoint path.
#[derive(Default)]
struct FakeSteam {
    calls: Cell<usize>,
    /// Appid whose schema endpoint answers 404.
    broken_schema: Option<u32>,
}

fn query_value<'a>(query: &'a [(String, String)], name: &str) -> &'a str {
    query
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

impl FakeSteam {
    fn body(&self, url: &str, query: &[(String, String)]) -> Option<Value> {
        if url.ends_with("/api/appdetails") {
            let appid = query_value(query, "appids");
            let discount = if appid == "570" { 0 } else { 40 };
            return Some(json!({ (appid): {
                "success": true,
                "data": {
                    "movies": [{}],
                    "screenshots": [{}, {}, {}, {}],
                    "recommendations": {"total": 250_000},
                    "price_overview": {"currency": "USD", "initial": 1999, "final": 1999 - 1999 * discount / 100, "discount_percent": discount}
                }
            }}));
        }
        if url.contains("/appreviews/") {
            let positive = if url.ends_with("/570") { 9_000 } else { 6_000 };
            return Some(json!({"success": 1, "query_summary": {
                "total_positive": positive, "total_negative": 10_000 - positive, "total_reviews": 10_000
            }}));
        }
        if url.contains("GetSchemaForGame") {
            if self.broken_schema.map(|a| a.to_string()).as_deref() == Some(query_value(query, "appid")) {
                return None;
            }
            return Some(json!({"game": {"availableGameStats": {"achievements": [{"name": "a"}, {"name": "b"}]}}}));
        }
        if url.contains("GetNewsForApp") {
            return Some(json!({"appnews": {"newsitems": [
                {"date": NOW - 2 * DAY, "feedlabel": "Product Update", "title": "Patch"},
                {"date": NOW - 40 * DAY, "feedlabel": "Steam Events", "title": "Old event"}
            ]}}));
        }
        if url.contains("GetOwnedGames") {
            return Some(json!({"response": {"game_count": 3, "games": [
                {"appid": 570, "playtime_forever": 60_000, "playtime_2weeks": 420, "rtime_last_played": NOW - DAY},
                {"appid": 730, "playtime_forever": 6_000, "playtime_2weeks": 0, "rtime_last_played": NOW - 2 * DAY},
                {"appid": 440, "playtime_forever": 60, "rtime_last_played": NOW - 300 * DAY}
            ]}}));
        }
        None
    }
}

impl Transport for FakeSteam {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, String> {
        self.calls.set(self.calls.get() + 1);
        Ok(match self.body(url, query) {
            Some(body) => HttpResponse {
                status: 200,
                retry_after: None,
                body: serde_json::to_vec(&body).map_err(|e| e.to_string())?,
            },
            None => HttpResponse {
                status: 404,
                retry_after: None,
                body: Vec::new(),
            },
        })
    }
}

fn config() -> ClientConfig {
    ClientConfig {
        max_retries: 1,
        backoff_base: Duration::from_millis(1),
        backoff_cap: Duration::from_millis(2),
        min_interval_web: Duration::ZERO,
        min_interval_store: Duration::ZERO,
        ..ClientConfig::default()
    }
}

fn appid(n: u32) -> AppId {
    AppId::new(n).unwrap()
}

fn steam() -> SteamId {
    "76561197960287930".parse().unwrap()
}

fn run_full_pipeline(store: &FsStore) -> Vec<u8> {
    let fake = FakeSteam::default();
    let mut client = SteamClient::with_transport(
        Some("secret".to_string()),
        config(),
        &fake,
        Some(store.clone()),
    );
    let locale = Locale::default();

    let games = GameSignalsPipeline::new(store, locale.clone()).ttl_seconds(3600);
    for id in [570, 730] {
        games.refresh(&mut client, appid(id), NOW).unwrap();
    }

    let users = UserBehaviorPipeline::new(store, BehaviorSettings::default());
    users.fetch_owned_games(&mut client, &steam()).unwrap();
    let snapshot = users.snapshot(&steam(), NOW).unwrap();

    let assembler = ContextBundleAssembler::new(store);
    let bundle = assembler
        .assemble(&steam(), &snapshot.behavior.context_anchor_appids, &locale, NOW)
        .unwrap();
    let key = assembler.write(&bundle).unwrap();
    store.load_bytes(&key).unwrap().unwrap()
}

#[test]
fn refresh_writes_all_three_tiers() {
    let store = MemoryStore::new();
    let fake = FakeSteam::default();
    let mut client =
        SteamClient::with_transport(Some("secret".to_string()), config(), &fake, Some(store.clone()));
    let locale = Locale::default();

    let outcome = GameSignalsPipeline::new(&store, locale.clone())
        .ttl_seconds(3600)
        .refresh(&mut client, appid(570), NOW)
        .unwrap();
    assert_eq!(outcome, RefreshOutcome::Rebuilt { expires_at: NOW + 3600 });
    assert_eq!(fake.calls.get(), 4);

    assert_eq!(
        store.keys(),
        vec![
            "interim/game_signals/570__cc=us__lang=en.json".to_string(),
            "processed/game_bundles/570__cc=us__lang=en.json".to_string(),
            "raw/appdetails/570__cc=us__lang=en.json".to_string(),
            "raw/appreviews_summary/570.json".to_string(),
            "raw/news/570.json".to_string(),
            "raw/schema/570.json".to_string(),
        ]
    );

    let interim: InterimGameSignals = store
        .load(&CacheKey::game_signals(appid(570), &locale))
        .unwrap()
        .unwrap();
    assert_eq!(interim.reviews.total_reviews, 10_000);
    assert_eq!(interim.schema.achievements_total, Some(2));
}

#[test]
fn fresh_bundles_are_skipped_unless_forced() {
    let store = MemoryStore::new();
    let fake = FakeSteam::default();
    let mut client =
        SteamClient::with_transport(Some("secret".to_string()), config(), &fake, Some(store.clone()));
    let pipeline = GameSignalsPipeline::new(&store, Locale::default()).ttl_seconds(3600);

    pipeline.refresh(&mut client, appid(570), NOW).unwrap();
    assert_eq!(
        pipeline.refresh(&mut client, appid(570), NOW + 60).unwrap(),
        RefreshOutcome::Fresh
    );
    assert_eq!(fake.calls.get(), 4);

    let rebuilt = pipeline.refresh(&mut client, appid(570), NOW + 3601).unwrap();
    assert_eq!(rebuilt, RefreshOutcome::Rebuilt { expires_at: NOW + 3601 + 3600 });
    assert_eq!(fake.calls.get(), 8);

    let forced = GameSignalsPipeline::new(&store, Locale::default())
        .ttl_seconds(3600)
        .force(true)
        .refresh(&mut client, appid(570), NOW + 3602)
        .unwrap();
    assert!(matches!(forced, RefreshOutcome::Rebuilt { .. }));
    assert_eq!(fake.calls.get(), 12);
}

#[test]
fn failed_fetch_writes_no_derived_records() {
    let store = MemoryStore::new();
    let fake = FakeSteam {
        broken_schema: Some(730),
        ..FakeSteam::default()
    };
    let mut client =
        SteamClient::with_transport(Some("secret".to_string()), config(), &fake, Some(store.clone()));
    let locale = Locale::default();
    let pipeline = GameSignalsPipeline::new(&store, locale.clone());

    let err = pipeline.refresh(&mut client, appid(730), NOW).unwrap_err();
    assert!(matches!(err, PipelineError::Client(_)), "{err:?}");

    assert!(!store.contains(&CacheKey::game_signals(appid(730), &locale)).unwrap());
    assert!(!store.contains(&CacheKey::game_bundle(appid(730), &locale)).unwrap());
}

#[test]
fn missing_api_key_fails_before_any_request() {
    let store = MemoryStore::new();
    let fake = FakeSteam::default();
    let mut client = SteamClient::with_transport(None, config(), &fake, Some(store.clone()));
    let pipeline = GameSignalsPipeline::new(&store, Locale::default());

    let err = pipeline.refresh(&mut client, appid(570), NOW).unwrap_err();
    match err {
        PipelineError::Client(ClientError::MissingApiKey { endpoint }) => {
            assert_eq!(endpoint, "ISteamUserStats/GetSchemaForGame")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(pipeline.fetch_raw(&mut client, appid(730)).is_err());

    assert_eq!(fake.calls.get(), 0);
    assert!(store.keys().is_empty());
}

#[test]
fn interim_requires_all_raw_inputs() {
    let store = MemoryStore::new();
    let pipeline = GameSignalsPipeline::new(&store, Locale::default());

    let err = pipeline.build_interim(appid(570), NOW).unwrap_err();
    match err {
        PipelineError::MissingRaw(key) => assert_eq!(key, "raw/appdetails/570__cc=us__lang=en.json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn snapshot_without_raw_owned_games_fails() {
    let store = MemoryStore::new();
    let users = UserBehaviorPipeline::new(&store, BehaviorSettings::default());

    assert!(!users.has_raw(&steam()).unwrap());
    let err = users.snapshot(&steam(), NOW).unwrap_err();
    assert!(matches!(err, PipelineError::MissingRaw(_)));
    assert!(store.is_empty());
}

#[test]
fn snapshot_writes_interim_table_and_behavior() {
    let store = MemoryStore::new();
    store
        .store(
            &CacheKey::new(Collection::OwnedGames, steam()),
            &FakeSteam::default().body("x/GetOwnedGames/v0001/", &[]).unwrap(),
        )
        .unwrap();
    let users = UserBehaviorPipeline::new(&store, BehaviorSettings::default());

    let snapshot = users.snapshot(&steam(), NOW).unwrap();
    assert_eq!(snapshot.behavior.activity_state, ActivityState::Active);
    assert_eq!(snapshot.behavior.recent_2weeks_hours, 7.0);
    assert_eq!(snapshot.behavior.context_anchor_appids, vec![appid(570), appid(730)]);
    assert!(store.contains(&CacheKey::user_games(&steam())).unwrap());
    assert!(store.contains(&CacheKey::user_behavior(&steam())).unwrap());
}

#[test]
fn end_to_end_bundle_ranks_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());
    let bytes = run_full_pipeline(&store);

    let bundle: game_context_core::types::ContextBundle = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(bundle.games.len(), 2);
    assert!(bundle.meta.missing_appids.is_empty());
    assert_eq!(validate(&bundle), Vec::<String>::new());

    let top = TopKSelector::default().select(&bundle, 1);
    assert_eq!(top.top_k.len(), 1);
    assert_eq!(top.top_k[0].appid, appid(570));
    assert!(top.top_k[0].reason.starts_with("[570] score="));
}

#[test]
fn identical_inputs_produce_identical_bundle_bytes() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let a = run_full_pipeline(&FsStore::new(dir_a.path()));
    let b = run_full_pipeline(&FsStore::new(dir_b.path()));
    assert_eq!(a, b);
}
