//! Orchestration of the per-game and per-user flows.
//!
//! Ordering (raw fetch, then interim, then processed) is enforced here by call
//! sequence; the components themselves are order-agnostic. A failure at any
//! step returns before the later tiers are written.

use serde_json::Value;
use thiserror::Error;

use crate::behavior::{compute_behavior_context, BehaviorSettings};
use crate::cache::{
    stored_bundle_is_fresh, CacheError, CacheKey, CacheStore, Collection, ProcessedGameBundle,
};
use crate::client::{ClientError, SteamClient, Transport, SCHEMA_ENDPOINT};
use crate::contexts::ContextParams;
use crate::signals::{InterimGameSignals, RawGameSignals};
use crate::types::behavior::{SnapshotMeta, UserBehaviorSnapshot, UserGamesTable};
use crate::types::identifiers::{AppId, Locale, SteamId};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("Missing raw record: {0}")]
    MissingRaw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Stored bundle still within TTL; nothing fetched or written.
    Fresh,
    Rebuilt { expires_at: i64 },
}

fn load_required<S: CacheStore>(store: &S, key: &CacheKey) -> Result<Value, PipelineError> {
    store
        .load::<Value>(key)?
        .ok_or_else(|| PipelineError::MissingRaw(key.to_string()))
}

/// appid → raw → interim → processed bundle, per locale.
pub struct GameSignalsPipeline<'a, S> {
    store: &'a S,
    locale: Locale,
    review_lang: String,
    ttl_seconds: i64,
    force: bool,
    params: ContextParams,
}

impl<'a, S: CacheStore> GameSignalsPipeline<'a, S> {
    pub fn new(store: &'a S, locale: Locale) -> Self {
        Self {
            store,
            locale,
            review_lang: "all".to_string(),
            ttl_seconds: 24 * 3600,
            force: false,
            params: ContextParams::default(),
        }
    }

    pub fn review_lang(mut self, lang: impl Into<String>) -> Self {
        self.review_lang = lang.into();
        self
    }

    pub fn ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Rebuild even when the stored bundle is still fresh.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn params(mut self, params: ContextParams) -> Self {
        self.params = params;
        self
    }

    /// Fetches the four raw resources for one appid. The client persists them.
    ///
    /// The schema endpoint needs an API key; without one nothing is requested.
    pub fn fetch_raw<T: Transport, C: CacheStore>(
        &self,
        client: &mut SteamClient<T, C>,
        appid: AppId,
    ) -> Result<(), PipelineError> {
        client.ensure_api_key(SCHEMA_ENDPOINT)?;
        client.app_details(appid, &self.locale)?;
        client.app_reviews_summary(appid, &self.review_lang)?;
        client.schema_for_game(appid)?;
        client.news_for_app(appid)?;
        Ok(())
    }

    pub fn load_raw(&self, appid: AppId) -> Result<RawGameSignals, PipelineError> {
        Ok(RawGameSignals {
            appdetails: load_required(
                self.store,
                &CacheKey::new(Collection::AppDetails, appid).with_locale(&self.locale),
            )?,
            appreviews_summary: load_required(
                self.store,
                &CacheKey::new(Collection::AppReviewsSummary, appid),
            )?,
            schema: load_required(self.store, &CacheKey::new(Collection::Schema, appid))?,
            news: load_required(self.store, &CacheKey::new(Collection::News, appid))?,
        })
    }

    /// Normalizes stored raw payloads and replaces the interim record.
    pub fn build_interim(&self, appid: AppId, now: i64) -> Result<InterimGameSignals, PipelineError> {
        let raw = self.load_raw(appid)?;
        let interim = InterimGameSignals::from_raw(appid, &raw, &self.locale, now);

        let key = CacheKey::game_signals(appid, &self.locale);
        let previous = self
            .store
            .load::<InterimGameSignals>(&key)
            .ok()
            .flatten()
            .map(|p| p.meta.source_version);
        match previous {
            Some(v) if v == interim.meta.source_version => {
                tracing::debug!(%appid, "raw inputs unchanged since last interim build")
            }
            _ => tracing::info!(
                %appid,
                source_version = interim.meta.source_version.as_str(),
                "interim rebuilt from new raw inputs"
            ),
        }

        self.store.store(&key, &interim)?;
        Ok(interim)
    }

    /// Computes contexts and replaces the processed bundle.
    pub fn build_bundle(
        &self,
        interim: InterimGameSignals,
        now: i64,
    ) -> Result<ProcessedGameBundle, PipelineError> {
        let appid = interim.appid;
        let bundle = ProcessedGameBundle::build_with(interim, self.ttl_seconds, now, &self.params);
        self.store
            .store(&CacheKey::game_bundle(appid, &self.locale), &bundle)?;
        Ok(bundle)
    }

    pub fn is_fresh(&self, appid: AppId, now: i64) -> bool {
        stored_bundle_is_fresh(self.store, &CacheKey::game_bundle(appid, &self.locale), now)
    }

    /// Full refresh for one appid unless the stored bundle is fresh and
    /// `force` is off. Raw is always refetched on rebuild.
    pub fn refresh<T: Transport, C: CacheStore>(
        &self,
        client: &mut SteamClient<T, C>,
        appid: AppId,
        now: i64,
    ) -> Result<RefreshOutcome, PipelineError> {
        if !self.force && self.is_fresh(appid, now) {
            tracing::info!(%appid, "bundle fresh; skipping");
            return Ok(RefreshOutcome::Fresh);
        }

        self.fetch_raw(client, appid)?;
        let interim = self.build_interim(appid, now)?;
        let bundle = self.build_bundle(interim, now)?;
        tracing::info!(%appid, expires_at = bundle.meta.expires_at, "bundle rebuilt");
        Ok(RefreshOutcome::Rebuilt {
            expires_at: bundle.meta.expires_at,
        })
    }
}

/// steam id → raw owned games → interim table → processed behavior snapshot.
pub struct UserBehaviorPipeline<'a, S> {
    store: &'a S,
    settings: BehaviorSettings,
}

impl<'a, S: CacheStore> UserBehaviorPipeline<'a, S> {
    pub fn new(store: &'a S, settings: BehaviorSettings) -> Self {
        Self { store, settings }
    }

    pub fn has_raw(&self, steam_id: &SteamId) -> Result<bool, PipelineError> {
        Ok(self
            .store
            .contains(&CacheKey::new(Collection::OwnedGames, steam_id))?)
    }

    pub fn fetch_owned_games<T: Transport, C: CacheStore>(
        &self,
        client: &mut SteamClient<T, C>,
        steam_id: &SteamId,
    ) -> Result<(), PipelineError> {
        client.owned_games(steam_id)?;
        Ok(())
    }

    /// Requires the raw owned-games record to be present.
    pub fn snapshot(
        &self,
        steam_id: &SteamId,
        now: i64,
    ) -> Result<UserBehaviorSnapshot, PipelineError> {
        let raw = load_required(self.store, &CacheKey::new(Collection::OwnedGames, steam_id))?;

        let table = UserGamesTable::from_owned_games(steam_id, &raw, now);
        self.store.store(&CacheKey::user_games(steam_id), &table)?;

        let behavior = compute_behavior_context(&table.rows, now, &self.settings);
        let snapshot = UserBehaviorSnapshot {
            meta: SnapshotMeta {
                steam_id: steam_id.clone(),
                generated_at: now,
            },
            steam_id: steam_id.clone(),
            behavior,
        };
        self.store
            .store(&CacheKey::user_behavior(steam_id), &snapshot)?;
        tracing::info!(
            %steam_id,
            rows = table.rows.len(),
            state = %snapshot.behavior.activity_state,
            "behavior snapshot written"
        );
        Ok(snapshot)
    }
}
