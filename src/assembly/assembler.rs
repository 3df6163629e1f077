use std::collections::BTreeMap;

use crate::assembly::AssemblyError;
use crate::cache::{load_bundle, CacheKey, CacheStore};
use crate::types::behavior::UserBehaviorSnapshot;
use crate::types::context_bundle::{ContextBundle, ContextBundleMeta, GameEntry, UserSection};
use crate::types::identifiers::{AppId, Locale, SteamId};

/// Merges one user's processed behavior with processed per-game bundles.
///
/// Read-only over the processed tier. Missing game bundles are recorded and
/// skipped; expired ones are recorded and still included so the consumer
/// decides what to do with stale data.
pub struct ContextBundleAssembler<'a, S> {
    store: &'a S,
    include_game_bundle_meta: bool,
}

impl<'a, S: CacheStore> ContextBundleAssembler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            include_game_bundle_meta: true,
        }
    }

    /// Whether each game entry carries its `_bundle_meta` (TTL debugging).
    pub fn include_game_bundle_meta(mut self, include: bool) -> Self {
        self.include_game_bundle_meta = include;
        self
    }

    pub fn load_behavior(&self, steam_id: &SteamId) -> Result<UserBehaviorSnapshot, AssemblyError> {
        self.store
            .load(&CacheKey::user_behavior(steam_id))?
            .ok_or_else(|| AssemblyError::MissingBehavior(steam_id.clone()))
    }

    pub fn assemble(
        &self,
        steam_id: &SteamId,
        appids: &[AppId],
        locale: &Locale,
        now: i64,
    ) -> Result<ContextBundle, AssemblyError> {
        let snapshot = self.load_behavior(steam_id)?;

        let mut missing_appids = Vec::new();
        let mut stale_appids = Vec::new();
        let mut games = BTreeMap::new();

        for &appid in appids {
            let key = CacheKey::game_bundle(appid, locale);
            let Some(bundle) = load_bundle(self.store, &key)? else {
                tracing::info!(%appid, "processed bundle missing");
                missing_appids.push(appid);
                continue;
            };

            if bundle.meta.is_expired(now) {
                tracing::info!(%appid, expires_at = bundle.meta.expires_at, "processed bundle stale");
                stale_appids.push(appid);
            }

            let contexts = bundle.contexts;
            games.insert(
                appid,
                GameEntry {
                    quality_trust: contexts.quality_trust,
                    live: contexts.live,
                    discount: contexts.discount,
                    bundle_meta: self.include_game_bundle_meta.then_some(bundle.meta),
                },
            );
        }

        Ok(ContextBundle {
            meta: ContextBundleMeta {
                steam_id: steam_id.clone(),
                generated_at: now,
                cc: locale.cc.clone(),
                lang: locale.lang.clone(),
                requested_appids: appids.to_vec(),
                missing_appids,
                stale_appids,
            },
            user_id: steam_id.clone(),
            user: UserSection {
                behavior: snapshot.behavior,
            },
            games,
        })
    }

    /// Writes to `processed/context_bundles/{steamid}__cc=..__lang=...json`.
    pub fn write(&self, bundle: &ContextBundle) -> Result<CacheKey, AssemblyError> {
        let locale = Locale::new(bundle.meta.cc.clone(), bundle.meta.lang.clone());
        let key = CacheKey::context_bundle(&bundle.meta.steam_id, &locale);
        self.store.store(&key, bundle)?;
        Ok(key)
    }
}
