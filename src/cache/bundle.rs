use serde::{Deserialize, Serialize};

use crate::cache::keys::CacheKey;
use crate::cache::store::{CacheError, CacheStore};
use crate::contexts::ContextParams;
use crate::signals::InterimGameSignals;
use crate::types::game_context::GameContexts;
use crate::types::identifiers::AppId;

/// TTL envelope of a processed game bundle. `expires_at` is the only
/// staleness authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMeta {
    pub appid: AppId,
    pub generated_at: i64,
    pub ttl_seconds: i64,
    pub expires_at: i64,
}

impl BundleMeta {
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at > now
    }

    /// Expired per the assembler's rule: a non-positive `expires_at` is
    /// treated as "unknown", never as stale.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at > 0 && self.expires_at <= now
    }
}

/// Processed tier record: `processed/game_bundles/{appid}__cc=..__lang=...json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedGameBundle {
    pub meta: BundleMeta,
    pub interim: InterimGameSignals,
    pub contexts: GameContexts,
}

impl ProcessedGameBundle {
    pub fn build(interim: InterimGameSignals, ttl_seconds: i64, now: i64) -> Self {
        Self::build_with(interim, ttl_seconds, now, &ContextParams::default())
    }

    pub fn build_with(
        interim: InterimGameSignals,
        ttl_seconds: i64,
        now: i64,
        params: &ContextParams,
    ) -> Self {
        let contexts = params.compute(&interim, now);
        let ttl_seconds = ttl_seconds.max(0);
        ProcessedGameBundle {
            meta: BundleMeta {
                appid: interim.appid,
                generated_at: now,
                ttl_seconds,
                expires_at: now.saturating_add(ttl_seconds),
            },
            interim,
            contexts,
        }
    }

    pub fn is_fresh(&self, now: i64) -> bool {
        self.meta.is_fresh(now)
    }
}

/// Freshness of a stored bundle. Absent or unreadable counts as not fresh so
/// the caller rebuilds it.
pub fn stored_bundle_is_fresh<S: CacheStore>(store: &S, key: &CacheKey, now: i64) -> bool {
    match store.load::<ProcessedGameBundle>(key) {
        Ok(Some(bundle)) => bundle.is_fresh(now),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "unreadable processed bundle; treating as stale");
            false
        }
    }
}

pub fn load_bundle<S: CacheStore>(
    store: &S,
    key: &CacheKey,
) -> Result<Option<ProcessedGameBundle>, CacheError> {
    store.load(key)
}
