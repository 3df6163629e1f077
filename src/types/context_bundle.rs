use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::BundleMeta;
use crate::types::behavior::UserBehaviorContext;
use crate::types::game_context::{DiscountContext, LiveContext, QualityTrustContext};
use crate::types::identifiers::{AppId, SteamId};

/// Describes how a context bundle was assembled and what it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundleMeta {
    pub steam_id: SteamId,
    pub generated_at: i64,
    pub cc: String,
    pub lang: String,
    pub requested_appids: Vec<AppId>,
    pub missing_appids: Vec<AppId>,
    pub stale_appids: Vec<AppId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSection {
    pub behavior: UserBehaviorContext,
}

/// Per-game entry. Contexts are flattened out of the processed bundle so a
/// consumer never needs the interim record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub quality_trust: QualityTrustContext,
    pub live: LiveContext,
    pub discount: DiscountContext,
    #[serde(rename = "_bundle_meta", default, skip_serializing_if = "Option::is_none")]
    pub bundle_meta: Option<BundleMeta>,
}

/// One user's behavior merged with N per-game contexts.
///
/// `games` is keyed by appid; a `BTreeMap` keeps key order numeric and stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub meta: ContextBundleMeta,
    pub user_id: SteamId,
    pub user: UserSection,
    pub games: BTreeMap<AppId, GameEntry>,
}
