use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{AppId, SteamId};

/// Three-way play activity classification.
///
/// Unrecognised values read back from disk are kept verbatim in `Other` so a
/// bundle carrying them can still be loaded and flagged by validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityState {
    Active,
    CoolingOff,
    Dormant,
    Other(String),
}

impl ActivityState {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityState::Active => "active",
            ActivityState::CoolingOff => "cooling_off",
            ActivityState::Dormant => "dormant",
            ActivityState::Other(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActivityState::Other(_))
    }
}

impl From<String> for ActivityState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => ActivityState::Active,
            "cooling_off" => ActivityState::CoolingOff,
            "dormant" => ActivityState::Dormant,
            _ => ActivityState::Other(s),
        }
    }
}

impl From<ActivityState> for String {
    fn from(state: ActivityState) -> Self {
        match state {
            ActivityState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One owned game after unit normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedGameRow {
    pub appid: AppId,
    pub playtime_forever_hours: f64,
    pub playtime_2weeks_hours: f64,
    /// `None` means the timestamp is unknown, not that the game was never played.
    pub rtime_last_played_ts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub steam_id: SteamId,
    pub generated_at: i64,
}

/// Interim tier record: `interim/user_games/{steamid}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGamesTable {
    pub meta: SnapshotMeta,
    pub steam_id: SteamId,
    pub rows: Vec<OwnedGameRow>,
}

/// Evidence behind an activity classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDebug {
    pub now_ts: i64,
    pub active_threshold_hours: f64,
    pub cooling_off_days: i64,
    pub days_since_last_played: Option<i64>,
    pub inferred_recent_by_playtime_2weeks: bool,
    pub anchors_max: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBehaviorContext {
    pub recent_2weeks_hours: f64,
    pub total_lifetime_hours: f64,
    pub avg_recent_play_hours: f64,
    pub activity_state: ActivityState,
    #[serde(default)]
    pub context_anchor_appids: Vec<AppId>,
    #[serde(rename = "_debug", default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<ActivityDebug>,
}

/// Processed tier record: `processed/user_behavior/{steamid}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBehaviorSnapshot {
    pub meta: SnapshotMeta,
    pub steam_id: SteamId,
    pub behavior: UserBehaviorContext,
}
