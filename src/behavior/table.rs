use serde_json::Value;

use crate::signals::extract::{as_int, field, path};
use crate::types::behavior::{OwnedGameRow, SnapshotMeta, UserGamesTable};
use crate::types::identifiers::{AppId, SteamId};

fn minutes_to_hours(minutes: Option<&Value>) -> f64 {
    as_int(minutes).unwrap_or(0) as f64 / 60.0
}

/// Rows from a raw `GetOwnedGames` payload (`{"response": {"games": [..]}}`).
///
/// Minutes become hours; a `rtime_last_played` of 0 or absent becomes `None`.
/// Rows without a positive appid are dropped.
pub fn normalize_owned_games(raw: &Value) -> Vec<OwnedGameRow> {
    let Some(games) = path(raw, &["response", "games"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    games
        .iter()
        .filter(|g| g.is_object())
        .filter_map(|g| {
            let appid = as_int(field(g, "appid"))
                .and_then(|id| u32::try_from(id).ok())
                .and_then(AppId::new)?;
            let rtime = as_int(field(g, "rtime_last_played")).unwrap_or(0);
            Some(OwnedGameRow {
                appid,
                playtime_forever_hours: minutes_to_hours(field(g, "playtime_forever")),
                playtime_2weeks_hours: minutes_to_hours(field(g, "playtime_2weeks")),
                rtime_last_played_ts: (rtime > 0).then_some(rtime),
            })
        })
        .collect()
}

impl UserGamesTable {
    pub fn from_owned_games(steam_id: &SteamId, raw: &Value, now: i64) -> Self {
        UserGamesTable {
            meta: SnapshotMeta {
                steam_id: steam_id.clone(),
                generated_at: now,
            },
            steam_id: steam_id.clone(),
            rows: normalize_owned_games(raw),
        }
    }
}
