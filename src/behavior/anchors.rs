use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::behavior::days_since;
use crate::types::behavior::OwnedGameRow;
use crate::types::identifiers::AppId;

/// Anchor selection knobs. The recency window and loyalty floor here are
/// separate from the activity-state thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSettings {
    pub max_anchors: usize,
    /// Secondary candidates must have been played within this many days.
    pub recency_days: i64,
    /// ...and have at least this much lifetime playtime.
    pub loyalty_floor_hours: f64,
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            max_anchors: 10,
            recency_days: 3,
            loyalty_floor_hours: 80.0,
        }
    }
}

/// Games representing the user's current play focus.
///
/// Primary: recent (2-week) playtime, hours desc then appid asc.
/// Secondary: no recent playtime but played within `recency_days` with at
/// least `loyalty_floor_hours` lifetime, ordered (days asc, lifetime desc,
/// appid asc). Primary precedes secondary; the result is deduplicated and
/// capped at `max_anchors`.
pub fn select_anchor_appids(
    rows: &[OwnedGameRow],
    now: i64,
    settings: &AnchorSettings,
) -> Vec<AppId> {
    let mut primary: Vec<(f64, AppId)> = Vec::new();
    let mut secondary: Vec<(i64, f64, AppId)> = Vec::new();

    for row in rows {
        if row.playtime_2weeks_hours > 0.0 {
            primary.push((row.playtime_2weeks_hours, row.appid));
            continue;
        }
        if let Some(ts) = row.rtime_last_played_ts.filter(|ts| *ts > 0) {
            let days = days_since(ts, now);
            if days <= settings.recency_days && row.playtime_forever_hours >= settings.loyalty_floor_hours {
                secondary.push((days, row.playtime_forever_hours, row.appid));
            }
        }
    }

    primary.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    secondary.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut seen = BTreeSet::new();
    primary
        .into_iter()
        .map(|(_, appid)| appid)
        .chain(secondary.into_iter().map(|(_, _, appid)| appid))
        .filter(|appid| seen.insert(*appid))
        .take(settings.max_anchors)
        .collect()
}
