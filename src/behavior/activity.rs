use crate::behavior::anchors::{select_anchor_appids, AnchorSettings};
use crate::behavior::days_since;
use crate::types::behavior::{ActivityDebug, ActivityState, OwnedGameRow, UserBehaviorContext};

/// Settings for one behavior evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSettings {
    /// Above this many hours in the last two weeks the user is `active`.
    pub active_threshold_hours: f64,
    /// Last played within this many days counts as `cooling_off`.
    pub cooling_off_days: i64,
    pub include_anchors: bool,
    pub anchors: AnchorSettings,
    pub include_debug: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            active_threshold_hours: 5.0,
            cooling_off_days: 14,
            include_anchors: true,
            anchors: AnchorSettings::default(),
            include_debug: false,
        }
    }
}

/// Aggregate owned-game rows into a behavior context.
///
/// The state is decided once from the aggregates:
/// 1. `active` iff 2-week hours exceed the threshold;
/// 2. else `cooling_off` if the most recent known play is within
///    `cooling_off_days`, or no row has a timestamp yet 2-week hours are
///    non-zero (privacy-limited accounts still report 2-week playtime);
/// 3. else `dormant`.
pub fn compute_behavior_context(
    rows: &[OwnedGameRow],
    now: i64,
    settings: &BehaviorSettings,
) -> UserBehaviorContext {
    let recent_2weeks_hours: f64 = rows.iter().map(|r| r.playtime_2weeks_hours).sum();
    let total_lifetime_hours: f64 = rows.iter().map(|r| r.playtime_forever_hours).sum();

    let recent_nonzero: Vec<f64> = rows
        .iter()
        .map(|r| r.playtime_2weeks_hours)
        .filter(|h| *h > 0.0)
        .collect();
    let avg_recent_play_hours = if recent_nonzero.is_empty() {
        0.0
    } else {
        recent_nonzero.iter().sum::<f64>() / recent_nonzero.len() as f64
    };

    let days_since_last_played = rows
        .iter()
        .filter_map(|r| r.rtime_last_played_ts)
        .filter(|ts| *ts > 0)
        .max()
        .map(|ts| days_since(ts, now));

    let inferred_recent = days_since_last_played.is_none() && recent_2weeks_hours > 0.0;

    let activity_state = if recent_2weeks_hours > settings.active_threshold_hours {
        ActivityState::Active
    } else if days_since_last_played.is_some_and(|d| d <= settings.cooling_off_days) || inferred_recent {
        ActivityState::CoolingOff
    } else {
        ActivityState::Dormant
    };

    let context_anchor_appids = if settings.include_anchors {
        select_anchor_appids(rows, now, &settings.anchors)
    } else {
        Vec::new()
    };

    let debug = settings.include_debug.then(|| ActivityDebug {
        now_ts: now,
        active_threshold_hours: settings.active_threshold_hours,
        cooling_off_days: settings.cooling_off_days,
        days_since_last_played,
        inferred_recent_by_playtime_2weeks: inferred_recent,
        anchors_max: settings.anchors.max_anchors,
    });

    tracing::debug!(
        state = %activity_state,
        recent_2weeks_hours,
        ?days_since_last_played,
        inferred_recent,
        anchors = context_anchor_appids.len(),
        "behavior evaluated"
    );

    UserBehaviorContext {
        recent_2weeks_hours,
        total_lifetime_hours,
        avg_recent_play_hours,
        activity_state,
        context_anchor_appids,
        debug,
    }
}
