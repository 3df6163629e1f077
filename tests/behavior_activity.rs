use game_context_core::behavior::{
    compute_behavior_context, select_anchor_appids, AnchorSettings, BehaviorSettings,
};
use game_context_core::types::{ActivityState, AppId, OwnedGameRow};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

fn appid(n: u32) -> AppId {
    AppId::new(n).unwrap()
}

fn row(id: u32, forever_h: f64, two_weeks_h: f64, last_played: Option<i64>) -> OwnedGameRow {
    OwnedGameRow {
        appid: appid(id),
        playtime_forever_hours: forever_h,
        playtime_2weeks_hours: two_weeks_h,
        rtime_last_played_ts: last_played,
    }
}

fn state(rows: &[OwnedGameRow]) -> ActivityState {
    compute_behavior_context(rows, NOW, &BehaviorSettings::default()).activity_state
}

#[test]
fn six_recent_hours_is_active() {
    let rows = [row(10, 100.0, 6.0, Some(NOW - DAY))];
    assert_eq!(state(&rows), ActivityState::Active);
}

#[test]
fn threshold_is_exclusive() {
    let rows = [row(10, 100.0, 5.0, Some(NOW - 40 * DAY))];
    assert_eq!(state(&rows), ActivityState::Dormant);
}

#[test]
fn ten_days_idle_is_cooling_off() {
    let rows = [row(10, 100.0, 0.0, Some(NOW - 10 * DAY))];
    assert_eq!(state(&rows), ActivityState::CoolingOff);
}

#[test]
fn cooling_off_boundary_is_inclusive() {
    let rows = [row(10, 100.0, 0.0, Some(NOW - 14 * DAY))];
    assert_eq!(state(&rows), ActivityState::CoolingOff);

    let rows = [row(10, 100.0, 0.0, Some(NOW - 15 * DAY))];
    assert_eq!(state(&rows), ActivityState::Dormant);
}

#[test]
fn thirty_days_idle_is_dormant() {
    let rows = [row(10, 100.0, 0.0, Some(NOW - 30 * DAY))];
    assert_eq!(state(&rows), ActivityState::Dormant);
}

#[test]
fn recent_playtime_without_timestamps_is_cooling_off() {
    // Privacy-limited profiles omit rtime_last_played.
    let rows = [row(10, 100.0, 2.0, None), row(20, 5.0, 0.0, None)];
    let ctx = compute_behavior_context(
        &rows,
        NOW,
        &BehaviorSettings {
            include_debug: true,
            ..BehaviorSettings::default()
        },
    );
    assert_eq!(ctx.activity_state, ActivityState::CoolingOff);

    let debug = ctx.debug.unwrap();
    assert!(debug.inferred_recent_by_playtime_2weeks);
    assert_eq!(debug.days_since_last_played, None);
    assert_eq!(debug.now_ts, NOW);
}

#[test]
fn empty_library_is_dormant_with_zero_aggregates() {
    let ctx = compute_behavior_context(&[], NOW, &BehaviorSettings::default());
    assert_eq!(ctx.activity_state, ActivityState::Dormant);
    assert_eq!(ctx.recent_2weeks_hours, 0.0);
    assert_eq!(ctx.total_lifetime_hours, 0.0);
    assert_eq!(ctx.avg_recent_play_hours, 0.0);
    assert!(ctx.context_anchor_appids.is_empty());
    assert!(ctx.debug.is_none());
}

#[test]
fn aggregates_average_only_games_with_recent_play() {
    let rows = [
        row(10, 50.0, 3.0, Some(NOW - DAY)),
        row(20, 20.0, 1.0, Some(NOW - DAY)),
        row(30, 10.0, 0.0, Some(NOW - 100 * DAY)),
    ];
    let ctx = compute_behavior_context(&rows, NOW, &BehaviorSettings::default());
    assert_eq!(ctx.recent_2weeks_hours, 4.0);
    assert_eq!(ctx.total_lifetime_hours, 80.0);
    assert_eq!(ctx.avg_recent_play_hours, 2.0);
}

#[test]
fn thresholds_are_configurable() {
    let rows = [row(10, 100.0, 3.0, Some(NOW - 20 * DAY))];
    let settings = BehaviorSettings {
        active_threshold_hours: 2.0,
        ..BehaviorSettings::default()
    };
    assert_eq!(
        compute_behavior_context(&rows, NOW, &settings).activity_state,
        ActivityState::Active
    );

    let rows = [row(10, 100.0, 0.0, Some(NOW - 20 * DAY))];
    let settings = BehaviorSettings {
        cooling_off_days: 30,
        ..BehaviorSettings::default()
    };
    assert_eq!(
        compute_behavior_context(&rows, NOW, &settings).activity_state,
        ActivityState::CoolingOff
    );
}

// Anchors

#[test]
fn equal_recent_hours_tie_break_by_appid() {
    let rows = [row(200, 10.0, 4.0, None), row(100, 10.0, 4.0, None)];
    let anchors = select_anchor_appids(&rows, NOW, &AnchorSettings::default());
    assert_eq!(anchors, vec![appid(100), appid(200)]);
}

#[test]
fn primary_anchors_precede_secondary() {
    let rows = [
        row(1, 500.0, 0.0, Some(NOW - DAY)),      // secondary
        row(2, 10.0, 1.0, Some(NOW - DAY)),       // primary, lower hours
        row(3, 10.0, 8.0, Some(NOW)),             // primary
        row(4, 900.0, 0.0, Some(NOW - 2 * DAY)),  // secondary, older
        row(5, 40.0, 0.0, Some(NOW)),             // below loyalty floor
        row(6, 900.0, 0.0, Some(NOW - 10 * DAY)), // outside recency window
        row(7, 300.0, 0.0, None),                 // never played timestamp
    ];
    let anchors = select_anchor_appids(&rows, NOW, &AnchorSettings::default());
    assert_eq!(anchors, vec![appid(3), appid(2), appid(1), appid(4)]);
}

#[test]
fn secondary_order_is_days_then_lifetime_then_appid() {
    let rows = [
        row(30, 100.0, 0.0, Some(NOW - DAY)),
        row(20, 200.0, 0.0, Some(NOW - DAY)),
        row(10, 200.0, 0.0, Some(NOW - DAY)),
        row(5, 999.0, 0.0, Some(NOW - 3 * DAY)),
    ];
    let anchors = select_anchor_appids(&rows, NOW, &AnchorSettings::default());
    assert_eq!(anchors, vec![appid(10), appid(20), appid(30), appid(5)]);
}

#[test]
fn anchors_are_capped_and_deduplicated() {
    let mut rows: Vec<OwnedGameRow> = (1..=15).map(|id| row(id, 10.0, id as f64, None)).collect();
    rows.push(row(15, 10.0, 0.5, None));

    let anchors = select_anchor_appids(
        &rows,
        NOW,
        &AnchorSettings {
            max_anchors: 4,
            ..AnchorSettings::default()
        },
    );
    assert_eq!(anchors, vec![appid(15), appid(14), appid(13), appid(12)]);

    let all = select_anchor_appids(&rows, NOW, &AnchorSettings::default());
    assert_eq!(all.len(), 10);
    let mut unique = all.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), all.len());
}

#[test]
fn anchors_can_be_disabled() {
    let rows = [row(10, 100.0, 6.0, Some(NOW))];
    let ctx = compute_behavior_context(
        &rows,
        NOW,
        &BehaviorSettings {
            include_anchors: false,
            ..BehaviorSettings::default()
        },
    );
    assert!(ctx.context_anchor_appids.is_empty());
}

#[test]
fn state_serializes_as_snake_case_string() {
    assert_eq!(serde_json::to_string(&ActivityState::CoolingOff).unwrap(), "\"cooling_off\"");
    let parsed: ActivityState = serde_json::from_str("\"sleeping\"").unwrap();
    assert_eq!(parsed, ActivityState::Other("sleeping".to_string()));
    assert!(!parsed.is_known());
}
