//! Owned-games list → activity state + anchor games.

pub mod activity;
pub mod anchors;
pub mod table;

pub use activity::{compute_behavior_context, BehaviorSettings};
pub use anchors::{select_anchor_appids, AnchorSettings};
pub use table::normalize_owned_games;

use crate::contexts::SECONDS_PER_DAY;

/// Whole days elapsed, truncated; future timestamps count as 0.
pub fn days_since(ts: i64, now: i64) -> i64 {
    ((now - ts) / SECONDS_PER_DAY).max(0)
}
