use crate::contexts::{clamp01, SECONDS_PER_DAY};
use crate::signals::{InterimGameSignals, NewsItem};
use crate::types::game_context::LiveContext;

#[derive(Debug, Clone, PartialEq)]
pub struct LiveParams {
    pub window_days: i64,
    pub tau_days: f64,
    pub alpha: f64,
}

impl Default for LiveParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            tau_days: 30.0,
            alpha: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsKind {
    Update,
    Event,
    Other,
}

/// Feed labels are free-form, so match on lower-cased substrings.
pub fn classify_feedlabel(feedlabel: Option<&str>) -> NewsKind {
    let label = feedlabel.unwrap_or_default().to_lowercase();
    if label.contains("update") || label.contains("patch") {
        NewsKind::Update
    } else if label.contains("event") || label.contains("sale") {
        NewsKind::Event
    } else {
        NewsKind::Other
    }
}

pub fn compute_live(interim: &InterimGameSignals, now: i64, params: &LiveParams) -> LiveContext {
    let items = &interim.news.newsitems;

    let Some(last_date) = items.iter().map(|it| it.date).filter(|d| *d > 0).max() else {
        return LiveContext {
            days_since_last_news: None,
            recent_update_count: 0,
            recent_event_count: 0,
            liveness_signal: 0.0,
        };
    };

    let days_since_last = (now - last_date).max(0) / SECONDS_PER_DAY;

    let window_start = now - params.window_days.max(0) * SECONDS_PER_DAY;
    let in_window = |it: &&NewsItem| it.date > 0 && it.date >= window_start;

    let mut update_count = 0u64;
    let mut event_count = 0u64;
    for item in items.iter().filter(in_window) {
        match classify_feedlabel(item.feedlabel.as_deref()) {
            NewsKind::Update => update_count += 1,
            NewsKind::Event => event_count += 1,
            NewsKind::Other => {}
        }
    }

    let recency = (-(days_since_last as f64) / params.tau_days.max(1e-6)).exp();
    let activity = params.alpha * (update_count + event_count) as f64;

    LiveContext {
        days_since_last_news: Some(days_since_last),
        recent_update_count: update_count,
        recent_event_count: event_count,
        liveness_signal: clamp01(recency + activity),
    }
}
