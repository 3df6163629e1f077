use serde::{Deserialize, Serialize};

/// Review-quality signal discounted by sample-size confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTrustContext {
    pub review_positive_ratio: f64,
    pub total_reviews: u64,
    pub achievements_total: Option<u64>,
    pub confidence: f64,
    pub quality_trust_score: f64,
}

/// Official news/update activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveContext {
    pub days_since_last_news: Option<i64>,
    pub recent_update_count: u64,
    pub recent_event_count: u64,
    pub liveness_signal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountContext {
    /// Signed so a corrupted bundle still deserializes and fails validation
    /// instead of failing the load.
    pub discount_percent: i64,
    pub discount_signal: f64,
}

/// The three per-game contexts computed from one interim record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContexts {
    pub quality_trust: QualityTrustContext,
    pub live: LiveContext,
    pub discount: DiscountContext,
}
