use crate::contexts::clamp01;
use crate::signals::InterimGameSignals;
use crate::types::game_context::QualityTrustContext;

pub const DEFAULT_CONFIDENCE_MAX_REVIEWS: u64 = 10_000;

/// Review count at which the recommendation sub-signal saturates.
const RECOMMENDATIONS_SATURATION: f64 = 1_000_000.0;
const ACHIEVEMENTS_SATURATION: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QualityTrustParams {
    pub confidence_max_reviews: u64,
    pub w_ratio: f64,
    pub w_achievements: f64,
    pub w_media: f64,
    pub w_recommendations: f64,
}

impl Default for QualityTrustParams {
    fn default() -> Self {
        Self {
            confidence_max_reviews: DEFAULT_CONFIDENCE_MAX_REVIEWS,
            w_ratio: 0.65,
            w_achievements: 0.15,
            w_media: 0.10,
            w_recommendations: 0.10,
        }
    }
}

/// `min(1, log10(n + 1) / log10(max_reviews))`: 0 at no reviews, 1 at
/// `max_reviews` and beyond, nondecreasing in between.
pub fn confidence(total_reviews: u64, max_reviews: u64) -> f64 {
    let denom = (max_reviews.max(1) as f64).log10();
    if denom <= 0.0 {
        return 0.0;
    }
    ((total_reviews as f64 + 1.0).log10() / denom).min(1.0)
}

pub fn compute_quality_trust(
    interim: &InterimGameSignals,
    params: &QualityTrustParams,
) -> QualityTrustContext {
    let ratio = clamp01(interim.reviews.review_positive_ratio);
    let total_reviews = interim.reviews.total_reviews.max(0) as u64;

    // Nullable in the output; scored as zero.
    let achievements_total = interim.schema.achievements_total.map(|n| n.max(0) as u64);
    let achievements_for_score = achievements_total.unwrap_or(0) as f64;

    let screenshots = interim.appdetails.screenshots_count.max(0) as f64;
    let movies = interim.appdetails.movies_count.max(0);
    let recommendations = interim.appdetails.recommendations_total.max(0) as f64;

    let confidence = confidence(total_reviews, params.confidence_max_reviews);

    let achievements_norm = (achievements_for_score / ACHIEVEMENTS_SATURATION).min(1.0);
    let mut media_norm = if movies > 0 { 0.4 } else { 0.0 };
    media_norm += (screenshots / 20.0 * 0.6).min(0.6);
    let recommendations_norm =
        ((recommendations + 1.0).log10() / RECOMMENDATIONS_SATURATION.log10()).min(1.0);

    let base = params.w_ratio * ratio
        + params.w_achievements * achievements_norm
        + params.w_media * media_norm
        + params.w_recommendations * recommendations_norm;

    QualityTrustContext {
        review_positive_ratio: ratio,
        total_reviews,
        achievements_total,
        confidence: clamp01(confidence),
        quality_trust_score: clamp01(base * confidence),
    }
}
