//! Pure functions from an interim record to bounded [0, 1] signals.

pub mod discount;
pub mod live;
pub mod quality_trust;

pub use discount::{compute_discount, discount_from_percent};
pub use live::{classify_feedlabel, compute_live, LiveParams, NewsKind};
pub use quality_trust::{
    compute_quality_trust, confidence, QualityTrustParams, DEFAULT_CONFIDENCE_MAX_REVIEWS,
};

use crate::signals::InterimGameSignals;
use crate::types::game_context::GameContexts;

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Tunables for all three computers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextParams {
    pub quality_trust: QualityTrustParams,
    pub live: LiveParams,
}

impl ContextParams {
    pub fn compute(&self, interim: &InterimGameSignals, now: i64) -> GameContexts {
        GameContexts {
            quality_trust: compute_quality_trust(interim, &self.quality_trust),
            live: compute_live(interim, now, &self.live),
            discount: compute_discount(interim),
        }
    }
}
