use serde::{Deserialize, Serialize};

use crate::contexts::clamp01;
use crate::types::context_bundle::GameEntry;

/// Weights for the demo score. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub quality_trust: f64,
    pub live: f64,
    pub discount: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            quality_trust: 0.60,
            live: 0.25,
            discount: 0.15,
        }
    }
}

/// Weighted per-signal contributions to one candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contributions {
    pub quality_trust: f64,
    pub live: f64,
    pub discount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contributor {
    QualityTrust,
    Live,
    Discount,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.quality_trust + self.live + self.discount
    }

    /// Contributors by value, largest first. Ties keep quality, live,
    /// discount order.
    pub fn ranked(&self) -> Vec<(Contributor, f64)> {
        let mut ranked = vec![
            (Contributor::QualityTrust, self.quality_trust),
            (Contributor::Live, self.live),
            (Contributor::Discount, self.discount),
        ];
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

pub trait Scorer {
    fn contributions(&self, game: &GameEntry) -> Contributions;

    fn score_value(&self, contributions: &Contributions) -> f64 {
        contributions.total()
    }
}

/// `w_q * quality_trust_score + w_l * liveness_signal + w_d * discount_signal`,
/// each input clamped to [0, 1].
#[derive(Debug, Clone, Default)]
pub struct WeightedContextScorer {
    pub weights: ScoreWeights,
}

impl WeightedContextScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }
}

impl Scorer for WeightedContextScorer {
    fn contributions(&self, game: &GameEntry) -> Contributions {
        Contributions {
            quality_trust: self.weights.quality_trust
                * clamp01(game.quality_trust.quality_trust_score),
            live: self.weights.live * clamp01(game.live.liveness_signal),
            discount: self.weights.discount * clamp01(game.discount.discount_signal),
        }
    }
}
