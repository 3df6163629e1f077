//! Demo Top-K over an assembled context bundle. Not the production ranker;
//! it exists to exercise the bundle contract end to end.

pub mod ranking;
pub mod reason;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::context_bundle::ContextBundle;
use crate::types::identifiers::AppId;
pub use ranking::{Contributions, Contributor, ScoreWeights, Scorer, WeightedContextScorer};
pub use reason::build_reason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub appid: AppId,
    pub score: f64,
    pub contrib: Contributions,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKMeta {
    pub top_k: usize,
    pub weights: ScoreWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKResult {
    pub meta: TopKMeta,
    pub top_k: Vec<RankedCandidate>,
}

pub struct TopKSelector<S> {
    scorer: S,
    reason_top_n: usize,
}

impl Default for TopKSelector<WeightedContextScorer> {
    fn default() -> Self {
        Self {
            scorer: WeightedContextScorer::default(),
            reason_top_n: 2,
        }
    }
}

impl TopKSelector<WeightedContextScorer> {
    pub fn weighted(weights: ScoreWeights, reason_top_n: usize) -> Self {
        Self::new(WeightedContextScorer::new(weights), reason_top_n)
    }

    pub fn weights(&self) -> ScoreWeights {
        self.scorer.weights
    }

    pub fn select(&self, bundle: &ContextBundle, top_k: usize) -> TopKResult {
        TopKResult {
            meta: TopKMeta {
                top_k,
                weights: self.weights(),
            },
            top_k: self.rank(bundle, top_k),
        }
    }
}

impl<S: Scorer> TopKSelector<S> {
    pub fn new(scorer: S, reason_top_n: usize) -> Self {
        Self {
            scorer,
            reason_top_n,
        }
    }

    /// Scores every game in the bundle and keeps the best `top_k`.
    pub fn rank(&self, bundle: &ContextBundle, top_k: usize) -> Vec<RankedCandidate> {
        // 1. Scoring
        let mut rows: Vec<RankedCandidate> = bundle
            .games
            .iter()
            .map(|(&appid, game)| {
                let contrib = self.scorer.contributions(game);
                let score = self.scorer.score_value(&contrib);
                RankedCandidate {
                    appid,
                    score,
                    contrib,
                    reason: build_reason(appid, score, &contrib, game, self.reason_top_n),
                }
            })
            .collect();

        // 2. Ordering: score desc, appid asc
        rows.sort_by(|a, b| {
            let score_cmp = b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal);
            if score_cmp != Ordering::Equal {
                score_cmp
            } else {
                a.appid.cmp(&b.appid)
            }
        });

        debug_assert!(rows
            .windows(2)
            .all(|w| w[0].score > w[1].score || (w[0].score == w[1].score && w[0].appid <= w[1].appid)));

        rows.truncate(top_k);
        rows
    }
}
