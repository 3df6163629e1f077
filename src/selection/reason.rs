use crate::selection::ranking::{Contributions, Contributor};
use crate::types::context_bundle::GameEntry;
use crate::types::identifiers::AppId;

fn justify(contributor: Contributor, game: &GameEntry) -> String {
    match contributor {
        Contributor::QualityTrust => {
            let qt = &game.quality_trust;
            format!(
                "high quality/trust (qt_score={:.3}, positive_ratio={:.3}, reviews={})",
                qt.quality_trust_score, qt.review_positive_ratio, qt.total_reviews
            )
        }
        Contributor::Live => {
            let last_news = match game.live.days_since_last_news {
                Some(days) => format!("{days}d ago"),
                None => "none".to_string(),
            };
            format!(
                "actively maintained (live={:.3}, last_news={})",
                game.live.liveness_signal, last_news
            )
        }
        Contributor::Discount => {
            format!("on discount ({}% off)", game.discount.discount_percent)
        }
    }
}

/// `[appid] score=0.712: <top contributor>; <next contributor>`.
///
/// Names the `top_n` largest contributors (at least one).
pub fn build_reason(
    appid: AppId,
    score: f64,
    contributions: &Contributions,
    game: &GameEntry,
    top_n: usize,
) -> String {
    let parts: Vec<String> = contributions
        .ranked()
        .into_iter()
        .take(top_n.max(1))
        .map(|(contributor, _)| justify(contributor, game))
        .collect();
    format!("[{appid}] score={score:.3}: {}", parts.join("; "))
}
