use crate::types::context_bundle::ContextBundle;
use crate::types::identifiers::AppId;

fn check_unit_range(issues: &mut Vec<String>, appid: AppId, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        issues.push(format!("games[{appid}].{field} out of [0,1]: {value}"));
    }
}

/// Sanity checks over an assembled bundle. Never fails; returns one
/// human-readable line per issue, empty when the bundle looks sound.
pub fn validate(bundle: &ContextBundle) -> Vec<String> {
    let mut issues = Vec::new();
    let meta = &bundle.meta;

    if !meta.missing_appids.is_empty() {
        issues.push(format!("missing_appids: {:?}", as_raw(&meta.missing_appids)));
    }
    if !meta.stale_appids.is_empty() {
        issues.push(format!(
            "stale_appids (expired bundles): {:?}",
            as_raw(&meta.stale_appids)
        ));
    }

    let state = &bundle.user.behavior.activity_state;
    if !state.is_known() {
        issues.push(format!("behavior.activity_state invalid: {:?}", state.as_str()));
    }

    if bundle.games.is_empty() && !meta.requested_appids.is_empty() {
        issues.push("requested_appids not empty but games is empty (all missing?)".to_string());
    }

    for (&appid, game) in &bundle.games {
        if let Some(bundle_meta) = &game.bundle_meta {
            if meta.generated_at > 0 && bundle_meta.is_expired(meta.generated_at) {
                issues.push(format!(
                    "games[{appid}] bundle expired (expires_at={})",
                    bundle_meta.expires_at
                ));
            }
        }

        let qt = &game.quality_trust;
        check_unit_range(&mut issues, appid, "quality_trust.review_positive_ratio", qt.review_positive_ratio);
        check_unit_range(&mut issues, appid, "quality_trust.confidence", qt.confidence);
        check_unit_range(&mut issues, appid, "quality_trust.quality_trust_score", qt.quality_trust_score);

        check_unit_range(&mut issues, appid, "live.liveness_signal", game.live.liveness_signal);

        let dp = game.discount.discount_percent;
        if !(0..=100).contains(&dp) {
            issues.push(format!("games[{appid}].discount.discount_percent out of [0,100]: {dp}"));
        }
        check_unit_range(&mut issues, appid, "discount.discount_signal", game.discount.discount_signal);
    }

    issues
}

fn as_raw(appids: &[AppId]) -> Vec<u32> {
    appids.iter().map(|a| a.get()).collect()
}
