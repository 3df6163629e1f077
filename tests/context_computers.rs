use game_context_core::contexts::{
    classify_feedlabel, compute_discount, compute_live, compute_quality_trust, confidence,
    discount_from_percent, LiveParams, NewsKind, QualityTrustParams,
    DEFAULT_CONFIDENCE_MAX_REVIEWS,
};
use game_context_core::signals::{
    AppDetailsSummary, InterimGameSignals, InterimMeta, NewsItem, NewsSummary, ReviewSummary,
    SchemaSummary,
};
use game_context_core::types::{AppId, SourceVersion};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

fn interim() -> InterimGameSignals {
    InterimGameSignals {
        meta: InterimMeta {
            generated_at: NOW,
            source_version: SourceVersion::from_parts(std::iter::empty::<&[u8]>()),
        },
        appid: AppId::new(570).unwrap(),
        appdetails: AppDetailsSummary {
            cc: "us".into(),
            lang: "en".into(),
            movies_count: 1,
            screenshots_count: 10,
            recommendations_total: 5000,
            achievements_total_store: 0,
            discount_percent: 0,
            price_final: 0,
            price_initial: 0,
            currency: None,
            raw_success: true,
        },
        reviews: ReviewSummary {
            total_positive: 0,
            total_negative: 0,
            total_reviews: 0,
            review_positive_ratio: 0.0,
            review_score_desc: None,
        },
        schema: SchemaSummary {
            achievements_total: Some(50),
        },
        news: NewsSummary { newsitems: vec![] },
    }
}

fn with_reviews(total: i64, ratio: f64) -> InterimGameSignals {
    let mut i = interim();
    i.reviews.total_reviews = total;
    i.reviews.review_positive_ratio = ratio;
    i
}

fn news(date: i64, label: &str) -> NewsItem {
    NewsItem {
        date,
        feedlabel: Some(label.to_string()),
        title: None,
    }
}

// Discount

#[test]
fn discount_signal_is_percent_over_100() {
    let mut i = interim();
    i.appdetails.discount_percent = 35;
    let d = compute_discount(&i);
    assert_eq!(d.discount_percent, 35);
    assert_eq!(d.discount_signal, 0.35);
}

#[test]
fn discount_is_clamped_to_0_100() {
    for (raw, expected) in [(-10, 0), (0, 0), (100, 100), (250, 100)] {
        let d = discount_from_percent(raw);
        assert_eq!(d.discount_percent, expected);
        assert!((0.0..=1.0).contains(&d.discount_signal));
        assert_eq!(d.discount_signal, expected as f64 / 100.0);
    }
}

// Quality / trust

#[test]
fn confidence_endpoints_and_monotonicity() {
    let max = DEFAULT_CONFIDENCE_MAX_REVIEWS;
    assert_eq!(confidence(0, max), 0.0);
    assert_eq!(confidence(10_000, max), 1.0);
    assert_eq!(confidence(5_000_000, max), 1.0);

    let mut prev = 0.0;
    for n in [1, 9, 10, 99, 500, 1_000, 9_999] {
        let c = confidence(n, max);
        assert!(c >= prev, "confidence({n}) = {c} < {prev}");
        assert!((0.0..=1.0).contains(&c));
        prev = c;
    }
}

#[test]
fn quality_score_is_zero_without_reviews() {
    let qt = compute_quality_trust(&with_reviews(0, 0.0), &QualityTrustParams::default());
    assert_eq!(qt.confidence, 0.0);
    assert_eq!(qt.quality_trust_score, 0.0);
    assert_eq!(qt.total_reviews, 0);
}

#[test]
fn quality_score_strictly_increases_with_ratio() {
    let params = QualityTrustParams::default();
    let mut prev = -1.0;
    for step in 0..=10 {
        let ratio = step as f64 / 10.0;
        let qt = compute_quality_trust(&with_reviews(2_000, ratio), &params);
        assert!((0.0..=1.0).contains(&qt.quality_trust_score));
        assert!(
            qt.quality_trust_score > prev,
            "ratio {ratio}: {} <= {prev}",
            qt.quality_trust_score
        );
        prev = qt.quality_trust_score;
    }
}

#[test]
fn quality_score_is_bounded_for_extreme_inputs() {
    let mut i = with_reviews(i64::MAX / 2, 7.5);
    i.appdetails.screenshots_count = 10_000;
    i.appdetails.movies_count = 50;
    i.appdetails.recommendations_total = i64::MAX / 2;
    i.schema.achievements_total = Some(100_000);

    let qt = compute_quality_trust(&i, &QualityTrustParams::default());
    assert_eq!(qt.review_positive_ratio, 1.0);
    assert_eq!(qt.confidence, 1.0);
    assert!(qt.quality_trust_score <= 1.0);
    assert!(qt.quality_trust_score > 0.9);
}

#[test]
fn missing_achievements_stay_null() {
    let mut i = with_reviews(100, 0.8);
    i.schema.achievements_total = None;
    let qt = compute_quality_trust(&i, &QualityTrustParams::default());
    assert_eq!(qt.achievements_total, None);

    let encoded = serde_json::to_value(&qt).unwrap();
    assert!(encoded["achievements_total"].is_null());
}

// Live

#[test]
fn no_dated_news_means_null_days_and_zero_signal() {
    let mut i = interim();
    i.news.newsitems = vec![news(0, "Product Update"), news(-5, "Events")];
    let live = compute_live(&i, NOW, &LiveParams::default());

    assert_eq!(live.days_since_last_news, None);
    assert_eq!(live.recent_update_count, 0);
    assert_eq!(live.recent_event_count, 0);
    assert_eq!(live.liveness_signal, 0.0);
}

#[test]
fn days_since_last_news_is_floored_from_latest_item() {
    let mut i = interim();
    i.news.newsitems = vec![
        news(NOW - 10 * DAY - 3_600, "Community Announcements"),
        news(NOW - 2 * DAY - 100, "Product Update"),
    ];
    let live = compute_live(&i, NOW, &LiveParams::default());
    assert_eq!(live.days_since_last_news, Some(2));

    // Future-dated news counts as today.
    i.news.newsitems = vec![news(NOW + DAY, "Product Update")];
    let live = compute_live(&i, NOW, &LiveParams::default());
    assert_eq!(live.days_since_last_news, Some(0));
}

#[test]
fn window_counts_updates_and_events() {
    let mut i = interim();
    i.news.newsitems = vec![
        news(NOW - 20 * DAY, "Product Update"),
        news(NOW - 22 * DAY, "Patch Notes"),
        news(NOW - 25 * DAY, "Steam Events"),
        news(NOW - 26 * DAY, "Community Announcements"),
        news(NOW - 45 * DAY, "Product Update"),
    ];
    let params = LiveParams::default();
    let live = compute_live(&i, NOW, &params);

    assert_eq!(live.recent_update_count, 2);
    assert_eq!(live.recent_event_count, 1);

    assert_eq!(live.days_since_last_news, Some(20));
    let expected = (-20.0f64 / params.tau_days).exp() + params.alpha * 3.0;
    assert!((live.liveness_signal - expected).abs() < 1e-12);
}

#[test]
fn liveness_is_clamped_to_one() {
    let mut i = interim();
    i.news.newsitems = (0..40).map(|k| news(NOW - k * 60, "Product Update")).collect();
    let live = compute_live(&i, NOW, &LiveParams::default());
    assert_eq!(live.liveness_signal, 1.0);
}

#[test]
fn feedlabels_are_classified_case_insensitively() {
    assert_eq!(classify_feedlabel(Some("Product Update")), NewsKind::Update);
    assert_eq!(classify_feedlabel(Some("PATCH NOTES")), NewsKind::Update);
    assert_eq!(classify_feedlabel(Some("Steam Events")), NewsKind::Event);
    assert_eq!(classify_feedlabel(Some("Weekend Sale")), NewsKind::Event);
    assert_eq!(classify_feedlabel(Some("PC Gamer")), NewsKind::Other);
    assert_eq!(classify_feedlabel(None), NewsKind::Other);
}
