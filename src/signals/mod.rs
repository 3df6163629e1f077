//! Raw store payloads → compact typed per-game summary (interim tier).

pub(crate) mod extract;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::identifiers::{AppId, Locale, SourceVersion};
use extract::{as_int, as_string, field, int_or_zero, list_len, path, truthy};

/// The four raw payloads one interim record is derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGameSignals {
    pub appdetails: Value,
    pub appreviews_summary: Value,
    pub schema: Value,
    pub news: Value,
}

impl RawGameSignals {
    pub fn source_version(&self) -> SourceVersion {
        // serde_json's default map is ordered, so this encoding is stable.
        let encoded: Vec<Vec<u8>> = [
            &self.appdetails,
            &self.appreviews_summary,
            &self.schema,
            &self.news,
        ]
        .iter()
        .map(|v| serde_json::to_vec(v).unwrap_or_default())
        .collect();
        SourceVersion::from_parts(encoded.iter().map(Vec::as_slice))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterimMeta {
    pub generated_at: i64,
    pub source_version: SourceVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDetailsSummary {
    pub cc: String,
    pub lang: String,
    pub movies_count: i64,
    pub screenshots_count: i64,
    pub recommendations_total: i64,
    pub achievements_total_store: i64,
    pub discount_percent: i64,
    pub price_final: i64,
    pub price_initial: i64,
    pub currency: Option<String>,
    pub raw_success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total_positive: i64,
    pub total_negative: i64,
    pub total_reviews: i64,
    pub review_positive_ratio: f64,
    pub review_score_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSummary {
    /// `None` when the schema carries no achievement list at all.
    pub achievements_total: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: i64,
    pub feedlabel: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub newsitems: Vec<NewsItem>,
}

/// Interim tier record: `interim/game_signals/{appid}__cc=..__lang=...json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterimGameSignals {
    pub meta: InterimMeta,
    pub appid: AppId,
    pub appdetails: AppDetailsSummary,
    pub reviews: ReviewSummary,
    pub schema: SchemaSummary,
    pub news: NewsSummary,
}

impl InterimGameSignals {
    /// Never fails: every missing or malformed field degrades to 0, `None`,
    /// or an empty list.
    pub fn from_raw(appid: AppId, raw: &RawGameSignals, locale: &Locale, now: i64) -> Self {
        InterimGameSignals {
            meta: InterimMeta {
                generated_at: now,
                source_version: raw.source_version(),
            },
            appid,
            appdetails: summarize_appdetails(appid, &raw.appdetails, locale),
            reviews: summarize_reviews(&raw.appreviews_summary),
            schema: summarize_schema(&raw.schema),
            news: summarize_news(&raw.news),
        }
    }
}

fn summarize_appdetails(appid: AppId, payload: &Value, locale: &Locale) -> AppDetailsSummary {
    // Store wraps the body as {"<appid>": {"success": .., "data": {..}}}
    let entry = field(payload, &appid.to_string());
    let data = entry.and_then(|e| field(e, "data"));
    let get = |keys: &[&str]| data.and_then(|d| path(d, keys));

    AppDetailsSummary {
        cc: locale.cc.clone(),
        lang: locale.lang.clone(),
        movies_count: list_len(get(&["movies"])),
        screenshots_count: list_len(get(&["screenshots"])),
        recommendations_total: int_or_zero(get(&["recommendations", "total"])),
        achievements_total_store: int_or_zero(get(&["achievements", "total"])),
        discount_percent: int_or_zero(get(&["price_overview", "discount_percent"])),
        price_final: int_or_zero(get(&["price_overview", "final"])),
        price_initial: int_or_zero(get(&["price_overview", "initial"])),
        currency: as_string(get(&["price_overview", "currency"])),
        raw_success: truthy(entry.and_then(|e| field(e, "success"))),
    }
}

fn summarize_reviews(payload: &Value) -> ReviewSummary {
    let summary = field(payload, "query_summary");
    let get = |key: &str| summary.and_then(|s| field(s, key));

    let total_positive = int_or_zero(get("total_positive"));
    let total_negative = int_or_zero(get("total_negative"));
    let total_reviews = int_or_zero(get("total_reviews"));
    let review_positive_ratio = if total_reviews > 0 {
        total_positive as f64 / total_reviews as f64
    } else {
        0.0
    };

    ReviewSummary {
        total_positive,
        total_negative,
        total_reviews,
        review_positive_ratio,
        review_score_desc: as_string(get("review_score_desc")),
    }
}

fn summarize_schema(payload: &Value) -> SchemaSummary {
    let achievements = path(payload, &["game", "availableGameStats", "achievements"]);
    SchemaSummary {
        achievements_total: achievements
            .and_then(Value::as_array)
            .map(|list| list.len() as i64),
    }
}

fn summarize_news(payload: &Value) -> NewsSummary {
    let items = path(payload, &["appnews", "newsitems"]).and_then(Value::as_array);
    let newsitems = items
        .map(|items| {
            items
                .iter()
                .filter(|it| it.is_object())
                .map(|it| NewsItem {
                    date: as_int(field(it, "date")).unwrap_or(0),
                    feedlabel: as_string(field(it, "feedlabel")),
                    title: as_string(field(it, "title")),
                })
                .collect()
        })
        .unwrap_or_default();
    NewsSummary { newsitems }
}
