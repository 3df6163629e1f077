use std::time::Duration;

pub const DEFAULT_WEB_BASE: &str = "https://api.steampowered.com";
pub const DEFAULT_STORE_BASE: &str = "https://store.steampowered.com";

/// Network, retry and rate-limit policy for [`SteamClient`](super::SteamClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,

    /// Minimum spacing between calls to the authenticated Web API.
    pub min_interval_web: Duration,
    /// Minimum spacing between calls to the Store API.
    pub min_interval_store: Duration,

    pub news_count: u32,
    pub news_maxlength: u32,

    pub web_base: String,
    pub store_base: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 4,
            backoff_base: Duration::from_millis(700),
            backoff_cap: Duration::from_secs(10),
            min_interval_web: Duration::from_millis(250),
            min_interval_store: Duration::from_millis(350),
            news_count: 20,
            news_maxlength: 300,
            web_base: DEFAULT_WEB_BASE.to_string(),
            store_base: DEFAULT_STORE_BASE.to_string(),
            user_agent: concat!("game-context-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
