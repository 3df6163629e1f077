use serde_json::Value;

use crate::cache::{CacheKey, CacheStore, Collection, FsStore};
use crate::client::backoff::Backoff;
use crate::client::config::ClientConfig;
use crate::client::limiter::MinIntervalLimiter;
use crate::client::transport::{Transport, UreqTransport};
use crate::client::ClientError;
use crate::types::identifiers::{AppId, Locale, SteamId};

/// Key-gated method behind the achievement schema fetch.
pub const SCHEMA_ENDPOINT: &str = "ISteamUserStats/GetSchemaForGame";

/// Which remote service a call goes to. Each class has its own limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// `api.steampowered.com`, key-gated for most methods.
    Web,
    /// `store.steampowered.com`, unauthenticated.
    Store,
}

/// Rate-limited, retrying client for the Steam Web and Store APIs.
///
/// Every successful call is persisted to the raw tier when a store is
/// attached. Methods take `&mut self` because limiter state advances on each
/// call.
pub struct SteamClient<T = UreqTransport, S = FsStore> {
    api_key: Option<String>,
    config: ClientConfig,
    transport: T,
    raw_store: Option<S>,
    web_limiter: MinIntervalLimiter,
    store_limiter: MinIntervalLimiter,
    backoff: Backoff,
}

impl SteamClient<UreqTransport, FsStore> {
    pub fn new(api_key: Option<String>, config: ClientConfig, raw_store: Option<FsStore>) -> Self {
        let transport = UreqTransport::new(config.timeout, &config.user_agent);
        SteamClient::with_transport(api_key, config, transport, raw_store)
    }
}

impl<T: Transport, S: CacheStore> SteamClient<T, S> {
    pub fn with_transport(
        api_key: Option<String>,
        config: ClientConfig,
        transport: T,
        raw_store: Option<S>,
    ) -> Self {
        // Blank keys (e.g. `STEAM_API_KEY=` in a .env) count as missing.
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            api_key,
            web_limiter: MinIntervalLimiter::new(config.min_interval_web),
            store_limiter: MinIntervalLimiter::new(config.min_interval_store),
            backoff: Backoff::new(config.backoff_base, config.backoff_cap),
            config,
            transport,
            raw_store,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fails with `MissingApiKey` naming `endpoint` when no key is configured.
    pub fn ensure_api_key(&self, endpoint: &'static str) -> Result<(), ClientError> {
        self.require_key(endpoint).map(drop)
    }

    fn require_key(&self, endpoint: &'static str) -> Result<String, ClientError> {
        self.api_key
            .clone()
            .ok_or(ClientError::MissingApiKey { endpoint })
    }

    /// One logical GET with spacing and retries. Returns the decoded body.
    ///
    /// 429 and 5xx are retried (honouring `Retry-After`), as are transport
    /// failures and undecodable bodies. Other non-2xx statuses fail at once.
    /// When retries run out the last error is returned as is.
    pub fn request(
        &mut self,
        class: EndpointClass,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let base = match class {
            EndpointClass::Web => &self.config.web_base,
            EndpointClass::Store => &self.config.store_base,
        };
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        let query: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        let mut rng = rand::thread_rng();
        let mut attempt: u32 = 0;
        loop {
            match class {
                EndpointClass::Web => self.web_limiter.wait(),
                EndpointClass::Store => self.store_limiter.wait(),
            }

            let (error, retry_after) = match self.transport.get(&url, &query) {
                Ok(resp) if resp.status == 429 || (500..=599).contains(&resp.status) => (
                    ClientError::Status {
                        status: resp.status,
                        url: url.clone(),
                    },
                    resp.retry_after,
                ),
                Ok(resp) if !(200..=299).contains(&resp.status) => {
                    return Err(ClientError::Status {
                        status: resp.status,
                        url,
                    });
                }
                Ok(resp) => match serde_json::from_slice::<Value>(&resp.body) {
                    Ok(value) => return Ok(value),
                    Err(source) => (
                        ClientError::Decode {
                            url: url.clone(),
                            source,
                        },
                        None,
                    ),
                },
                Err(message) => (
                    ClientError::Transport {
                        url: url.clone(),
                        message,
                    },
                    None,
                ),
            };

            if attempt >= self.config.max_retries {
                tracing::error!(%url, attempts = attempt + 1, error = %error, "giving up");
                return Err(error);
            }

            let delay = self.backoff.delay(attempt, retry_after.as_deref(), &mut rng);
            tracing::warn!(
                %url,
                attempt = attempt + 1,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request"
            );
            std::thread::sleep(delay);
            attempt += 1;
        }
    }

    fn fetch_and_persist(
        &mut self,
        class: EndpointClass,
        path: &str,
        params: &[(&str, String)],
        key: CacheKey,
    ) -> Result<Value, ClientError> {
        let payload = self.request(class, path, params)?;
        if let Some(store) = &self.raw_store {
            store.store(&key, &payload)?;
            tracing::debug!(key = %key, "raw response persisted");
        }
        Ok(payload)
    }

    // User signals

    pub fn owned_games(&mut self, steam_id: &SteamId) -> Result<Value, ClientError> {
        let key = self.require_key("IPlayerService/GetOwnedGames")?;
        self.fetch_and_persist(
            EndpointClass::Web,
            "/IPlayerService/GetOwnedGames/v0001/",
            &[
                ("key", key),
                ("steamid", steam_id.to_string()),
                ("include_appinfo", "true".into()),
                ("format", "json".into()),
            ],
            CacheKey::new(Collection::OwnedGames, steam_id),
        )
    }

    pub fn recently_played_games(&mut self, steam_id: &SteamId) -> Result<Value, ClientError> {
        let key = self.require_key("IPlayerService/GetRecentlyPlayedGames")?;
        self.fetch_and_persist(
            EndpointClass::Web,
            "/IPlayerService/GetRecentlyPlayedGames/v0001/",
            &[
                ("key", key),
                ("steamid", steam_id.to_string()),
                ("format", "json".into()),
            ],
            CacheKey::new(Collection::RecentlyPlayedGames, steam_id),
        )
    }

    // Game signals

    /// Locale-sensitive: prices and discounts differ per country.
    pub fn app_details(&mut self, appid: AppId, locale: &Locale) -> Result<Value, ClientError> {
        self.fetch_and_persist(
            EndpointClass::Store,
            "/api/appdetails",
            &[
                ("appids", appid.to_string()),
                ("cc", locale.cc.clone()),
                ("l", locale.lang.clone()),
            ],
            CacheKey::new(Collection::AppDetails, appid).with_locale(locale),
        )
    }

    /// Summary only: `num_per_page=0` skips the review bodies.
    pub fn app_reviews_summary(
        &mut self,
        appid: AppId,
        review_lang: &str,
    ) -> Result<Value, ClientError> {
        self.fetch_and_persist(
            EndpointClass::Store,
            &format!("/appreviews/{appid}"),
            &[
                ("json", "1".into()),
                ("language", review_lang.to_string()),
                ("purchase_type", "all".into()),
                ("filter", "summary".into()),
                ("num_per_page", "0".into()),
            ],
            CacheKey::new(Collection::AppReviewsSummary, appid),
        )
    }

    pub fn schema_for_game(&mut self, appid: AppId) -> Result<Value, ClientError> {
        let key = self.require_key(SCHEMA_ENDPOINT)?;
        self.fetch_and_persist(
            EndpointClass::Web,
            "/ISteamUserStats/GetSchemaForGame/v2/",
            &[
                ("key", key),
                ("appid", appid.to_string()),
                ("format", "json".into()),
            ],
            CacheKey::new(Collection::Schema, appid),
        )
    }

    pub fn news_for_app(&mut self, appid: AppId) -> Result<Value, ClientError> {
        let count = self.config.news_count.to_string();
        let maxlength = self.config.news_maxlength.to_string();
        self.fetch_and_persist(
            EndpointClass::Web,
            "/ISteamNews/GetNewsForApp/v0002/",
            &[
                ("appid", appid.to_string()),
                ("count", count),
                ("maxlength", maxlength),
                ("format", "json".into()),
            ],
            CacheKey::new(Collection::News, appid),
        )
    }
}
