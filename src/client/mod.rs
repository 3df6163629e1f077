pub mod backoff;
pub mod config;
pub mod limiter;
pub mod steam;
pub mod transport;

use thiserror::Error;

use crate::cache::CacheError;

pub use backoff::{parse_retry_after, Backoff};
pub use config::ClientConfig;
pub use limiter::MinIntervalLimiter;
pub use steam::{EndpointClass, SteamClient, SCHEMA_ENDPOINT};
pub use transport::{HttpResponse, Transport, UreqTransport};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("STEAM_API_KEY is required for {endpoint}")]
    MissingApiKey { endpoint: &'static str },
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
    #[error("Undecodable response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to persist raw response: {0}")]
    Cache(#[from] CacheError),
}
