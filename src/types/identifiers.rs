use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Store application identifier (game, DLC, soundtrack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("appid must be a positive integer, got {0:?}")]
    InvalidAppId(String),
    #[error("steam id must be non-empty and numeric, got {0:?}")]
    InvalidSteamId(String),
}

impl AppId {
    /// Returns `None` for 0, which the store never assigns.
    pub fn new(raw: u32) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(AppId(raw))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(AppId::new)
            .ok_or_else(|| IdentifierError::InvalidAppId(s.to_string()))
    }
}

/// SteamID64, kept as a string because it exceeds what JSON consumers
/// reliably round-trip as a number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SteamId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::InvalidSteamId(s.to_string()));
        }
        Ok(SteamId(trimmed.to_string()))
    }
}

/// Country code + language pair for locale-sensitive store resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub cc: String,
    pub lang: String,
}

impl Locale {
    pub fn new(cc: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            cc: cc.into(),
            lang: lang.into(),
        }
    }

    /// File-name suffix: `__cc=us__lang=en`.
    pub fn key_suffix(&self) -> String {
        format!("__cc={}__lang={}", self.cc, self.lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("us", "en")
    }
}

/// Content hash of the raw inputs an interim record was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceVersion(String);

impl SourceVersion {
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            // Length prefix keeps ("ab","c") and ("a","bc") distinct.
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        let hex = hex::encode(hasher.finalize());
        SourceVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
