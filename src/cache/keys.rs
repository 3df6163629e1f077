use std::fmt;
use std::path::PathBuf;

use crate::cache::store::CacheError;
use crate::types::identifiers::{AppId, Locale, SteamId};

/// Cache tier. Each tier owns its own directory and fully replaces its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Raw,
    Interim,
    Processed,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Raw => "raw",
            Tier::Interim => "interim",
            Tier::Processed => "processed",
        }
    }
}

/// Named collection inside a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    OwnedGames,
    RecentlyPlayedGames,
    AppDetails,
    AppReviewsSummary,
    Schema,
    News,
    GameSignals,
    UserGames,
    GameBundles,
    UserBehavior,
    ContextBundles,
}

impl Collection {
    pub fn tier(self) -> Tier {
        match self {
            Collection::OwnedGames
            | Collection::RecentlyPlayedGames
            | Collection::AppDetails
            | Collection::AppReviewsSummary
            | Collection::Schema
            | Collection::News => Tier::Raw,
            Collection::GameSignals | Collection::UserGames => Tier::Interim,
            Collection::GameBundles | Collection::UserBehavior | Collection::ContextBundles => {
                Tier::Processed
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::OwnedGames => "owned_games",
            Collection::RecentlyPlayedGames => "recently_played_games",
            Collection::AppDetails => "appdetails",
            Collection::AppReviewsSummary => "appreviews_summary",
            Collection::Schema => "schema",
            Collection::News => "news",
            Collection::GameSignals => "game_signals",
            Collection::UserGames => "user_games",
            Collection::GameBundles => "game_bundles",
            Collection::UserBehavior => "user_behavior",
            Collection::ContextBundles => "context_bundles",
        }
    }
}

/// Addresses one cached artifact:
/// `{tier}/{collection}/{id}[__cc=xx__lang=yy].json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub collection: Collection,
    pub id: String,
    pub locale: Option<Locale>,
}

impl CacheKey {
    pub fn new(collection: Collection, id: impl fmt::Display) -> Self {
        Self {
            collection,
            id: id.to_string(),
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: &Locale) -> Self {
        self.locale = Some(locale.clone());
        self
    }

    pub fn tier(&self) -> Tier {
        self.collection.tier()
    }

    pub fn file_name(&self) -> String {
        match &self.locale {
            Some(locale) => format!("{}{}.json", self.id, locale.key_suffix()),
            None => format!("{}.json", self.id),
        }
    }

    /// Path relative to the cache root. Rejects ids that could escape their
    /// collection directory.
    pub fn relative_path(&self) -> Result<PathBuf, CacheError> {
        let suspicious = |s: &str| {
            s.is_empty() || s.contains('/') || s.contains('\\') || s.contains("..")
        };
        let locale_bad = self
            .locale
            .as_ref()
            .map(|l| suspicious(&l.cc) || suspicious(&l.lang))
            .unwrap_or(false);
        if suspicious(&self.id) || locale_bad {
            return Err(CacheError::InvalidKey(self.to_string()));
        }

        Ok(PathBuf::from(self.tier().as_str())
            .join(self.collection.as_str())
            .join(self.file_name()))
    }

    // Keys used by more than one component.

    pub fn game_signals(appid: AppId, locale: &Locale) -> Self {
        CacheKey::new(Collection::GameSignals, appid).with_locale(locale)
    }

    pub fn game_bundle(appid: AppId, locale: &Locale) -> Self {
        CacheKey::new(Collection::GameBundles, appid).with_locale(locale)
    }

    pub fn user_games(steam_id: &SteamId) -> Self {
        CacheKey::new(Collection::UserGames, steam_id)
    }

    pub fn user_behavior(steam_id: &SteamId) -> Self {
        CacheKey::new(Collection::UserBehavior, steam_id)
    }

    pub fn context_bundle(steam_id: &SteamId, locale: &Locale) -> Self {
        CacheKey::new(Collection::ContextBundles, steam_id).with_locale(locale)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.tier().as_str(),
            self.collection.as_str(),
            self.file_name()
        )
    }
}
