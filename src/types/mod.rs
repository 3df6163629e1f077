pub mod behavior;
pub mod context_bundle;
pub mod game_context;
pub mod identifiers;

pub use behavior::{
    ActivityDebug, ActivityState, OwnedGameRow, SnapshotMeta, UserBehaviorContext,
    UserBehaviorSnapshot, UserGamesTable,
};
pub use context_bundle::{ContextBundle, ContextBundleMeta, GameEntry, UserSection};
pub use game_context::{DiscountContext, GameContexts, LiveContext, QualityTrustContext};
pub use identifiers::{AppId, IdentifierError, Locale, SourceVersion, SteamId};
