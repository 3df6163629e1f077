//! Steam signal pipeline for context-aware game recommendation.
//!
//! `game-context-core` fetches raw Steam Web/Store data through a
//! rate-limited, retrying client, normalizes it into interim records, derives
//! bounded per-game contexts (quality/trust, liveness, discount) and a
//! per-user behavior context, caches them with a TTL, and assembles both
//! into one context bundle. A demo Top-K ranker consumes that bundle.
//!
//! Every tier is plain JSON under a data root:
//! `raw/` (verbatim responses), `interim/` (normalized records) and
//! `processed/` (contexts with TTL metadata).

pub mod assembly;
pub mod behavior;
pub mod cache;
pub mod cli;
pub mod client;
pub mod contexts;
pub mod pipeline;
pub mod selection;
pub mod signals;
pub mod types;
