pub mod bundle;
pub mod keys;
pub mod store;

pub use bundle::{load_bundle, stored_bundle_is_fresh, BundleMeta, ProcessedGameBundle};
pub use keys::{CacheKey, Collection, Tier};
pub use store::{write_atomic, CacheError, CacheStore, FsStore, MemoryStore};
