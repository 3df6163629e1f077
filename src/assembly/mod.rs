pub mod assembler;
pub mod validate;

use thiserror::Error;

use crate::cache::CacheError;
use crate::types::identifiers::SteamId;

pub use assembler::ContextBundleAssembler;
pub use validate::validate;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("No processed behavior snapshot for steam id {0}; build it first")]
    MissingBehavior(SteamId),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}
