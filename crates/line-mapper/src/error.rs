//! Mapper chain error types.

use line_map::SmapError;
use thiserror::Error;

/// A state error in the mapper chain.
///
/// All variants indicate a bug in the driving code generator; none are
/// retried, and each aborts compilation of the current unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// A nested mapper needs at least one recorded range: an inlined call
    /// must have produced at least one line.
    #[error("inlined function carries no line mapping ranges")]
    EmptyRanges,

    /// `finish` was called while a nested mapper was still on the chain.
    #[error("mapping finished while a nested mapper is still active")]
    UnfinishedChain,

    /// The accumulated mappings do not form a valid aggregate.
    #[error(transparent)]
    Smap(#[from] SmapError),
}
