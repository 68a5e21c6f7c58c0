//! Error types for mapping-table construction.

use thiserror::Error;

/// A precondition violation when assembling an [`Smap`](crate::Smap).
///
/// These indicate a defect in the emitting code and abort compilation of the
/// affected unit; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmapError {
    /// A compiled unit with debug info enabled must carry at least its own
    /// identity mapping.
    #[error("an SMAP must contain at least one file mapping")]
    EmptyFileMappings,

    /// The default (first) file mapping must cover the compiled unit itself.
    #[error("the default file mapping of an SMAP must contain at least one range")]
    EmptyDefaultMapping,
}
