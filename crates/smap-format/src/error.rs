//! Parse error types.

use thiserror::Error;

/// An error that occurred while parsing SMAP text.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// 1-based line in the input at which the error occurred.
    pub line: usize,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// The input does not start with the `SMAP` header tag.
    #[error("missing SMAP header")]
    MissingHeader,

    /// The input ended before a required element.
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// A `*F` entry that does not match `+ id name` / `id name`.
    #[error("malformed file entry: {entry:?}")]
    MalformedFileEntry {
        /// The offending entry text.
        entry: String,
    },

    /// A `*L` entry that does not match `source#fileId[,range]:dest`.
    #[error("malformed line entry: {entry:?}")]
    MalformedLineEntry {
        /// The offending entry text.
        entry: String,
    },

    /// A line entry referenced a file id never declared in `*F`.
    #[error("line entry references undeclared file id {file_id}")]
    UnknownFileId {
        /// The undeclared id.
        file_id: i32,
    },

    /// A `*F` section declared the same file id twice.
    #[error("duplicate file id {file_id}")]
    DuplicateFileId {
        /// The id declared twice.
        file_id: i32,
    },

    /// Content encountered outside any `*F` or `*L` section (including
    /// before the first `*S` stratum).
    #[error("content outside a file or line section")]
    ContentOutsideSection,
}
