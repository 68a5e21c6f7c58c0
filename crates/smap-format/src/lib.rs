//! Two-stratum SMAP text format (JSR-45) serialization and parsing.
//!
//! The format is a strict external contract consumed by debuggers and
//! stack-trace tools: a `SMAP` header, a default `Kotlin` stratum and an
//! optional `KotlinDebug` stratum, each with `*F` file and `*L` line
//! sections terminated by `*E`. [`SmapBuilder`] produces the text;
//! [`parse`] reads it back.

mod builder;
mod error;
mod parser;

pub use builder::SmapBuilder;
pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse, ParsedSmap, Stratum};

/// Header tag opening every SMAP blob.
pub const SMAP_HEADER: &str = "SMAP";
/// Name of the default stratum.
pub const KOTLIN_STRATA_NAME: &str = "Kotlin";
/// Name of the call-site debug stratum.
pub const KOTLIN_DEBUG_STRATA_NAME: &str = "KotlinDebug";
/// File section tag.
pub const FILE_SECTION: &str = "*F";
/// Line section tag.
pub const LINE_SECTION: &str = "*L";
/// Stratum terminator tag.
pub const END: &str = "*E";
