//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Inspect and resolve SMAP debug line-mapping blobs.
#[derive(Debug, Parser)]
#[command(name = "smap-dump")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// SMAP text file to inspect (e.g. a dumped SourceDebugExtension
    /// attribute)
    pub file: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Resolve an emitted line number back to its original file and line
    #[arg(long)]
    pub resolve: Option<i32>,
}

/// Output format for dump results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Readable per-file range tables.
    Human,
    /// Machine-readable JSON document.
    Json,
}
