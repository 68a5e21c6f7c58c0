//! smap-dump: inspect and resolve SMAP debug line-mapping blobs.

mod cli;
mod output;

use clap::Parser;
use cli::Args;
use miette::{IntoDiagnostic, Result, WrapErr};

fn main() -> Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", args.file))?;
    let parsed = smap_format::parse(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to parse {}", args.file))?;

    match args.resolve {
        Some(line) => output::print_resolved(&parsed, line, args.output),
        None => output::print_summary(&parsed, args.output),
    }
}
