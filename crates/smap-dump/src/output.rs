//! Summary and line-resolution output.

use line_map::{FileMapping, RangeMapping};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use smap_format::ParsedSmap;

use crate::cli::OutputFormat;

#[derive(Serialize)]
struct JsonDocument<'a> {
    source: &'a str,
    default_stratum: &'a str,
    strata: Vec<JsonStratum<'a>>,
}

#[derive(Serialize)]
struct JsonStratum<'a> {
    name: &'a str,
    files: &'a [FileMapping],
}

#[derive(Serialize)]
struct JsonResolution<'a> {
    line: i32,
    resolved: Option<JsonResolvedLine<'a>>,
}

#[derive(Serialize)]
struct JsonResolvedLine<'a> {
    file: &'a str,
    path: &'a str,
    source_line: i32,
}

/// Prints the per-stratum, per-file range tables of a parsed blob.
pub fn print_summary(parsed: &ParsedSmap, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!("source: {}", parsed.source);
            println!("default stratum: {}", parsed.default_stratum_name);
            for stratum in &parsed.strata {
                println!();
                println!("stratum {}", stratum.name);
                for (index, fm) in stratum.file_mappings().iter().enumerate() {
                    println!("  file {}: {} ({})", index + 1, fm.name, fm.path);
                    for rm in fm.line_mappings() {
                        println!("    {}", render_range(rm));
                    }
                }
            }
            Ok(())
        }
        OutputFormat::Json => {
            let document = JsonDocument {
                source: &parsed.source,
                default_stratum: &parsed.default_stratum_name,
                strata: parsed
                    .strata
                    .iter()
                    .map(|s| JsonStratum {
                        name: &s.name,
                        files: s.file_mappings(),
                    })
                    .collect(),
            };
            print_json(&document)
        }
    }
}

/// Resolves one emitted line through the default stratum and prints the
/// original position, the way a stack-trace tool would.
pub fn print_resolved(parsed: &ParsedSmap, line: i32, format: OutputFormat) -> Result<()> {
    let resolved = resolve(parsed, line);
    match format {
        OutputFormat::Human => {
            match &resolved {
                Some((fm, source_line)) => {
                    println!("line {} -> {}:{} ({})", line, fm.name, source_line, fm.path);
                }
                None => println!("line {}: no mapping", line),
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&JsonResolution {
            line,
            resolved: resolved.map(|(fm, source_line)| JsonResolvedLine {
                file: &fm.name,
                path: &fm.path,
                source_line,
            }),
        }),
    }
}

/// Finds the original position of an emitted line in the default stratum.
///
/// Mappings for inlined code are declared after the unit's own identity
/// range, so when several intervals cover a line the last declared one wins.
fn resolve(parsed: &ParsedSmap, line: i32) -> Option<(&FileMapping, i32)> {
    let stratum = parsed.default_stratum()?;
    let mut best = None;
    for fm in stratum.file_mappings() {
        for rm in fm.line_mappings() {
            if !rm.is_skip() && rm.contains(line) {
                best = Some((fm, rm.map_dest_to_source(line)));
            }
        }
    }
    best
}

fn render_range(rm: &RangeMapping) -> String {
    if rm.is_skip() {
        return "<no source info>".to_string();
    }
    format!(
        "source {}..{} -> emitted {}..{}",
        rm.source,
        rm.source + rm.range - 1,
        rm.dest,
        rm.max_dest()
    )
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{rendered}");
    Ok(())
}
