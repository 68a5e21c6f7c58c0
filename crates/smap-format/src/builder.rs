//! Serialization of a finished mapping table into SMAP text.

use line_map::{FileMapping, RangeMapping, Smap};

use crate::{END, FILE_SECTION, KOTLIN_DEBUG_STRATA_NAME, KOTLIN_STRATA_NAME, LINE_SECTION, SMAP_HEADER};

/// Serializes a set of per-file mappings into the two-stratum text format.
///
/// The default stratum lists every real file mapping; the debug stratum is
/// emitted only when some range carries a call-site marker, and re-expresses
/// each such range against the call site it originated from, rooted at the
/// compiled unit's own file.
pub struct SmapBuilder<'a> {
    source: &'a str,
    path: &'a str,
    file_mappings: &'a [FileMapping],
}

impl<'a> SmapBuilder<'a> {
    /// Creates a builder for the unit identified by `source`/`path`.
    pub fn new(source: &'a str, path: &'a str, file_mappings: &'a [FileMapping]) -> Self {
        Self {
            source,
            path,
            file_mappings,
        }
    }

    /// Creates a builder straight from a finished aggregate.
    pub fn from_smap(smap: &'a Smap) -> Self {
        let default = smap.default_mapping();
        Self::new(&default.name, &default.path, smap.file_mappings())
    }

    /// Produces the serialized text, or `None` when no mapping carries real
    /// source info (absence of debug info is a valid compiled state).
    pub fn build(&self) -> Option<String> {
        let real: Vec<&FileMapping> = self.file_mappings.iter().filter(|fm| !fm.is_skip()).collect();
        if real.is_empty() {
            return None;
        }

        let mut out = String::new();
        out.push_str(SMAP_HEADER);
        out.push('\n');
        out.push_str(self.source);
        out.push('\n');
        out.push_str(KOTLIN_STRATA_NAME);
        out.push('\n');
        write_stratum(&mut out, KOTLIN_STRATA_NAME, &real);

        if let Some(combined) = self.combine_call_site_ranges(&real) {
            write_stratum(&mut out, KOTLIN_DEBUG_STRATA_NAME, &[&combined]);
        }

        Some(out)
    }

    /// Collapses every range that carries a call-site marker into one
    /// synthetic mapping rooted at the unit's own file, with `source`
    /// replaced by the marker line.
    fn combine_call_site_ranges(&self, real: &[&FileMapping]) -> Option<FileMapping> {
        let mut combined = FileMapping::new(self.source, self.path);
        for fm in real {
            for rm in fm.line_mappings() {
                if let Some(call_site) = rm.call_site {
                    combined.add_range_mapping(RangeMapping::new(
                        call_site.line_number,
                        rm.dest,
                        rm.range,
                    ));
                }
            }
        }
        if combined.line_mappings().is_empty() {
            None
        } else {
            Some(combined)
        }
    }
}

fn write_stratum(out: &mut String, name: &str, mappings: &[&FileMapping]) {
    out.push_str("*S ");
    out.push_str(name);
    out.push('\n');

    out.push_str(FILE_SECTION);
    for (index, fm) in mappings.iter().enumerate() {
        out.push_str(&format!("\n+ {} {}\n{}", index + 1, fm.name, fm.path));
    }
    out.push('\n');

    out.push_str(LINE_SECTION);
    for (index, fm) in mappings.iter().enumerate() {
        for rm in fm.line_mappings() {
            out.push('\n');
            out.push_str(&line_entry(rm, index + 1));
        }
    }
    out.push('\n');

    out.push_str(END);
    out.push('\n');
}

/// One `*L` entry: `source#fileId,range:dest`, with `,range` omitted for
/// single-line ranges.
fn line_entry(rm: &RangeMapping, file_id: usize) -> String {
    if rm.range == 1 {
        format!("{}#{}:{}", rm.source, file_id, rm.dest)
    } else {
        format!("{}#{},{}:{}", rm.source, file_id, rm.range, rm.dest)
    }
}
