//! Per-file range collections: the immutable [`FileMapping`] used for output
//! and its mutable builder counterpart [`RawFileMapping`].

use smol_str::SmolStr;

use crate::range::{CallSiteMarker, RangeMapping};

/// Maximum gap between consecutively visited source lines that still folds
/// into the previous range instead of opening a new one.
///
/// Fixed heuristic bounding mapping-table size for line-stepping code.
pub const FOLD_WINDOW: i32 = 10;

/// Name/path pair used for the distinguished "no source info" mapping.
const NO_SOURCE_INFO: &str = "no-source-info";

/// Sentinel for `last_mapped_source_line` before any line has been mapped,
/// far enough below any real line that the fold window can never match it.
const UNMAPPED: i32 = -1000;

/// The finalized, read-only ordered collection of [`RangeMapping`]s belonging
/// to one named source file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileMapping {
    /// Short file name, e.g. `Foo.kt`.
    pub name: SmolStr,
    /// Path (or cleaned fully-qualified name) identifying the file.
    pub path: SmolStr,
    line_mappings: Vec<RangeMapping>,
}

impl FileMapping {
    /// Creates an empty mapping for the given file.
    pub fn new(name: impl Into<SmolStr>, path: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            line_mappings: Vec::new(),
        }
    }

    /// The distinguished mapping meaning "no source info available" for a
    /// whole file: a single [`RangeMapping::SKIP`] range.
    pub fn skip() -> Self {
        let mut mapping = Self::new(NO_SOURCE_INFO, NO_SOURCE_INFO);
        mapping.add_range_mapping(RangeMapping::SKIP);
        mapping
    }

    /// Returns true if this mapping carries no real source info (empty, or
    /// its first range is the SKIP sentinel). The serializer filters these.
    pub fn is_skip(&self) -> bool {
        self.line_mappings.first().map_or(true, |r| r.is_skip())
    }

    /// Appends a range to this file's mapping.
    pub fn add_range_mapping(&mut self, mapping: RangeMapping) {
        self.line_mappings.push(mapping);
    }

    /// The ordered ranges of this file.
    #[inline]
    pub fn line_mappings(&self) -> &[RangeMapping] {
        &self.line_mappings
    }
}

/// The growable builder used while a file's mapping is accumulated during
/// code emission.
///
/// Mutated only by the single default mapper at the root of a mapper chain,
/// one pass per compiled unit.
#[derive(Debug)]
pub struct RawFileMapping {
    name: SmolStr,
    path: SmolStr,
    range_mappings: Vec<RangeMapping>,
    last_mapped_source_line: i32,
}

impl RawFileMapping {
    /// Creates an empty builder for the given file.
    pub fn new(name: SmolStr, path: SmolStr) -> Self {
        Self {
            name,
            path,
            range_mappings: Vec::new(),
            last_mapped_source_line: UNMAPPED,
        }
    }

    /// Seeds the identity range covering the whole original file.
    ///
    /// Only valid on an empty builder; used once when the mapping for the
    /// file being compiled itself is created.
    pub fn init_range(&mut self, start: i32, end: i32) {
        debug_assert!(
            self.range_mappings.is_empty(),
            "init_range called on a non-empty mapping"
        );
        self.range_mappings.push(RangeMapping::new(start, start, end - start + 1));
        self.last_mapped_source_line = end;
    }

    /// Records a visit to `source` and returns the destination line it maps
    /// to.
    ///
    /// When the caller claims the previous visit was contiguous with this one
    /// and the source line is within [`FOLD_WINDOW`] lines past the last one
    /// mapped, the last range is extended instead of a new one being opened.
    /// Otherwise a fresh single-line range is allocated at `current_max + 1`,
    /// tagged with the active call-site marker.
    pub fn map_new_line_number(
        &mut self,
        source: i32,
        current_max: i32,
        is_contiguous_with_last: bool,
        call_site: Option<CallSiteMarker>,
    ) -> i32 {
        let last_mapped = self.last_mapped_source_line;
        let dest = match self.range_mappings.last_mut() {
            Some(last) if is_contiguous_with_last && could_fold(last_mapped, source) => {
                last.range += source - last_mapped;
                last.map_source_to_dest(source)
            }
            _ => {
                let dest = current_max + 1;
                self.range_mappings
                    .push(RangeMapping::with_call_site(source, dest, 1, call_site));
                dest
            }
        };
        self.last_mapped_source_line = source;
        dest
    }

    /// Appends a pre-computed range verbatim.
    ///
    /// Used when rehydrating a mapper from an already-finished aggregate; no
    /// folding or allocation is involved.
    pub fn map_new_interval(&mut self, source: i32, dest: i32, range: i32) {
        self.range_mappings.push(RangeMapping::new(source, dest, range));
    }

    /// Produces the immutable form of this mapping.
    pub fn to_file_mapping(&self) -> FileMapping {
        let mut mapping = FileMapping::new(self.name.clone(), self.path.clone());
        for range in &self.range_mappings {
            mapping.add_range_mapping(*range);
        }
        mapping
    }
}

fn could_fold(last_mapped: i32, source: i32) -> bool {
    let delta = source - last_mapped;
    delta > 0 && delta <= FOLD_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(name: &str) -> RawFileMapping {
        RawFileMapping::new(SmolStr::new(name), SmolStr::new(name))
    }

    #[test]
    fn test_first_visit_allocates_past_current_max() {
        let mut mapping = raw("A.kt");
        let dest = mapping.map_new_line_number(7, 20, false, None);
        assert_eq!(dest, 21);
        let fm = mapping.to_file_mapping();
        assert_eq!(fm.line_mappings(), &[RangeMapping::new(7, 21, 1)]);
    }

    #[test]
    fn test_contiguous_visits_fold_into_one_range() {
        let mut mapping = raw("A.kt");
        let first = mapping.map_new_line_number(7, 20, false, None);
        let second = mapping.map_new_line_number(9, first, true, None);
        assert_eq!(first, 21);
        assert_eq!(second, 23);
        let fm = mapping.to_file_mapping();
        assert_eq!(fm.line_mappings(), &[RangeMapping::new(7, 21, 3)]);
    }

    #[test]
    fn test_gap_beyond_window_opens_new_range() {
        let mut mapping = raw("A.kt");
        let first = mapping.map_new_line_number(7, 20, false, None);
        let second = mapping.map_new_line_number(7 + FOLD_WINDOW + 1, first, true, None);
        assert_eq!(second, 22);
        assert_eq!(mapping.to_file_mapping().line_mappings().len(), 2);
    }

    #[test]
    fn test_revisit_of_same_line_does_not_fold() {
        // Delta of zero fails the fold test; a fresh range is allocated.
        let mut mapping = raw("A.kt");
        let first = mapping.map_new_line_number(7, 20, false, None);
        let second = mapping.map_new_line_number(7, first, true, None);
        assert_eq!(second, 22);
        assert_eq!(mapping.to_file_mapping().line_mappings().len(), 2);
    }

    #[test]
    fn test_non_contiguous_claim_opens_new_range() {
        let mut mapping = raw("A.kt");
        let first = mapping.map_new_line_number(7, 20, false, None);
        let second = mapping.map_new_line_number(8, first, false, None);
        assert_eq!(second, 22);
        assert_eq!(mapping.to_file_mapping().line_mappings().len(), 2);
    }

    #[test]
    fn test_call_site_marker_attached_to_new_ranges() {
        let mut mapping = raw("A.kt");
        mapping.map_new_line_number(7, 20, false, Some(CallSiteMarker::new(42)));
        let fm = mapping.to_file_mapping();
        assert_eq!(fm.line_mappings()[0].call_site, Some(CallSiteMarker::new(42)));
    }

    #[test]
    fn test_init_range_seeds_identity() {
        let mut mapping = raw("Foo.kt");
        mapping.init_range(1, 30);
        let fm = mapping.to_file_mapping();
        assert_eq!(fm.line_mappings(), &[RangeMapping::new(1, 1, 30)]);
        // The seeded extent counts as "last mapped": line 2 cannot fold
        // backwards into it.
        let mut mapping = raw("Foo.kt");
        mapping.init_range(1, 30);
        let dest = mapping.map_new_line_number(2, 30, true, None);
        assert_eq!(dest, 31);
    }

    #[test]
    fn test_map_new_interval_appends_verbatim() {
        let mut mapping = raw("B.kt");
        mapping.map_new_interval(5, 11, 3);
        mapping.map_new_interval(100, 14, 1);
        let fm = mapping.to_file_mapping();
        assert_eq!(
            fm.line_mappings(),
            &[RangeMapping::new(5, 11, 3), RangeMapping::new(100, 14, 1)]
        );
    }

    #[test]
    fn test_skip_file_mapping() {
        let skip = FileMapping::skip();
        assert!(skip.is_skip());
        // An empty mapping also counts as skip for serialization purposes.
        assert!(FileMapping::new("A.kt", "A.kt").is_skip());
        let mut real = FileMapping::new("A.kt", "A.kt");
        real.add_range_mapping(RangeMapping::new(1, 1, 1));
        assert!(!real.is_skip());
    }
}
