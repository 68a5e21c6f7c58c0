//! Contiguous line-range mappings.

use std::cmp::Ordering;

/// The source line of the call that caused a range to be recorded.
///
/// Set by the code generator immediately before emitting an inlined call and
/// cleared or replaced per call. Ranges created while a marker is active carry
/// it, which is what the debug stratum of the serialized output is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSiteMarker {
    /// The line number of the call site.
    pub line_number: i32,
}

impl CallSiteMarker {
    /// Creates a marker for the given call-site line.
    #[inline]
    pub fn new(line_number: i32) -> Self {
        Self { line_number }
    }
}

/// A contiguous run of source lines mapped one-to-one to a contiguous run of
/// destination lines.
///
/// Represents the interval `[dest, dest + range)` mapping linearly onto
/// `[source, source + range)`. The [`RangeMapping::SKIP`] sentinel
/// (`source == dest == -1`) means "no source information": it contains every
/// line and both map operations return `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeMapping {
    /// First source line of the run.
    pub source: i32,
    /// First destination line of the run.
    pub dest: i32,
    /// Number of lines in the run.
    pub range: i32,
    /// The call site this range originated from, if any.
    pub call_site: Option<CallSiteMarker>,
}

impl RangeMapping {
    /// Sentinel meaning "no information, pass through unchanged".
    pub const SKIP: RangeMapping = RangeMapping {
        source: -1,
        dest: -1,
        range: 1,
        call_site: None,
    };

    /// Creates a mapping of `range` lines starting at `source` and `dest`.
    #[inline]
    pub fn new(source: i32, dest: i32, range: i32) -> Self {
        Self {
            source,
            dest,
            range,
            call_site: None,
        }
    }

    /// Creates a mapping carrying an optional call-site marker.
    #[inline]
    pub fn with_call_site(source: i32, dest: i32, range: i32, call_site: Option<CallSiteMarker>) -> Self {
        Self {
            source,
            dest,
            range,
            call_site,
        }
    }

    /// Returns true if this is the SKIP sentinel.
    #[inline]
    pub fn is_skip(&self) -> bool {
        self.source == -1 && self.dest == -1
    }

    /// The last destination line covered by this range.
    #[inline]
    pub fn max_dest(&self) -> i32 {
        self.dest + self.range - 1
    }

    /// Returns true if `dest_line` falls inside this range.
    ///
    /// The SKIP sentinel contains every line.
    #[inline]
    pub fn contains(&self, dest_line: i32) -> bool {
        if self.is_skip() {
            true
        } else {
            self.dest <= dest_line && dest_line < self.dest + self.range
        }
    }

    /// Maps a destination line back to its source line, or `-1` for SKIP.
    #[inline]
    pub fn map_dest_to_source(&self, dest_line: i32) -> i32 {
        if self.is_skip() {
            -1
        } else {
            self.source + (dest_line - self.dest)
        }
    }

    /// Maps a source line to its destination line, or `-1` for SKIP.
    #[inline]
    pub fn map_source_to_dest(&self, source_line: i32) -> i32 {
        if self.is_skip() {
            -1
        } else {
            self.dest + (source_line - self.source)
        }
    }
}

/// Positional ordering used for interval sorting and binary search: primary
/// key `dest` ascending, tie-break `range` ascending.
///
/// Deliberately a free function rather than an `Ord` impl: two ranges at the
/// same position can have different sources, which would make `Ord`
/// inconsistent with `Eq`.
#[inline]
pub fn cmp_by_position(a: &RangeMapping, b: &RangeMapping) -> Ordering {
    (a.dest, a.range).cmp(&(b.dest, b.range))
}
