//! Translating mappers pushed while an inlined body is emitted.

use std::cmp::Ordering;

use line_map::FileRange;
use rustc_hash::FxHashMap;

use crate::error::MapperError;
use crate::mapper::SourceMapper;

/// A mapper wrapping the finished mapping table of a function being inlined.
///
/// Holds that function's intervals sorted by destination position. Each
/// visited destination line is translated back to the source line (and file)
/// it came from, then forwarded to the parent for actual allocation,
/// recursively down to the root [`DefaultMapper`](crate::DefaultMapper).
///
/// Two pure memoizations keep sequential visits cheap: the last range hit,
/// and a map of already-resolved destination lines (several instructions on
/// one statement visit the same line repeatedly). The binary search is the
/// always-correct fallback.
#[derive(Debug)]
pub struct NestedMapper {
    pub(crate) parent: Box<SourceMapper>,
    ranges: Vec<FileRange>,
    last_visited: Option<usize>,
    visited_lines: FxHashMap<i32, i32>,
}

impl NestedMapper {
    /// Wraps `parent` with the given sorted intervals of an inlined function.
    ///
    /// Fails with [`MapperError::EmptyRanges`] when no intervals were
    /// recorded: an inlined call must have produced at least one line.
    pub fn new(parent: Box<SourceMapper>, ranges: Vec<FileRange>) -> Result<Self, MapperError> {
        if ranges.is_empty() {
            return Err(MapperError::EmptyRanges);
        }
        Ok(Self {
            parent,
            ranges,
            last_visited: None,
            visited_lines: FxHashMap::default(),
        })
    }

    /// Translates a visited destination line and forwards it down the chain;
    /// returns the line to emit.
    ///
    /// With `passthrough_own_body` set (the inline-lambda case), lines inside
    /// the first recorded range still belong physically to the file being
    /// compiled and are emitted unchanged.
    ///
    /// # Panics
    ///
    /// Panics when no recorded range covers `line`: every destination line
    /// emitted while inlining must fall inside the callee's own mapping, so a
    /// miss is an ordering bug in the driving code generator.
    pub fn visit_line_number(&mut self, line: i32, passthrough_own_body: bool) -> i32 {
        if passthrough_own_body && self.ranges[0].mapping.contains(line) {
            return line;
        }
        if let Some(&mapped) = self.visited_lines.get(&line) {
            return mapped;
        }

        let index = match self.last_visited {
            Some(index) if self.ranges[index].mapping.contains(line) => index,
            _ => match self.find_mapping(line) {
                Some(index) => index,
                None => panic!("no mapping range covers destination line {line} of an inlined body"),
            },
        };
        let found = &self.ranges[index];
        let source = found.mapping.map_dest_to_source(line);
        let mapped = self.parent.visit_line_for_source(source, &found.name, &found.path);
        if mapped > 0 {
            self.visited_lines.insert(line, mapped);
        }
        self.last_visited = Some(index);
        mapped
    }

    /// Binary search over the destination-sorted intervals, by containment.
    fn find_mapping(&self, dest_line: i32) -> Option<usize> {
        self.ranges
            .binary_search_by(|fr| {
                if fr.mapping.contains(dest_line) {
                    Ordering::Equal
                } else {
                    (fr.mapping.dest, fr.mapping.range).cmp(&(dest_line, 1))
                }
            })
            .ok()
    }

    /// Hands the parent back when this mapper is popped off the chain.
    pub(crate) fn into_parent(self) -> Box<SourceMapper> {
        self.parent
    }

    /// The parent mapper.
    #[inline]
    pub(crate) fn parent_mut(&mut self) -> &mut SourceMapper {
        &mut self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use line_map::RangeMapping;
    use pretty_assertions::assert_eq;
    use smol_str::SmolStr;

    fn ranges(specs: &[(i32, i32, i32)]) -> Vec<FileRange> {
        specs
            .iter()
            .map(|&(source, dest, range)| FileRange {
                mapping: RangeMapping::new(source, dest, range),
                name: SmolStr::new("Callee.kt"),
                path: SmolStr::new("pkg/Callee.kt"),
            })
            .collect()
    }

    #[test]
    fn test_empty_ranges_are_rejected() {
        let result = NestedMapper::new(Box::new(SourceMapper::Identical), Vec::new());
        assert_eq!(result.unwrap_err(), MapperError::EmptyRanges);
    }

    #[test]
    fn test_binary_search_finds_containing_range() {
        let mapper = NestedMapper::new(
            Box::new(SourceMapper::Identical),
            ranges(&[(10, 1, 5), (50, 6, 2), (90, 20, 4)]),
        )
        .unwrap();
        assert_eq!(mapper.find_mapping(3), Some(0));
        assert_eq!(mapper.find_mapping(7), Some(1));
        assert_eq!(mapper.find_mapping(23), Some(2));
        assert_eq!(mapper.find_mapping(8), None);
        assert_eq!(mapper.find_mapping(24), None);
    }
}
