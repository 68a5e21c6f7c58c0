//! The finished per-unit mapping aggregate.

use smol_str::SmolStr;

use crate::error::SmapError;
use crate::file::FileMapping;
use crate::range::{cmp_by_position, RangeMapping};

/// Identity and extent of the source file a unit is compiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceInfo {
    /// Short file name.
    pub name: SmolStr,
    /// Path or cleaned fully-qualified name.
    pub path: SmolStr,
    /// Number of lines in the file.
    pub line_count: i32,
}

impl SourceInfo {
    /// Creates source info for a file of `line_count` lines.
    pub fn new(name: impl Into<SmolStr>, path: impl Into<SmolStr>, line_count: i32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            line_count,
        }
    }
}

/// A range paired with the file it belongs to.
///
/// This is the flattened view a nested mapper works on: translating one of
/// its destination lines yields both a source line and the file that line
/// lives in, which together are forwarded to the parent mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRange {
    /// The range itself.
    pub mapping: RangeMapping,
    /// Name of the owning file.
    pub name: SmolStr,
    /// Path of the owning file.
    pub path: SmolStr,
}

/// The finished, read-only mapping table for a whole compiled unit: a
/// non-empty ordered set of [`FileMapping`]s, the first of which covers the
/// unit's own source file.
///
/// Immutable once constructed. Owned by the unit that built it, then handed
/// off for serialization or consumed read-only as the inlining input of
/// another unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Smap {
    file_mappings: Vec<FileMapping>,
}

impl Smap {
    /// Assembles an aggregate from per-file mappings.
    ///
    /// Fails if the list is empty or the default (first) mapping has no
    /// ranges; both indicate a bug in the emitting code.
    pub fn new(file_mappings: Vec<FileMapping>) -> Result<Self, SmapError> {
        let default = file_mappings.first().ok_or(SmapError::EmptyFileMappings)?;
        if default.line_mappings().is_empty() {
            return Err(SmapError::EmptyDefaultMapping);
        }
        Ok(Self { file_mappings })
    }

    /// All per-file mappings, in file-first-seen order.
    #[inline]
    pub fn file_mappings(&self) -> &[FileMapping] {
        &self.file_mappings
    }

    /// The mapping of the compiled unit's own file.
    #[inline]
    pub fn default_mapping(&self) -> &FileMapping {
        &self.file_mappings[0]
    }

    /// Source identity and extent of the compiled unit, inferred from the
    /// default file's first range.
    pub fn source_info(&self) -> SourceInfo {
        let default = self.default_mapping();
        // Constructor guarantees at least one range here.
        let first = &default.line_mappings()[0];
        SourceInfo::new(
            default.name.clone(),
            default.path.clone(),
            first.source + first.range - 1,
        )
    }

    /// Every range across all files, each paired with its file, sorted by
    /// destination position.
    pub fn intervals(&self) -> Vec<FileRange> {
        let mut intervals: Vec<FileRange> = self
            .file_mappings
            .iter()
            .flat_map(|fm| {
                fm.line_mappings().iter().map(|rm| FileRange {
                    mapping: *rm,
                    name: fm.name.clone(),
                    path: fm.path.clone(),
                })
            })
            .collect();
        intervals.sort_by(|a, b| cmp_by_position(&a.mapping, &b.mapping));
        intervals
    }

    /// The highest destination line covered anywhere in this aggregate.
    ///
    /// A mapper rehydrated from this aggregate starts allocating above it so
    /// new lines never collide with pre-existing ones.
    pub fn max_dest(&self) -> i32 {
        self.file_mappings
            .iter()
            .flat_map(|fm| fm.line_mappings())
            .map(RangeMapping::max_dest)
            .max()
            .unwrap_or(-1)
    }
}
