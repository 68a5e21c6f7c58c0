//! The allocating mapper at the root of every chain.

use indexmap::map::Entry;
use indexmap::IndexMap;
use line_map::{CallSiteMarker, FileMapping, RawFileMapping, SourceInfo};
use smol_str::SmolStr;

type FileKey = (SmolStr, SmolStr);

/// The root mapper of a chain: owns the synthetic-line counter and the
/// per-file mapping builders for the unit being emitted.
///
/// Holds a cursor over an insertion-ordered file table; entry 0 is always the
/// file being compiled itself, seeded with the identity range over its whole
/// extent.
#[derive(Debug)]
pub struct DefaultMapper {
    source_info: SourceInfo,
    max_used_value: i32,
    call_site: Option<CallSiteMarker>,
    files: IndexMap<FileKey, RawFileMapping>,
    current: usize,
    /// The file whose last range was extended by the most recent allocation;
    /// the next visit tests contiguity against it.
    last_mapped_with_changes: Option<usize>,
}

impl DefaultMapper {
    /// Creates a mapper for the given unit, allocating above its own line
    /// count.
    pub fn new(source_info: SourceInfo) -> Self {
        let line_count = source_info.line_count;
        Self::with_max_used(source_info, line_count)
    }

    /// Creates a mapper whose allocation starts above `max_used_value`.
    ///
    /// Used when rehydrating from an existing aggregate whose destination
    /// lines must not be collided with.
    pub fn with_max_used(source_info: SourceInfo, max_used_value: i32) -> Self {
        let mut origin = RawFileMapping::new(source_info.name.clone(), source_info.path.clone());
        origin.init_range(1, source_info.line_count);
        let mut files = IndexMap::new();
        files.insert((source_info.name.clone(), source_info.path.clone()), origin);
        Self {
            source_info,
            max_used_value,
            call_site: None,
            files,
            current: 0,
            last_mapped_with_changes: None,
        }
    }

    /// Switches the cursor to the given file, creating a fresh builder the
    /// first time a (name, path) pair is seen.
    pub fn visit_source(&mut self, name: &str, path: &str) {
        let key = (SmolStr::new(name), SmolStr::new(path));
        self.current = match self.files.entry(key) {
            Entry::Occupied(entry) => entry.index(),
            Entry::Vacant(entry) => {
                let index = entry.index();
                let (name, path) = entry.key().clone();
                entry.insert(RawFileMapping::new(name, path));
                index
            }
        };
    }

    /// Resets the cursor to the file being compiled itself.
    pub fn visit_origin(&mut self) {
        self.current = 0;
    }

    /// Sets or clears the call-site marker.
    ///
    /// A new call site always starts a fresh range, so the contiguity cache
    /// is dropped even when the marker is replaced by an equal one.
    pub fn set_call_site_marker(&mut self, marker: Option<CallSiteMarker>) {
        self.last_mapped_with_changes = None;
        self.call_site = marker;
    }

    /// The currently active call-site marker.
    #[inline]
    pub fn call_site_marker(&self) -> Option<CallSiteMarker> {
        self.call_site
    }

    /// Top-level visit: the unit's own lines are never remapped (they map
    /// identically through the seeded origin range), and negative lines mean
    /// "no source info" and pass through untouched.
    #[inline]
    pub fn visit_line_number(&self, line: i32) -> i32 {
        line
    }

    /// The allocation path: records a visit to `source` in the named file and
    /// returns the synthetic destination line for it, or `-1` when the line
    /// carries no source info.
    pub fn visit_line_for_source(&mut self, source: i32, name: &str, path: &str) -> i32 {
        if source < 0 {
            return -1;
        }
        self.visit_source(name, path);
        self.create_mapping(source)
    }

    fn create_mapping(&mut self, source: i32) -> i32 {
        let is_contiguous = self.last_mapped_with_changes == Some(self.current);
        let max_used = self.max_used_value;
        let call_site = self.call_site;
        let Some((_, file)) = self.files.get_index_mut(self.current) else {
            unreachable!("file cursor out of range");
        };
        let dest = file.map_new_line_number(source, max_used, is_contiguous, call_site);
        if dest > self.max_used_value {
            self.max_used_value = dest;
            self.last_mapped_with_changes = Some(self.current);
        }
        dest
    }

    /// Appends a pre-computed range to the file under the cursor; the
    /// rehydration path.
    pub(crate) fn map_new_interval(&mut self, source: i32, dest: i32, range: i32) {
        let Some((_, file)) = self.files.get_index_mut(self.current) else {
            unreachable!("file cursor out of range");
        };
        file.map_new_interval(source, dest, range);
    }

    /// All accumulated mappings as immutable [`FileMapping`]s, in
    /// file-first-seen order.
    pub fn result_mappings(&self) -> Vec<FileMapping> {
        self.files.values().map(RawFileMapping::to_file_mapping).collect()
    }

    /// Identity of the unit being compiled.
    #[inline]
    pub fn source_info(&self) -> &SourceInfo {
        &self.source_info
    }

    /// The highest destination line handed out so far.
    #[inline]
    pub fn max_used_value(&self) -> i32 {
        self.max_used_value
    }
}
