//! The seam between the mapper and the class/metadata writer.

use line_map::FileMapping;

use crate::mapper::SourceMapper;

/// Accepts finished per-file mappings for persistence in the compiled
/// class's debug metadata.
pub trait MappingSink {
    /// Receives one finished file mapping.
    fn add_file_mapping(&mut self, mapping: FileMapping);
}

impl MappingSink for Vec<FileMapping> {
    fn add_file_mapping(&mut self, mapping: FileMapping) {
        self.push(mapping);
    }
}

/// Flushes every accumulated file mapping of `mapper` into `sink`.
pub fn flush_to_sink(mapper: &SourceMapper, sink: &mut impl MappingSink) {
    for mapping in mapper.result_mappings() {
        sink.add_file_mapping(mapping);
    }
}
