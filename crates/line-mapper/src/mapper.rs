//! The mapper chain and its dispatch.

use std::mem;

use line_map::{CallSiteMarker, FileMapping, Smap, SmapError, SourceInfo};

use crate::default::DefaultMapper;
use crate::error::MapperError;
use crate::nested::NestedMapper;

/// The active line-translation context during code emission.
///
/// The variant set is closed and exhaustive: an identity passthrough for
/// units compiled without debug mapping, the allocating default mapper at the
/// root of every real chain, and the two translating variants pushed while an
/// inlined body is emitted. Nested mappers own their parent, so the chain is
/// a singly-linked list torn down by explicit [`pop_nested`] on scope exit.
///
/// [`pop_nested`]: SourceMapper::pop_nested
#[derive(Debug)]
pub enum SourceMapper {
    /// No-op passthrough; used when no debug mapping is desired.
    Identical,
    /// The allocating root mapper.
    Default(DefaultMapper),
    /// Translates an inlined function's lines through its finished mapping.
    Nested(NestedMapper),
    /// Like [`SourceMapper::Nested`], but lines inside the lambda body's own
    /// first range pass through unchanged: they still belong physically to
    /// the file being compiled.
    InlineLambda(NestedMapper),
}

impl SourceMapper {
    /// Creates the root mapper for a unit compiled with debug mapping.
    pub fn new(source_info: SourceInfo) -> Self {
        Self::Default(DefaultMapper::new(source_info))
    }

    /// Rehydrates a continuing mapper from an already-finished aggregate.
    ///
    /// The new mapper allocates above the aggregate's highest destination
    /// line so fresh lines never collide with pre-existing ones, and every
    /// non-default file mapping is replayed verbatim.
    pub fn from_smap(smap: &Smap) -> Self {
        let mut mapper = DefaultMapper::with_max_used(smap.source_info(), smap.max_dest());
        // The default mapping is re-seeded through the source info.
        for fm in smap.file_mappings().iter().skip(1) {
            mapper.visit_source(&fm.name, &fm.path);
            for rm in fm.line_mappings() {
                mapper.map_new_interval(rm.source, rm.dest, rm.range);
            }
        }
        Self::Default(mapper)
    }

    /// Switches the allocation cursor to the given file.
    pub fn visit_source(&mut self, name: &str, path: &str) {
        match self {
            Self::Identical => {}
            Self::Default(mapper) => mapper.visit_source(name, path),
            Self::Nested(nested) | Self::InlineLambda(nested) => {
                nested.parent_mut().visit_source(name, path);
            }
        }
    }

    /// Resets the allocation cursor to the file being compiled itself.
    pub fn visit_origin(&mut self) {
        match self {
            Self::Identical => {}
            Self::Default(mapper) => mapper.visit_origin(),
            Self::Nested(nested) | Self::InlineLambda(nested) => {
                nested.parent_mut().visit_origin();
            }
        }
    }

    /// Sets or clears the call-site marker on the allocating root.
    pub fn set_call_site_marker(&mut self, marker: Option<CallSiteMarker>) {
        match self {
            Self::Identical => {}
            Self::Default(mapper) => mapper.set_call_site_marker(marker),
            Self::Nested(nested) | Self::InlineLambda(nested) => {
                nested.parent_mut().set_call_site_marker(marker);
            }
        }
    }

    /// Visits a line about to be emitted and returns the line to actually
    /// emit.
    ///
    /// On the root this is the identity (negative "no info" lines included);
    /// on nested variants the line is translated through the inlined
    /// function's ranges and forwarded down the chain for allocation.
    pub fn visit_line_number(&mut self, line: i32) -> i32 {
        match self {
            Self::Identical => line,
            Self::Default(mapper) => mapper.visit_line_number(line),
            Self::Nested(nested) => nested.visit_line_number(line, false),
            Self::InlineLambda(nested) => nested.visit_line_number(line, true),
        }
    }

    /// Records a visit to a real source position and returns the synthetic
    /// destination line allocated for it (`-1` when `source` is negative).
    ///
    /// This is the downward-forwarding path of the chain; the root performs
    /// the actual allocation.
    ///
    /// # Panics
    ///
    /// Panics on [`SourceMapper::Identical`]: an identity mapper can never be
    /// the allocating parent of a nested chain.
    pub fn visit_line_for_source(&mut self, source: i32, name: &str, path: &str) -> i32 {
        match self {
            Self::Identical => {
                panic!("line allocation requested on an identity mapper")
            }
            Self::Default(mapper) => mapper.visit_line_for_source(source, name, path),
            Self::Nested(nested) | Self::InlineLambda(nested) => {
                nested.parent_mut().visit_line_for_source(source, name, path)
            }
        }
    }

    /// Pushes a nested mapper wrapping `callee`'s finished mapping table.
    ///
    /// Called when emission enters an inlined call's body; `is_lambda` marks
    /// an inline lambda, whose own-body lines pass through unchanged.
    pub fn push_nested(&mut self, callee: &Smap, is_lambda: bool) -> Result<(), MapperError> {
        let ranges = callee.intervals();
        if ranges.is_empty() {
            return Err(MapperError::EmptyRanges);
        }
        let parent = Box::new(mem::replace(self, Self::Identical));
        // Non-empty checked above, so this cannot fail.
        let nested = NestedMapper::new(parent, ranges)?;
        *self = if is_lambda {
            Self::InlineLambda(nested)
        } else {
            Self::Nested(nested)
        };
        Ok(())
    }

    /// Pops the innermost nested mapper, restoring its parent as the active
    /// mapper with the cursor back on the origin file.
    ///
    /// # Panics
    ///
    /// Panics when no nested mapper is on the chain; pushes and pops must
    /// mirror the inlining scope exactly.
    pub fn pop_nested(&mut self) {
        match mem::replace(self, Self::Identical) {
            Self::Nested(nested) | Self::InlineLambda(nested) => {
                let mut parent = *nested.into_parent();
                parent.visit_origin();
                *self = parent;
            }
            Self::Identical | Self::Default(_) => {
                panic!("pop_nested called with no nested mapper on the chain")
            }
        }
    }

    /// All accumulated mappings in file-first-seen order, as handed to the
    /// class writer.
    pub fn result_mappings(&self) -> Vec<FileMapping> {
        match self {
            Self::Identical => Vec::new(),
            Self::Default(mapper) => mapper.result_mappings(),
            Self::Nested(nested) | Self::InlineLambda(nested) => nested.parent.result_mappings(),
        }
    }

    /// Finishes emission of the unit and assembles the aggregate mapping
    /// table.
    pub fn finish(self) -> Result<Smap, MapperError> {
        match self {
            Self::Identical => Err(MapperError::Smap(SmapError::EmptyFileMappings)),
            Self::Default(mapper) => Ok(Smap::new(mapper.result_mappings())?),
            Self::Nested(_) | Self::InlineLambda(_) => Err(MapperError::UnfinishedChain),
        }
    }
}
