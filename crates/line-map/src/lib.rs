//! Line-number mapping data model for the bytecode backend.
//!
//! This crate provides the types that track, across function inlining, which
//! emitted line number corresponds to which original source line: individual
//! contiguous [`RangeMapping`]s, their per-file grouping ([`FileMapping`] and
//! its mutable builder [`RawFileMapping`]), and the finished per-unit
//! aggregate [`Smap`] consumed by the serializer and by later inlining passes.

mod error;
mod file;
mod range;
mod smap;

pub use error::SmapError;
pub use file::{FileMapping, RawFileMapping, FOLD_WINDOW};
pub use range::{cmp_by_position, CallSiteMarker, RangeMapping};
pub use smap::{FileRange, Smap, SourceInfo};
