//! The active line-translation context driven by the code generator while a
//! unit is emitted.
//!
//! A [`SourceMapper`] chain mirrors the nesting of inlining operations: the
//! root default mapper allocates synthetic destination lines and grows the
//! per-file mapping builders; each nested mapper wraps the already-finished
//! mapping table of an inlined function and translates that function's
//! destination lines back to real source lines before forwarding them down
//! the chain for allocation. Pushes and pops follow the lexical inlining
//! scope in strict LIFO order.

mod default;
mod error;
mod mapper;
mod nested;
mod sink;

pub use default::DefaultMapper;
pub use error::MapperError;
pub use mapper::SourceMapper;
pub use nested::NestedMapper;
pub use sink::{flush_to_sink, MappingSink};
