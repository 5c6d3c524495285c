//! Static knowledge: lookup tables and keyword matching.
//!
//! Both are built once at startup from literal text and never mutated.

mod matcher;
mod table;

pub use matcher::{KeywordGroup, KeywordMatcher};
pub use table::{LookupTable, LookupTableBuilder};
