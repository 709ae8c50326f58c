//! Class file parsing for header compilation.
//!
//! Loads the parts of a class file a header compiler needs: names, access
//! flags, member signatures, inner-class records, and annotation retention.
//! Everything else is skipped by length.

pub mod error;
pub mod item;
pub mod stream;
