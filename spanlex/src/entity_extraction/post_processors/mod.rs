//! Span post-processors for the extraction pipeline.

pub mod splitter;

pub use splitter::TrimSplitter;
