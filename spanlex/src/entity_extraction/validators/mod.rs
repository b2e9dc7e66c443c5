//! Span validators for the extraction pipeline.

pub mod bounds;
pub mod confidence;

pub use bounds::BoundsValidator;
pub use confidence::ConfidenceValidator;
