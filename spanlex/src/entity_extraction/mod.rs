//! Entity extraction over free-text utterances.
//!
//! This module recognizes named entities with three recognizer families and
//! reconciles their output:
//!
//! - [`EnumMatcher`]: fuzzy lookup of enumerated entity texts
//! - [`TrimMatcher`]: spans positioned around literal anchor words
//! - [`BuiltinRecognizer`]: regex formats such as emails, URLs and numbers
//!
//! [`ExtractionPipeline`] runs them over one utterance, validates the
//! candidates, splits trim spans around nested entities and hands the result
//! to the [`SpanConflictResolver`].

mod types;
mod traits;
mod builtin;
mod enum_matcher;
mod trim_matcher;
mod locale;
mod resolution;
pub mod config;
pub mod rules;
// Generic pipeline architecture
pub mod pipeline;
pub mod validators;
pub mod post_processors;

pub use types::*;
pub use traits::*;
pub use builtin::*;
pub use enum_matcher::*;
pub use trim_matcher::*;
pub use locale::*;
pub use resolution::*;
pub use config::*;
pub use rules::*;
// Export pipeline components
pub use pipeline::*;
pub use validators::*;
pub use post_processors::*;
