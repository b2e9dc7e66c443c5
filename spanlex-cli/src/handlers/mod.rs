//! Command handlers for the spanlex CLI

pub mod extract;
pub mod rules;
pub mod similarity;

pub use extract::handle_extract_command;
pub use rules::handle_rules_command;
pub use similarity::{handle_distance_command, handle_search_command};
