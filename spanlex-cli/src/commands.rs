//! Command enum definitions
//!
//! This module contains all CLI command enums that define the command structure.

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version information
    Version,

    /// Extract entities from an utterance
    #[command(
        alias = "x",
        long_about = r#"
Run the full extraction pipeline over one utterance: enumerated entities are
matched fuzzily, trim entities are cut around their anchor words, builtin
formats (emails, URLs, numbers, ...) are recognized, and conflicting spans
are resolved.

EXAMPLES:
  spanlex-cli extract "I saw spederman in Madrid" --locale en
  spanlex-cli extract "from Paris to Rome" --only route --output json
"#
    )]
    Extract(ExtractArgs),

    /// Edit distance between two texts
    Distance(DistanceArgs),

    /// Find the window of a text closest to a phrase
    Search(SearchArgs),

    /// Rule table management commands
    #[command(subcommand)]
    Rules(RulesCommands),
}

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// Print the rule table
    #[command(alias = "list")]
    Show(ShowRulesArgs),

    /// Add surface texts to an enumerated entity option
    AddText(EnumTextArgs),

    /// Remove surface texts from an enumerated entity option
    RemoveText(EnumTextArgs),

    /// Add an anchor condition to a trim entity
    AddTrim(AddTrimArgs),

    /// Remove an entity
    #[command(alias = "rm")]
    RemoveEntity(RemoveEntityArgs),
}
