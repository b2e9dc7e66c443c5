//! Builds a small rule table and extracts entities from a few utterances.
//!
//! Run with `cargo run -p spanlex --example extract_demo`.

use spanlex::prelude::*;

fn main() -> Result<()> {
    let rules = RuleTable::builder()
        .add_enum_texts("en", "hero", "spiderman", ["Spiderman", "spider-man"])
        .add_enum_texts("en", "hero", "ironman", ["Iron Man"])
        .add_after("en", "city", ["in"])
        .add_between("en", "route", ["to"], ["from"])
        .add_between_last("en", "destination", ["to"], ["from"])
        .build()?;

    let pipeline = init(ConfigBuilder::development().build()?)?;

    let utterances = [
        "I saw spederman eating spaghetti",
        "I want to travel to Madrid from Barcelona",
        "Iron man lives in New York, write to tony@stark.com",
        "He finished 2nd with 93.5% of the votes",
    ];

    for utterance in utterances {
        let spans = pipeline.extract_text(utterance, "en", &rules)?;
        println!("{}", utterance);
        println!("  {}", templatize(utterance, &spans));
        for span in &spans {
            println!("  {}", span.format());
        }
        println!();
    }

    Ok(())
}
