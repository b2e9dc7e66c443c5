//! Distance and search command handlers

use crate::args::{DistanceArgs, SearchArgs};
use crate::output::*;
use colored::*;
use serde_json::json;
use spanlex::similarity::{EditDistance, SimilarSearch, SpanMatch};

pub fn handle_distance_command(args: DistanceArgs, output_format: &str) -> spanlex::Result<()> {
    let distance = EditDistance::new()
        .with_normalize(args.normalize)
        .with_collator(args.collator)
        .distance(&args.a, &args.b);

    if output_format == "json" {
        let response = json!({
            "a": args.a,
            "b": args.b,
            "normalize": args.normalize,
            "collator": args.collator,
            "distance": distance,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!(
            "{} {}",
            "Distance:".color(CliColors::muted()),
            distance.to_string().bold()
        );
    }
    Ok(())
}

/// Windows of `args.source` matching `args.target` as the arguments ask.
pub fn search_windows(args: &SearchArgs) -> Vec<SpanMatch> {
    let distance = if args.raw {
        EditDistance::new()
    } else {
        EditDistance::normalized()
    };
    let search = SimilarSearch::new().with_distance(distance);

    if args.list || args.threshold.is_some() {
        search.best_span_list(&args.source, &args.target, args.threshold, None)
    } else {
        search
            .best_span(&args.source, &args.target, None)
            .into_iter()
            .collect()
    }
}

pub fn handle_search_command(args: SearchArgs, output_format: &str) -> spanlex::Result<()> {
    let windows = search_windows(&args);

    if output_format == "json" {
        let matches: Vec<_> = windows
            .iter()
            .map(|found| {
                let text: String = args.source.chars().skip(found.start).take(found.len).collect();
                json!({
                    "start": found.start,
                    "end": found.end,
                    "len": found.len,
                    "levenshtein": found.levenshtein,
                    "accuracy": found.accuracy,
                    "text": text,
                })
            })
            .collect();
        let response = json!({
            "source": args.source,
            "target": args.target,
            "matches": matches,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else if windows.is_empty() {
        println!("{}", format_info("No matching window found."));
    } else {
        for found in &windows {
            print_span_match(&args.source, found);
        }
    }
    Ok(())
}
