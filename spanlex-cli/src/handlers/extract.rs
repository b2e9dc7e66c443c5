//! Extraction command handler

use crate::args::ExtractArgs;
use crate::context::SpanlexCliContext;
use crate::output::*;
use serde_json::json;
use spanlex::config::validation;
use spanlex::entity_extraction::{EnumMatchMode, ExtractionPipeline, ExtractionRequest, Span, templatize};

/// Runs the pipeline for `args`, rebuilding it when the arguments override settings.
pub fn extract_spans(args: &ExtractArgs, ctx: &SpanlexCliContext) -> spanlex::Result<Vec<Span>> {
    let mut request = ExtractionRequest::new(args.text.clone());
    if let Some(locale) = &args.locale {
        request = request.locale(locale.clone());
    }
    if !args.only.is_empty() {
        request = request.whitelist(args.only.iter().cloned());
    }

    if args.threshold.is_none() && !args.all {
        return ctx.pipeline.extract(request, &ctx.rules);
    }

    let mut config = ctx.config.entity_extraction.clone();
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.all {
        config.enum_mode = EnumMatchMode::All;
    }
    validation::validate_entity_extraction_config(&config)?;

    ExtractionPipeline::from_config(&config).extract(request, &ctx.rules)
}

pub fn handle_extract_command(
    args: ExtractArgs,
    ctx: &SpanlexCliContext,
    output_format: &str,
) -> spanlex::Result<()> {
    let spans = extract_spans(&args, ctx)?;
    tracing::debug!(spans = spans.len(), "Extraction finished");

    if output_format == "json" {
        let response = if args.template {
            json!({
                "utterance": args.text,
                "template": templatize(&args.text, &spans),
                "entities": spans,
            })
        } else {
            json!({
                "utterance": args.text,
                "entities": spans,
            })
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_span_list(&spans);
        if args.template {
            println!();
            println!("{}", templatize(&args.text, &spans));
        }
    }

    Ok(())
}
