//! Rule table command handlers

use crate::args::*;
use crate::commands::RulesCommands;
use crate::context::SpanlexCliContext;
use crate::output::*;
use serde_json::json;
use spanlex::SpanlexError;
use spanlex::entity_extraction::{AnchorPosition, BetweenStrategy, RuleTable, TrimOptions};

pub fn handle_rules_command(
    cmd: RulesCommands,
    ctx: &mut SpanlexCliContext,
    output_format: &str,
) -> spanlex::Result<()> {
    match cmd {
        RulesCommands::Show(args) => {
            if output_format == "json" {
                println!("{}", ctx.rules.to_json()?);
            } else {
                print_rule_table(&ctx.rules, args.locale.as_deref());
            }
            return Ok(());
        }

        RulesCommands::AddText(args) => {
            let rules = ctx
                .rules
                .to_builder()
                .add_enum_texts(&args.locale, &args.entity, &args.option, args.texts.iter().cloned())
                .build()?;
            ctx.save_rules(rules)?;
            report(
                output_format,
                "add-text",
                &args.entity,
                &format!(
                    "Added {} text(s) to {}/{} ({})",
                    args.texts.len(),
                    args.entity,
                    args.option,
                    args.locale
                ),
            );
        }

        RulesCommands::RemoveText(args) => {
            let rules = ctx
                .rules
                .to_builder()
                .remove_enum_texts(&args.locale, &args.entity, &args.option, &args.texts)
                .build()?;
            ctx.save_rules(rules)?;
            report(
                output_format,
                "remove-text",
                &args.entity,
                &format!("Removed text(s) from {}/{} ({})", args.entity, args.option, args.locale),
            );
        }

        RulesCommands::AddTrim(args) => {
            let rules = add_trim(&ctx.rules, &args)?;
            ctx.save_rules(rules)?;
            report(
                output_format,
                "add-trim",
                &args.entity,
                &format!(
                    "Added {} condition to {} ({})",
                    args.position, args.entity, args.locale
                ),
            );
        }

        RulesCommands::RemoveEntity(args) => {
            let builder = ctx.rules.to_builder();
            let rules = match &args.locale {
                Some(locale) => builder.remove_entity_in(locale, &args.entity),
                None => builder.remove_entity(&args.entity),
            }
            .build()?;
            ctx.save_rules(rules)?;
            report(
                output_format,
                "remove-entity",
                &args.entity,
                &format!("Removed entity {}", args.entity),
            );
        }
    }

    tracing::info!(path = %ctx.rules_path.display(), "Rule table saved");
    Ok(())
}

/// The rule table with the trim condition described by `args` added.
pub fn add_trim(rules: &RuleTable, args: &AddTrimArgs) -> spanlex::Result<RuleTable> {
    let options = TrimOptions {
        no_spaces: args.no_spaces,
        case_insensitive: args.case_insensitive,
        skip: args.skip.clone(),
    };

    let strategy = match args.position.to_lowercase().replace('_', "-").as_str() {
        "between" => Some(BetweenStrategy::Simplest),
        "between-last" => Some(BetweenStrategy::Last),
        _ => None,
    };

    let builder = rules.to_builder();
    let builder = match strategy {
        Some(strategy) => {
            if args.left.is_empty() || args.right.is_empty() {
                return Err(SpanlexError::Rule(
                    "Between conditions need --left and --right anchor words".to_string(),
                ));
            }
            builder.add_between_with(
                &args.locale,
                &args.entity,
                args.left.iter().cloned(),
                args.right.iter().cloned(),
                strategy,
                options,
            )
        }
        None => {
            let position: AnchorPosition = args.position.parse()?;
            if args.words.is_empty() {
                return Err(SpanlexError::Rule(
                    "Anchor conditions need at least one --word".to_string(),
                ));
            }
            builder.add_position(
                &args.locale,
                &args.entity,
                position,
                args.words.iter().cloned(),
                options,
            )
        }
    };
    builder.build()
}

fn report(output_format: &str, action: &str, entity: &str, message: &str) {
    if output_format == "json" {
        let response = json!({
            "success": true,
            "action": action,
            "entity": entity,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!("{}", format_success(message));
    }
}
