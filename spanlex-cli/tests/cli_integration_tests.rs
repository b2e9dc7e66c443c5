//! Integration tests for the spanlex CLI
//!
//! These tests drive the command handlers against an isolated rule file:
//! - Rule table editing and persistence
//! - Extraction with argument overrides
//! - Distance and window search

use spanlex::SpanlexError;
use spanlex::config::SpanlexConfig;
use spanlex::entity_extraction::{EntityRule, RuleTable, TrimCondition};
use spanlex_cli::SpanlexCliContext;
use spanlex_cli::args::*;
use spanlex_cli::commands::RulesCommands;
use spanlex_cli::handlers::extract::extract_spans;
use spanlex_cli::handlers::rules::add_trim;
use spanlex_cli::handlers::similarity::search_windows;
use spanlex_cli::handlers::*;
use tempfile::TempDir;

/// Helper to create an isolated test CLI context
fn create_test_context() -> (SpanlexCliContext, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let rules_path = temp_dir.path().join("rules.json");
    let ctx = SpanlexCliContext::with_config(SpanlexConfig::default(), rules_path)
        .expect("Failed to create context");
    (ctx, temp_dir)
}

fn add_text(ctx: &mut SpanlexCliContext, entity: &str, option: &str, texts: &[&str]) {
    let cmd = RulesCommands::AddText(EnumTextArgs {
        locale: "en".to_string(),
        entity: entity.to_string(),
        option: option.to_string(),
        texts: texts.iter().map(|t| t.to_string()).collect(),
    });
    handle_rules_command(cmd, ctx, "json").expect("add-text should succeed");
}

fn trim_args(entity: &str, position: &str) -> AddTrimArgs {
    AddTrimArgs {
        locale: "en".to_string(),
        entity: entity.to_string(),
        position: position.to_string(),
        words: Vec::new(),
        left: Vec::new(),
        right: Vec::new(),
        no_spaces: false,
        case_insensitive: false,
        skip: Vec::new(),
    }
}

fn extract_args(text: &str) -> ExtractArgs {
    ExtractArgs {
        text: text.to_string(),
        locale: Some("en".to_string()),
        only: Vec::new(),
        threshold: None,
        all: false,
        template: false,
    }
}

#[test]
fn test_missing_rule_file_starts_empty() {
    let (ctx, _dir) = create_test_context();
    assert!(ctx.rules.is_empty());
    assert!(!ctx.rules_path.exists());
}

#[test]
fn test_add_text_persists_rules() {
    let (mut ctx, _dir) = create_test_context();
    add_text(&mut ctx, "hero", "spiderman", &["Spiderman", "spider-man"]);

    assert!(ctx.rules_path.exists());
    let reloaded = RuleTable::load_file(&ctx.rules_path).unwrap();
    assert_eq!(reloaded, ctx.rules);
    match reloaded.entity("en", "hero") {
        Some(EntityRule::Enum(rule)) => {
            assert_eq!(rule.option("spiderman").unwrap().texts.len(), 2);
        }
        other => panic!("unexpected rule: {:?}", other),
    }

    // A fresh context picks the file up
    let fresh =
        SpanlexCliContext::with_config(SpanlexConfig::default(), ctx.rules_path.clone()).unwrap();
    assert_eq!(fresh.rules, ctx.rules);
}

#[test]
fn test_remove_text_and_entity() {
    let (mut ctx, _dir) = create_test_context();
    add_text(&mut ctx, "hero", "spiderman", &["Spiderman"]);
    add_text(&mut ctx, "hero", "batman", &["Batman"]);

    let cmd = RulesCommands::RemoveText(EnumTextArgs {
        locale: "en".to_string(),
        entity: "hero".to_string(),
        option: "batman".to_string(),
        texts: vec!["Batman".to_string()],
    });
    handle_rules_command(cmd, &mut ctx, "json").unwrap();
    match ctx.rules.entity("en", "hero") {
        Some(EntityRule::Enum(rule)) => {
            assert!(rule.option("batman").is_none());
            assert!(rule.option("spiderman").is_some());
        }
        other => panic!("unexpected rule: {:?}", other),
    }

    let cmd = RulesCommands::RemoveEntity(RemoveEntityArgs {
        entity: "hero".to_string(),
        locale: None,
    });
    handle_rules_command(cmd, &mut ctx, "json").unwrap();
    assert!(ctx.rules.entity("en", "hero").is_none());
}

#[test]
fn test_add_trim_conditions() {
    let (mut ctx, _dir) = create_test_context();

    let mut args = trim_args("city", "after-first");
    args.words = vec!["in".to_string()];
    args.case_insensitive = true;
    handle_rules_command(RulesCommands::AddTrim(args), &mut ctx, "json").unwrap();

    let mut args = trim_args("route", "between-last");
    args.left = vec!["to".to_string()];
    args.right = vec!["from".to_string()];
    handle_rules_command(RulesCommands::AddTrim(args), &mut ctx, "json").unwrap();

    match ctx.rules.entity("en", "city") {
        Some(EntityRule::Trim(rule)) => {
            assert!(matches!(
                &rule.conditions[0],
                TrimCondition::Position { options, .. } if options.case_insensitive
            ));
        }
        other => panic!("unexpected rule: {:?}", other),
    }
    assert!(matches!(
        ctx.rules.entity("en", "route"),
        Some(EntityRule::Trim(_))
    ));

    let spans = extract_spans(&extract_args("I want to travel to Madrid from Barcelona"), &ctx)
        .unwrap();
    let route = spans.iter().find(|s| s.entity == "route").unwrap();
    assert_eq!(route.utterance_text, "Madrid");
}

#[test]
fn test_add_trim_rejects_bad_arguments() {
    let rules = RuleTable::new();

    let args = trim_args("city", "sideways");
    assert!(matches!(add_trim(&rules, &args), Err(SpanlexError::Rule(_))));

    let args = trim_args("city", "after");
    assert!(matches!(add_trim(&rules, &args), Err(SpanlexError::Rule(_))));

    let mut args = trim_args("route", "between");
    args.left = vec!["to".to_string()];
    assert!(matches!(add_trim(&rules, &args), Err(SpanlexError::Rule(_))));
}

#[test]
fn test_add_text_to_trim_entity_fails() {
    let (mut ctx, _dir) = create_test_context();
    let mut args = trim_args("city", "after");
    args.words = vec!["in".to_string()];
    handle_rules_command(RulesCommands::AddTrim(args), &mut ctx, "json").unwrap();

    let cmd = RulesCommands::AddText(EnumTextArgs {
        locale: "en".to_string(),
        entity: "city".to_string(),
        option: "madrid".to_string(),
        texts: vec!["Madrid".to_string()],
    });
    let result = handle_rules_command(cmd, &mut ctx, "json");
    assert!(matches!(result, Err(SpanlexError::Rule(_))));
}

#[test]
fn test_extract_with_overrides() {
    let (mut ctx, _dir) = create_test_context();
    add_text(&mut ctx, "hero", "spiderman", &["Spiderman"]);

    // distance 2 over 9 characters: below the default threshold
    let spans = extract_spans(&extract_args("I saw spedermun"), &ctx).unwrap();
    assert!(spans.iter().all(|s| s.entity != "hero"));

    let mut args = extract_args("I saw spedermun");
    args.threshold = Some(0.7);
    let spans = extract_spans(&args, &ctx).unwrap();
    assert!(spans.iter().any(|s| s.entity == "hero"));

    let mut args = extract_args("I saw spedermun");
    args.threshold = Some(1.5);
    assert!(matches!(
        extract_spans(&args, &ctx),
        Err(SpanlexError::Configuration(_))
    ));
}

#[test]
fn test_extract_all_mode_and_whitelist() {
    let (mut ctx, _dir) = create_test_context();
    add_text(&mut ctx, "hero", "spiderman", &["Spiderman"]);
    add_text(&mut ctx, "villain", "venom", &["Venom"]);

    let text = "Spiderman met Venom and then spiderman left";
    let mut args = extract_args(text);
    args.all = true;
    let spans = extract_spans(&args, &ctx).unwrap();
    assert_eq!(spans.iter().filter(|s| s.entity == "hero").count(), 2);

    let mut args = extract_args(text);
    args.only = vec!["villain".to_string()];
    let spans = extract_spans(&args, &ctx).unwrap();
    let names: Vec<&str> = spans.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, vec!["villain"]);
}

#[test]
fn test_extract_handler_prints() {
    let (mut ctx, _dir) = create_test_context();
    add_text(&mut ctx, "hero", "spiderman", &["Spiderman"]);

    let mut args = extract_args("Spiderman at 10%");
    args.template = true;
    assert!(handle_extract_command(args.clone(), &ctx, "json").is_ok());
    assert!(handle_extract_command(args, &ctx, "table").is_ok());
}

#[test]
fn test_search_windows() {
    let source = "Morbi interdum ultricies neque varius condimentum";

    let args = SearchArgs {
        source: source.to_string(),
        target: "interdum ultricies".to_string(),
        threshold: None,
        list: false,
        raw: false,
    };
    let windows = search_windows(&args);
    assert_eq!(windows.len(), 1);
    assert_eq!((windows[0].start, windows[0].end), (6, 23));
    assert_eq!(windows[0].levenshtein, 0);

    let args = SearchArgs {
        source: "interdum, interdum and INTERDUM".to_string(),
        target: "interdum".to_string(),
        threshold: None,
        list: true,
        raw: true,
    };
    let starts: Vec<usize> = search_windows(&args).iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![0, 10]);

    assert!(handle_search_command(args, "json").is_ok());
}

#[test]
fn test_distance_handler() {
    let args = DistanceArgs {
        a: "café".to_string(),
        b: "CAFE".to_string(),
        normalize: true,
        collator: false,
    };
    assert!(handle_distance_command(args, "json").is_ok());
}
