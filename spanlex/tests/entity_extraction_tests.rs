//! Integration tests for the extraction pipeline
//!
//! These tests run whole utterances through the configured pipeline:
//! - Enumerated, trim and builtin recognizers together
//! - Whitelists, locale fallback and external spans
//! - Rule table persistence

use spanlex::config::ConfigBuilder;
use spanlex::entity_extraction::{
    EntityExtractionConfig, ExtractionPipeline, ExtractionRequest, Resolution, RuleTable, Span,
    SpanConflictResolver, SpanKind, TrimKind, TrimMatcher, templatize,
};
use spanlex::SpanlexError;
use tempfile::tempdir;

fn hero_rules() -> RuleTable {
    RuleTable::builder()
        .add_enum_texts("en", "hero", "spiderman", ["Spiderman", "spider-man"])
        .add_enum_texts("en", "hero", "ironman", ["Iron Man"])
        .add_after("en", "city", ["in"])
        .add_between("en", "route", ["to"], ["from"])
        .build()
        .expect("rules should build")
}

fn default_pipeline() -> ExtractionPipeline {
    ExtractionPipeline::from_config(&EntityExtractionConfig::default())
}

fn find<'a>(spans: &'a [Span], entity: &str) -> Option<&'a Span> {
    spans.iter().find(|s| s.entity == entity)
}

#[test]
fn test_fuzzy_enum_match() {
    let spans = default_pipeline()
        .extract_text("I saw spederman eating spaghetti", "en", &hero_rules())
        .unwrap();

    assert_eq!(spans.len(), 1);
    let hero = &spans[0];
    assert_eq!((hero.start, hero.end), (6, 14));
    assert_eq!(hero.utterance_text, "spederman");
    assert_eq!(hero.option.as_deref(), Some("spiderman"));
    assert_eq!(hero.levenshtein, Some(1));
    assert!((hero.accuracy - 8.0 / 9.0).abs() < 1e-9);
    assert_eq!(
        hero.resolution,
        Some(Resolution::Option {
            value: "spiderman".to_string()
        })
    );
}

#[test]
fn test_between_simplest_through_pipeline() {
    let spans = default_pipeline()
        .extract_text("I want to travel to Madrid from Barcelona", "en", &hero_rules())
        .unwrap();

    let route = find(&spans, "route").expect("route span");
    assert_eq!(route.utterance_text, "travel to Madrid");
    assert_eq!((route.start, route.end), (10, 25));
    assert_eq!(route.accuracy, 1.0);
    assert_eq!(route.kind, SpanKind::Trim(TrimKind::Between));
}

#[test]
fn test_between_last_through_pipeline() {
    let rules = RuleTable::builder()
        .add_between_last("en", "route", ["to"], ["from"])
        .build()
        .unwrap();
    let spans = default_pipeline()
        .extract_text("I want to travel to Madrid from Barcelona", "en", &rules)
        .unwrap();

    let route = find(&spans, "route").expect("route span");
    assert_eq!(route.utterance_text, "Madrid");
    assert_eq!((route.start, route.end), (20, 25));
}

#[test]
fn test_trim_span_yields_to_nested_enum() {
    let rules = RuleTable::builder()
        .add_enum_texts("en", "hero", "spiderman", ["Spiderman"])
        .add_after_last("en", "place", ["to"])
        .build()
        .unwrap();
    let spans = default_pipeline()
        .extract_text("take me to spiderman tower", "en", &rules)
        .unwrap();

    let hero = find(&spans, "hero").expect("hero span");
    assert_eq!((hero.start, hero.end), (11, 19));

    let place = find(&spans, "place").expect("place span");
    assert_eq!(place.utterance_text, "tower");
    assert_eq!((place.start, place.end), (21, 25));
    assert!(!hero.overlaps(place));
}

#[test]
fn test_builtins_alongside_rules() {
    let spans = default_pipeline()
        .extract_text("Spiderman lives in Queens, mail peter@dailybugle.com", "en", &hero_rules())
        .unwrap();

    assert!(find(&spans, "hero").is_some());
    let email = find(&spans, "email").expect("email span");
    assert_eq!(email.utterance_text, "peter@dailybugle.com");
    assert_eq!(email.accuracy, 0.95);
}

#[test]
fn test_whitelist_restricts_and_renames() {
    let pipeline = default_pipeline();
    let rules = hero_rules();

    let request = ExtractionRequest::new("spiderman in Madrid")
        .locale("en")
        .whitelist(["hero"]);
    let spans = pipeline.extract(request, &rules).unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entity, "hero");

    let request = ExtractionRequest::new("spiderman in Madrid")
        .locale("en")
        .whitelist(["hero_1", "city_1"]);
    let spans = pipeline.extract(request, &rules).unwrap();
    let names: Vec<&str> = spans.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, vec!["hero_1", "city_1"]);
}

#[test]
fn test_locale_fallback() {
    let rules = RuleTable::builder()
        .add_enum_texts("es", "fruta", "manzana", ["manzana"])
        .build()
        .unwrap();
    let config = ConfigBuilder::new()
        .with_locale_fallback("ca", "es")
        .build()
        .unwrap();
    let pipeline = ExtractionPipeline::from_config(&config.entity_extraction);

    let spans = pipeline.extract_text("quiero una manzana", "es-MX", &rules).unwrap();
    assert_eq!(find(&spans, "fruta").map(|s| s.start), Some(11));

    let spans = pipeline.extract_text("vull una manzana", "ca", &rules).unwrap();
    assert!(find(&spans, "fruta").is_some());

    // No "de" rules and no fallback: the default "en" has none either
    let spans = pipeline.extract_text("ich will manzana", "de", &rules).unwrap();
    assert!(find(&spans, "fruta").is_none());
}

#[test]
fn test_external_spans_are_resolved() {
    let pipeline = ExtractionPipeline::builder()
        .recognizer(Box::new(TrimMatcher::new()))
        .post_processor(Box::new(SpanConflictResolver::new()))
        .build()
        .unwrap();

    let utterance = "call Peter Parker now";
    let chars: Vec<char> = utterance.chars().collect();
    let ner = SpanKind::External("ner".to_string());
    let external = vec![
        Span::from_chars(&chars, 5, 16, "person", ner.clone(), 0.90),
        Span::from_chars(&chars, 5, 16, "person", ner.clone(), 0.95),
        Span::from_chars(&chars, 11, 16, "surname", ner, 0.80),
    ];

    let request = ExtractionRequest::new(utterance).external_spans(external);
    let spans = pipeline.extract(request, &RuleTable::new()).unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entity, "person");
    assert_eq!(spans[0].accuracy, 0.95);
}

#[test]
fn test_external_spans_with_wrong_text_are_dropped() {
    let utterance = "call Peter Parker now";
    let mut span = Span::from_chars(
        &utterance.chars().collect::<Vec<_>>(),
        5,
        9,
        "person",
        SpanKind::External("ner".to_string()),
        0.9,
    );
    span.utterance_text = "Bruce".to_string();

    let request = ExtractionRequest::new(utterance).external_spans(vec![span]);
    let spans = default_pipeline().extract(request, &RuleTable::new()).unwrap();
    assert!(find(&spans, "person").is_none());
}

#[test]
fn test_utterance_too_long() {
    let config = ConfigBuilder::new()
        .with_max_utterance_chars(Some(10))
        .build()
        .unwrap();
    let pipeline = ExtractionPipeline::from_config(&config.entity_extraction);

    let result = pipeline.extract_text("this is longer than ten", "en", &hero_rules());
    assert!(matches!(
        result,
        Err(SpanlexError::UtteranceTooLong { len: 23, max: 10 })
    ));
}

#[test]
fn test_empty_utterance() {
    let spans = default_pipeline().extract_text("", "en", &hero_rules()).unwrap();
    assert!(spans.is_empty());
}

#[test]
fn test_several_anchors_yield_one_span() {
    let rules = RuleTable::builder()
        .add_after("en", "dest", ["from", "to"])
        .build()
        .unwrap();
    let config = ConfigBuilder::new().without_builtins().build().unwrap();
    let spans = ExtractionPipeline::from_config(&config.entity_extraction)
        .extract_text("go from Madrid to Paris", "en", &rules)
        .unwrap();

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entity, "dest");
    assert_eq!((spans[0].start, spans[0].end), (8, 22));
    assert_eq!(spans[0].utterance_text, "Madrid to Paris");
}

#[test]
fn test_disabled_recognizers() {
    let config = ConfigBuilder::new()
        .without_builtins()
        .without_trim()
        .build()
        .unwrap();
    let pipeline = ExtractionPipeline::from_config(&config.entity_extraction);
    let spans = pipeline
        .extract_text("spiderman in Madrid at 10%", "en", &hero_rules())
        .unwrap();

    let names: Vec<&str> = spans.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, vec!["hero"]);
}

#[test]
fn test_templatize_extracted_spans() {
    let utterance = "I saw spederman in Madrid";
    let spans = default_pipeline()
        .extract_text(utterance, "en", &hero_rules())
        .unwrap();
    assert_eq!(templatize(utterance, &spans), "I saw %hero% in %city%");
}

#[test]
fn test_span_json_shape() {
    let spans = default_pipeline()
        .extract_text("Iron Man", "en", &hero_rules())
        .unwrap();
    let json = serde_json::to_value(&spans[0]).unwrap();

    assert_eq!(json["entity"], "hero");
    assert_eq!(json["kind"]["type"], "enum");
    assert_eq!(json["option"], "ironman");
    assert_eq!(json["resolution"]["kind"], "option");
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 7);
}

#[test]
fn test_rule_table_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules").join("heroes.json");

    let rules = hero_rules();
    rules.save_file(&path).unwrap();
    let loaded = RuleTable::load_file(&path).unwrap();
    assert_eq!(rules, loaded);

    let json: serde_json::Value = serde_json::from_str(&rules.to_json().unwrap()).unwrap();
    assert_eq!(json["en"]["hero"]["type"], "enum");
    assert_eq!(json["en"]["city"]["type"], "trim");
}

#[test]
fn test_load_missing_or_malformed_rules() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        RuleTable::load_file(dir.path().join("missing.json")),
        Err(SpanlexError::Io(_))
    ));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"en\": 42}").unwrap();
    assert!(matches!(
        RuleTable::load_file(&path),
        Err(SpanlexError::Serialization(_))
    ));
}
