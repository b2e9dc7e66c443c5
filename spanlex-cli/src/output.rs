use colored::*;
use serde_json::json;
use spanlex::SpanlexError;
use spanlex::entity_extraction::{EntityRule, RuleTable, Span, SpanKind, TrimCondition};
use spanlex::similarity::SpanMatch;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn span_enum() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }

    pub fn span_trim() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn span_builtin() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }
}

pub fn output_error(error_msg: &str, output_format: &str) {
    if output_format == "json" {
        let error_response = json!({
            "error": true,
            "message": error_msg,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}", format_error(error_msg));
    }
}

/// Machine readable code of an error.
pub fn error_code(error: &SpanlexError) -> &'static str {
    match error {
        SpanlexError::Configuration(_) => "CONFIGURATION_ERROR",
        SpanlexError::Logging(_) => "LOGGING_ERROR",
        SpanlexError::Rule(_) => "RULE_ERROR",
        SpanlexError::Serialization(_) => "SERIALIZATION_ERROR",
        SpanlexError::Io(_) => "IO_ERROR",
        SpanlexError::UtteranceTooLong { .. } => "UTTERANCE_TOO_LONG",
        SpanlexError::Other(_) => "ERROR",
    }
}

pub fn output_error_json(error: &SpanlexError, output_format: &str) {
    if output_format == "json" {
        let error_response = json!({
            "error": true,
            "code": error_code(error),
            "message": error.to_string(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        output_error(&error.to_string(), output_format);
    }
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_kind(kind: &SpanKind) -> ColoredString {
    let label = match kind.subtype() {
        Some(subtype) => format!("{}/{}", kind.type_name(), subtype),
        None => kind.type_name().to_string(),
    };
    match kind {
        SpanKind::Enum => label.color(CliColors::span_enum()),
        SpanKind::Trim(_) => label.color(CliColors::span_trim()),
        SpanKind::Builtin(_) => label.color(CliColors::span_builtin()),
        SpanKind::External(_) => label.color(CliColors::muted()),
    }
}

pub fn print_span_list(spans: &[Span]) {
    if spans.is_empty() {
        println!("{}", format_info("No entities found."));
        return;
    }

    println!(
        "{}",
        format_info(&format!("Found {} entities:", spans.len()))
    );
    println!();

    println!(
        "{:<16} {:<20} {:<10} {:<9} {}",
        "Entity".color(CliColors::muted()).bold(),
        "Kind".color(CliColors::muted()).bold(),
        "Range".color(CliColors::muted()).bold(),
        "Accuracy".color(CliColors::muted()).bold(),
        "Text".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(72).color(CliColors::muted()));

    for span in spans {
        let value = span
            .option
            .as_deref()
            .map(|option| format!(" → {}", option))
            .unwrap_or_default();
        println!(
            "{:<16} {:<20} {:<10} {:<9.3} {}{}",
            span.entity.color(CliColors::accent()).bold(),
            format_kind(&span.kind),
            format!("{}..{}", span.start, span.end),
            span.accuracy,
            span.utterance_text,
            value.color(CliColors::muted())
        );
    }
}

pub fn print_span_match(source: &str, found: &SpanMatch) {
    let text: String = source
        .chars()
        .skip(found.start)
        .take(found.len)
        .collect();
    println!(
        "{} {} {}",
        format!("{}..{}", found.start, found.end).color(CliColors::accent()),
        text.bold(),
        format!(
            "(levenshtein {}, accuracy {:.3})",
            found.levenshtein, found.accuracy
        )
        .color(CliColors::muted())
    );
}

pub fn print_rule_table(rules: &RuleTable, locale: Option<&str>) {
    let locales: Vec<&str> = rules
        .locales()
        .filter(|l| locale.is_none_or(|wanted| wanted == *l))
        .collect();
    if locales.is_empty() {
        println!("{}", format_info("No rules defined."));
        return;
    }

    for locale in locales {
        println!("{}", format!("━━━ {} ━━━", locale).color(CliColors::info()).bold());
        let Some(entities) = rules.entities(locale) else {
            continue;
        };
        for (name, rule) in entities {
            println!(
                "{} {}",
                name.color(CliColors::accent()).bold(),
                format!("({})", rule.type_name()).color(CliColors::muted())
            );
            match rule {
                EntityRule::Enum(rule) => {
                    for option in &rule.options {
                        println!("  {}: {}", option.name, option.texts.join(", "));
                    }
                }
                EntityRule::Trim(rule) => {
                    for condition in &rule.conditions {
                        println!("  {}", describe_condition(condition));
                    }
                }
            }
        }
        println!();
    }
}

fn describe_condition(condition: &TrimCondition) -> String {
    match condition {
        TrimCondition::Position {
            position, words, ..
        } => format!("{:?}: {}", position, words.join(" | ")),
        TrimCondition::Between {
            left,
            right,
            strategy,
            ..
        } => format!(
            "Between ({:?}): {} … {}",
            strategy,
            left.join(" | "),
            right.join(" | ")
        ),
    }
}
