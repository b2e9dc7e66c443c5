//! Composable extraction pipeline.
//!
//! An extraction runs in fixed stages: locale resolution, recognition by
//! every enabled recognizer (caller-supplied spans join here), validation,
//! whitelist renaming and post-processing. Post-processors see the spans
//! ordered by start position.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument};

use super::config::EntityExtractionConfig;
use super::locale::LocaleResolver;
use super::post_processors::TrimSplitter;
use super::resolution::SpanConflictResolver;
use super::rules::RuleTable;
use super::traits::{RecognitionContext, Recognizer};
use super::validators::{BoundsValidator, ConfidenceValidator};
use super::{BuiltinRecognizer, EnumMatcher, Span, TrimMatcher};
use crate::similarity::{AlphanumericClass, SimilarSearch};
use crate::{Result, SpanlexError};

/// Generic trait for validating recognized spans
pub trait SpanValidator: Send + Sync + std::fmt::Debug {
    /// Validate a span given the recognition context
    fn validate(&self, span: &Span, context: &RecognitionContext<'_>) -> bool;

    /// Get the name of this validator
    fn name(&self) -> &str;
}

/// Generic trait for post-processing spans
pub trait SpanPostProcessor: Send + Sync + std::fmt::Debug {
    /// Process a list of validated spans
    fn process(&self, spans: Vec<Span>) -> Vec<Span>;

    /// Get the name of this post-processor
    fn name(&self) -> &str;
}

/// One utterance to extract from.
#[derive(Debug, Clone, Default)]
pub struct ExtractionRequest {
    pub utterance: String,
    /// Requested locale; the pipeline's default applies when absent
    pub locale: Option<String>,
    /// Entity names to restrict rule-based recognition to
    pub whitelist: Option<Vec<String>>,
    /// Spans produced outside the pipeline
    pub external_spans: Vec<Span>,
}

impl ExtractionRequest {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            ..Self::default()
        }
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Restrict rule-based entities to these names.
    ///
    /// A name ending in `_<number>` (e.g. `hero_1`) allows its base entity
    /// and renames that entity's spans, in position order, to the listed names.
    pub fn whitelist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn external_spans(mut self, spans: Vec<Span>) -> Self {
        self.external_spans = spans;
        self
    }
}

/// Base entity name of a whitelist entry: `hero_2` gives `hero`.
pub fn whitelist_base_name(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((base, index))
            if !base.is_empty() && !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

/// Composable span extraction pipeline
pub struct ExtractionPipeline {
    recognizers: Vec<Box<dyn Recognizer>>,
    validators: Vec<Box<dyn SpanValidator>>,
    post_processors: Vec<Box<dyn SpanPostProcessor>>,
    locale_resolver: LocaleResolver,
    alphanumeric: AlphanumericClass,
    max_utterance_chars: Option<usize>,
}

impl std::fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field(
                "recognizers",
                &self.recognizers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("validators", &self.validators.len())
            .field("post_processors", &self.post_processors.len())
            .field("max_utterance_chars", &self.max_utterance_chars)
            .finish()
    }
}

impl ExtractionPipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The standard pipeline described by `config`.
    pub fn from_config(config: &EntityExtractionConfig) -> Self {
        let mut recognizers: Vec<Box<dyn Recognizer>> = Vec::new();
        if config.enable_builtins {
            recognizers.push(Box::new(BuiltinRecognizer::new(config.builtins.clone())));
        }
        if config.enable_enum {
            let search = SimilarSearch::from_config(&config.similarity);
            recognizers.push(Box::new(
                EnumMatcher::new(search, config.threshold).with_mode(config.enum_mode),
            ));
        }
        if config.enable_trim {
            recognizers.push(Box::new(TrimMatcher::new()));
        }
        recognizers.sort_by_key(|r| std::cmp::Reverse(r.priority()));

        Self {
            recognizers,
            validators: vec![
                Box::new(BoundsValidator::new()),
                Box::new(ConfidenceValidator::new(config.min_accuracy)),
            ],
            post_processors: vec![
                Box::new(TrimSplitter::new()),
                Box::new(SpanConflictResolver::new()),
            ],
            locale_resolver: LocaleResolver::new(config.locale.clone()),
            alphanumeric: config.similarity.alphanumeric.clone(),
            max_utterance_chars: config.max_utterance_chars,
        }
    }

    pub fn locale_resolver(&self) -> &LocaleResolver {
        &self.locale_resolver
    }

    /// Extract spans using the complete pipeline
    #[instrument(skip_all, fields(locale = request.locale.as_deref()))]
    pub fn extract(&self, request: ExtractionRequest, rules: &RuleTable) -> Result<Vec<Span>> {
        let chars: Vec<char> = request.utterance.chars().collect();
        if let Some(max) = self.max_utterance_chars
            && chars.len() > max
        {
            return Err(SpanlexError::UtteranceTooLong {
                len: chars.len(),
                max,
            });
        }

        // Step 1: Resolve the locale once for every recognizer
        let locale = self
            .locale_resolver
            .resolve(request.locale.as_deref(), |l| rules.has_locale(l));

        let renames = request.whitelist.as_ref().map(|names| WhitelistRenames::new(names));
        let allowed = renames.as_ref().map(WhitelistRenames::base_names);

        let words = self.alphanumeric.word_positions(&request.utterance);
        let context = RecognitionContext {
            utterance: &request.utterance,
            chars: &chars,
            locale: &locale,
            rules,
            word_positions: &words,
            whitelist: allowed.as_deref(),
        };

        // Step 2: Recognize candidate spans
        let mut spans = request.external_spans;
        for recognizer in self.recognizers.iter().filter(|r| r.is_enabled()) {
            let found = recognizer.recognize(&context);
            debug!(recognizer = recognizer.name(), spans = found.len(), "Recognizer finished");
            spans.extend(found);
        }

        // Step 3: Validate spans
        spans.retain(|span| {
            self.validators
                .iter()
                .all(|validator| validator.validate(span, &context))
        });
        spans.sort_by_key(|span| span.start);

        // Step 4: Apply whitelist names
        if let Some(mut renames) = renames {
            for span in &mut spans {
                renames.rename(span);
            }
        }

        // Step 5: Post-process spans
        let spans = self
            .post_processors
            .iter()
            .fold(spans, |spans, processor| processor.process(spans));

        debug!(%locale, spans = spans.len(), "Extraction complete");
        Ok(spans)
    }

    /// Extract spans from a bare utterance.
    pub fn extract_text(&self, utterance: &str, locale: &str, rules: &RuleTable) -> Result<Vec<Span>> {
        self.extract(ExtractionRequest::new(utterance).locale(locale), rules)
    }
}

/// Queues of whitelist names per base entity.
#[derive(Debug)]
struct WhitelistRenames {
    queues: HashMap<String, VecDeque<String>>,
    order: Vec<String>,
}

impl WhitelistRenames {
    fn new(names: &[String]) -> Self {
        let mut queues: HashMap<String, VecDeque<String>> = HashMap::new();
        let mut order = Vec::new();
        for name in names {
            let base = whitelist_base_name(name).to_string();
            if !queues.contains_key(&base) {
                order.push(base.clone());
            }
            let queue = queues.entry(base.clone()).or_default();
            if base != *name {
                queue.push_back(name.clone());
            }
        }
        Self { queues, order }
    }

    fn base_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn rename(&mut self, span: &mut Span) {
        if let Some(name) = self
            .queues
            .get_mut(&span.entity)
            .and_then(VecDeque::pop_front)
        {
            span.entity = name;
        }
    }
}

/// Builder for creating extraction pipelines
pub struct PipelineBuilder {
    recognizers: Vec<Box<dyn Recognizer>>,
    validators: Vec<Box<dyn SpanValidator>>,
    post_processors: Vec<Box<dyn SpanPostProcessor>>,
    locale_resolver: LocaleResolver,
    alphanumeric: AlphanumericClass,
    max_utterance_chars: Option<usize>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            recognizers: Vec::new(),
            validators: Vec::new(),
            post_processors: Vec::new(),
            locale_resolver: LocaleResolver::default(),
            alphanumeric: AlphanumericClass::default(),
            max_utterance_chars: None,
        }
    }

    /// Add a recognizer to the pipeline
    pub fn recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    /// Add a validator to the pipeline
    pub fn validator(mut self, validator: Box<dyn SpanValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Add a post-processor to the pipeline
    pub fn post_processor(mut self, post_processor: Box<dyn SpanPostProcessor>) -> Self {
        self.post_processors.push(post_processor);
        self
    }

    pub fn locale_resolver(mut self, locale_resolver: LocaleResolver) -> Self {
        self.locale_resolver = locale_resolver;
        self
    }

    /// Word class used to segment utterances for the recognizers
    pub fn alphanumeric(mut self, alphanumeric: AlphanumericClass) -> Self {
        self.alphanumeric = alphanumeric;
        self
    }

    pub fn max_utterance_chars(mut self, max: Option<usize>) -> Self {
        self.max_utterance_chars = max;
        self
    }

    /// Build the pipeline
    pub fn build(mut self) -> Result<ExtractionPipeline> {
        if self.recognizers.is_empty() {
            return Err(SpanlexError::Configuration(
                "Pipeline requires at least one recognizer".to_string(),
            ));
        }
        self.recognizers.sort_by_key(|r| std::cmp::Reverse(r.priority()));

        Ok(ExtractionPipeline {
            recognizers: self.recognizers,
            validators: self.validators,
            post_processors: self.post_processors,
            locale_resolver: self.locale_resolver,
            alphanumeric: self.alphanumeric,
            max_utterance_chars: self.max_utterance_chars,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
