//! Two-call news classification: fact/opinion attribution, then an
//! attribute-specific sub-category.
//!
//! The category vocabulary depends on the attribute outcome, which is why
//! these are two inference calls rather than one — the second prompt is
//! built from the first result, and each parse is independently testable.

use std::time::Duration;

use flashwire_core::{Attribute, Classification, FactCategory, OpinionCategory};

use crate::error::PipelineError;
use crate::generate::TextGenerator;

const ATTRIBUTE_SYSTEM_PROMPT: &str =
    "You are an expert news analyst. Your task is to classify the provided news snippet. \
     Respond with a single word: either 'fact' if the snippet primarily states objective \
     events or information, or 'opinion' if it primarily expresses views, beliefs, \
     interpretations, or sentiments. Do not provide any explanation or additional text.";

/// Classifier over a [`TextGenerator`], with the per-call timeout of the
/// classification stage.
pub struct Classifier<'a, G> {
    generator: &'a G,
    timeout: Duration,
}

impl<'a, G: TextGenerator> Classifier<'a, G> {
    pub fn new(generator: &'a G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Run both classification calls: attribute, then category.
    ///
    /// # Errors
    ///
    /// Propagates [`PipelineError::Llm`] from either call, or
    /// [`PipelineError::Classification`] if a reply does not match the
    /// expected labels.
    pub async fn classify(&self, content: &str) -> Result<Classification, PipelineError> {
        let attribute = self.classify_attribute(content).await?;
        self.classify_category(content, attribute).await
    }

    /// Binary fact/opinion attribution.
    ///
    /// The reply is normalized (trimmed, lowercased, quotes stripped) and
    /// must equal one of the two labels exactly. Anything else — including
    /// a reply that merely *contains* a label — is ambiguous output and an
    /// error, never silently coerced.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Llm`] on transport failure,
    /// [`PipelineError::Classification`] on ambiguous output.
    pub async fn classify_attribute(&self, content: &str) -> Result<Attribute, PipelineError> {
        let prompt = format!("Classify the following news snippet: \"{content}\"");
        let reply = self
            .generator
            .generate(&prompt, Some(ATTRIBUTE_SYSTEM_PROMPT), self.timeout)
            .await?;

        match normalize_label(&reply).as_str() {
            "fact" => Ok(Attribute::Fact),
            "opinion" => Ok(Attribute::Opinion),
            other => Err(PipelineError::Classification(format!(
                "ambiguous attribute reply '{other}'"
            ))),
        }
    }

    /// Attribute-specific sub-category assignment.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Llm`] on transport failure;
    /// [`PipelineError::Classification`] if `attribute` is unresolved or the
    /// reply is outside the attribute's vocabulary.
    pub async fn classify_category(
        &self,
        content: &str,
        attribute: Attribute,
    ) -> Result<Classification, PipelineError> {
        let (system_prompt, prompt) = match attribute {
            Attribute::Fact => (
                category_system_prompt(
                    "a statement of fact",
                    &FactCategory::ALL.map(FactCategory::as_str),
                ),
                format!("Classify this factual news snippet: \"{content}\""),
            ),
            Attribute::Opinion => (
                category_system_prompt(
                    "an opinion",
                    &OpinionCategory::ALL.map(OpinionCategory::as_str),
                ),
                format!("Classify this opinion-based news snippet: \"{content}\""),
            ),
            Attribute::Unclassified => {
                return Err(PipelineError::Classification(
                    "category requested before attribute was resolved".to_string(),
                ))
            }
        };

        let reply = self
            .generator
            .generate(&prompt, Some(&system_prompt), self.timeout)
            .await?;
        let label = normalize_label(&reply);

        match attribute {
            Attribute::Fact => FactCategory::parse(&label)
                .map(Classification::Fact)
                .ok_or_else(|| out_of_vocabulary(&label, "fact")),
            Attribute::Opinion => OpinionCategory::parse(&label)
                .map(Classification::Opinion)
                .ok_or_else(|| out_of_vocabulary(&label, "opinion")),
            Attribute::Unclassified => unreachable!("rejected above"),
        }
    }
}

fn category_system_prompt(description: &str, categories: &[&str]) -> String {
    format!(
        "You are an expert news analyst. Given a news snippet that is {description}, \
         classify it into one of the following categories. Respond with only the \
         category name. Do not add any explanation or other text.\n\n\
         Categories: {}",
        categories.join(", ")
    )
}

fn out_of_vocabulary(label: &str, vocabulary: &str) -> PipelineError {
    PipelineError::Classification(format!(
        "reply '{label}' is not in the {vocabulary} category vocabulary"
    ))
}

/// Trim the reply and strip the decoration small models like to add:
/// surrounding quotes, backticks, and a trailing period.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '.'))
        .trim()
        .to_lowercase()
}
