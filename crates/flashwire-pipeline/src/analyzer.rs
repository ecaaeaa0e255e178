//! Financial-impact extraction.
//!
//! The prompt/response layout is a versioned contract between this module
//! and the inference endpoint — the parser is only correct against the
//! layout the prompt requests, so both live here side by side:
//!
//! ```text
//! INDUSTRIES: <comma-separated industry names, or "none">
//! INSTRUMENTS: <comma-separated instrument symbols, or "none">
//! STRENGTH: <none|low|medium|high>
//! ```
//!
//! Parsing is deliberately tolerant of partial output: strength and the
//! entity lists are independently useful, so a missing or malformed
//! `STRENGTH` degrades to `unknown` and missing lists default to empty
//! rather than discarding the rest of the analysis. Only a response with
//! none of the labels at all is an error.

use std::time::Duration;

use flashwire_core::{FinancialImpact, ImpactStrength};

use crate::error::PipelineError;
use crate::generate::TextGenerator;

const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are an expert financial analyst. Based on the provided news snippet, extract \
     the industries whose outlook the event may move, the related tradable instruments \
     (stock tickers, crypto symbols, index or bond names), and how strong the financial \
     impact is. Respond with exactly three lines and nothing else, in this format:\n\
     INDUSTRIES: <comma-separated industry names, or \"none\">\n\
     INSTRUMENTS: <comma-separated instrument symbols, or \"none\">\n\
     STRENGTH: <one of: none, low, medium, high>";

/// Financial analyzer over a [`TextGenerator`], with the per-call timeout of
/// the analysis stage.
pub struct FinancialAnalyzer<'a, G> {
    generator: &'a G,
    timeout: Duration,
}

impl<'a, G: TextGenerator> FinancialAnalyzer<'a, G> {
    pub fn new(generator: &'a G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Run one analysis call and parse the labeled-line response.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Llm`] on transport failure, or
    /// [`PipelineError::Analysis`] if the response carries none of the
    /// expected labels.
    pub async fn analyze(&self, content: &str) -> Result<FinancialImpact, PipelineError> {
        let prompt = format!("Analyze the financial impact of this news: \"{content}\"");
        let reply = self
            .generator
            .generate(&prompt, Some(ANALYSIS_SYSTEM_PROMPT), self.timeout)
            .await?;

        parse_impact_response(&reply)
    }
}

/// Parse the labeled-line impact layout.
pub(crate) fn parse_impact_response(reply: &str) -> Result<FinancialImpact, PipelineError> {
    let mut industries: Option<Vec<String>> = None;
    let mut instruments: Option<Vec<String>> = None;
    let mut strength: Option<ImpactStrength> = None;

    for line in reply.lines() {
        let line = line.trim();
        if let Some(value) = label_value(line, "INDUSTRIES:") {
            industries.get_or_insert_with(|| parse_list(value));
        } else if let Some(value) = label_value(line, "INSTRUMENTS:") {
            instruments.get_or_insert_with(|| parse_list(value));
        } else if let Some(value) = label_value(line, "STRENGTH:") {
            // A malformed strength degrades to Unknown instead of failing
            // the whole analysis.
            strength.get_or_insert(ImpactStrength::parse(value).unwrap_or(ImpactStrength::Unknown));
        }
    }

    if industries.is_none() && instruments.is_none() && strength.is_none() {
        let preview: String = reply.chars().take(120).collect();
        return Err(PipelineError::Analysis(format!(
            "unrecognized impact response: '{preview}'"
        )));
    }

    Ok(FinancialImpact {
        industries: industries.unwrap_or_default(),
        instruments: instruments.unwrap_or_default(),
        strength: strength.unwrap_or(ImpactStrength::Unknown),
    })
}

/// Case-insensitive label match; returns the value after the label.
fn label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (head, tail) = line.split_at_checked(label.len())?;
    head.eq_ignore_ascii_case(label).then(|| tail.trim())
}

/// Split a comma-separated value list, dropping empties and the "none"
/// placeholder.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && !entry.eq_ignore_ascii_case("none"))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_parses() {
        let impact = parse_impact_response(
            "INDUSTRIES: banking, real estate\nINSTRUMENTS: US10Y, XLF\nSTRENGTH: high",
        )
        .unwrap();

        assert_eq!(impact.industries, vec!["banking", "real estate"]);
        assert_eq!(impact.instruments, vec!["US10Y", "XLF"]);
        assert_eq!(impact.strength, ImpactStrength::High);
    }

    #[test]
    fn labels_match_case_insensitively() {
        let impact =
            parse_impact_response("industries: mining\ninstruments: none\nstrength: low").unwrap();
        assert_eq!(impact.industries, vec!["mining"]);
        assert!(impact.instruments.is_empty());
        assert_eq!(impact.strength, ImpactStrength::Low);
    }

    #[test]
    fn none_placeholder_yields_empty_lists() {
        let impact =
            parse_impact_response("INDUSTRIES: none\nINSTRUMENTS: none\nSTRENGTH: none").unwrap();
        assert!(impact.industries.is_empty());
        assert!(impact.instruments.is_empty());
        assert_eq!(impact.strength, ImpactStrength::None);
    }

    #[test]
    fn malformed_strength_degrades_to_unknown() {
        let impact = parse_impact_response(
            "INDUSTRIES: energy\nINSTRUMENTS: CL=F\nSTRENGTH: quite strong I would say",
        )
        .unwrap();
        assert_eq!(impact.industries, vec!["energy"]);
        assert_eq!(impact.strength, ImpactStrength::Unknown);
    }

    #[test]
    fn missing_strength_line_degrades_to_unknown() {
        let impact = parse_impact_response("INDUSTRIES: energy\nINSTRUMENTS: CL=F").unwrap();
        assert_eq!(impact.strength, ImpactStrength::Unknown);
    }

    #[test]
    fn partial_response_keeps_present_fields() {
        let impact = parse_impact_response("STRENGTH: medium").unwrap();
        assert!(impact.industries.is_empty());
        assert!(impact.instruments.is_empty());
        assert_eq!(impact.strength, ImpactStrength::Medium);
    }

    #[test]
    fn surrounding_chatter_is_tolerated() {
        let impact = parse_impact_response(
            "Sure! Here is the analysis:\nINDUSTRIES: tech\nINSTRUMENTS: NVDA\nSTRENGTH: medium\nHope this helps!",
        )
        .unwrap();
        assert_eq!(impact.industries, vec!["tech"]);
        assert_eq!(impact.instruments, vec!["NVDA"]);
        assert_eq!(impact.strength, ImpactStrength::Medium);
    }

    #[test]
    fn label_free_response_is_an_error() {
        let err = parse_impact_response("the market will probably react somehow").unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
    }

    #[test]
    fn first_occurrence_of_a_repeated_label_wins() {
        let impact = parse_impact_response(
            "STRENGTH: low\nSTRENGTH: high\nINDUSTRIES: none\nINSTRUMENTS: none",
        )
        .unwrap();
        assert_eq!(impact.strength, ImpactStrength::Low);
    }
}
