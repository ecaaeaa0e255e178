//! Domain types for news records and their enrichment results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw item produced by the feed scraper, before any persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline text. Also the dedup key, via [`crate::content_fingerprint`].
    pub content: String,
    /// Publish time reported by the feed. May be approximate — item times
    /// carry only `HH:MM:SS` and are combined with the scrape date.
    pub published_at: DateTime<Utc>,
}

/// Fact/opinion attribution of a news record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Fact,
    Opinion,
    Unclassified,
}

impl Attribute {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Fact => "fact",
            Attribute::Opinion => "opinion",
            Attribute::Unclassified => "unclassified",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fact" => Some(Attribute::Fact),
            "opinion" => Some(Attribute::Opinion),
            "unclassified" => Some(Attribute::Unclassified),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-categories for factual records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCategory {
    PoliticalPolicies,
    DataIndicators,
    TechnologyNews,
    MarketDynamics,
    CorporateNews,
    GeopoliticalConflicts,
    FinancialInnovation,
    RiskEvents,
    EventPlan,
}

impl FactCategory {
    pub const ALL: [FactCategory; 9] = [
        FactCategory::PoliticalPolicies,
        FactCategory::DataIndicators,
        FactCategory::TechnologyNews,
        FactCategory::MarketDynamics,
        FactCategory::CorporateNews,
        FactCategory::GeopoliticalConflicts,
        FactCategory::FinancialInnovation,
        FactCategory::RiskEvents,
        FactCategory::EventPlan,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FactCategory::PoliticalPolicies => "political_policies",
            FactCategory::DataIndicators => "data_indicators",
            FactCategory::TechnologyNews => "technology_news",
            FactCategory::MarketDynamics => "market_dynamics",
            FactCategory::CorporateNews => "corporate_news",
            FactCategory::GeopoliticalConflicts => "geopolitical_conflicts",
            FactCategory::FinancialInnovation => "financial_innovation",
            FactCategory::RiskEvents => "risk_events",
            FactCategory::EventPlan => "event_plan",
        }
    }

    /// Case-insensitive lookup against the fact vocabulary.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

impl std::fmt::Display for FactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-categories for opinion records. Disjoint from [`FactCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpinionCategory {
    EconomicInterpretation,
    MarketAnalysis,
    PolicyInterpretation,
    ExpertOpinions,
    InvestorSentiment,
    FutureTrendsPrediction,
    RiskAssessment,
}

impl OpinionCategory {
    pub const ALL: [OpinionCategory; 7] = [
        OpinionCategory::EconomicInterpretation,
        OpinionCategory::MarketAnalysis,
        OpinionCategory::PolicyInterpretation,
        OpinionCategory::ExpertOpinions,
        OpinionCategory::InvestorSentiment,
        OpinionCategory::FutureTrendsPrediction,
        OpinionCategory::RiskAssessment,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OpinionCategory::EconomicInterpretation => "economic_interpretation",
            OpinionCategory::MarketAnalysis => "market_analysis",
            OpinionCategory::PolicyInterpretation => "policy_interpretation",
            OpinionCategory::ExpertOpinions => "expert_opinions",
            OpinionCategory::InvestorSentiment => "investor_sentiment",
            OpinionCategory::FutureTrendsPrediction => "future_trends_prediction",
            OpinionCategory::RiskAssessment => "risk_assessment",
        }
    }

    /// Case-insensitive lookup against the opinion vocabulary.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

impl std::fmt::Display for OpinionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved classification outcome.
///
/// Modeled as a sum type so that an illegal pairing — a fact with an
/// opinion-only category or vice versa — is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Fact(FactCategory),
    Opinion(OpinionCategory),
}

impl Classification {
    #[must_use]
    pub fn attribute(self) -> Attribute {
        match self {
            Classification::Fact(_) => Attribute::Fact,
            Classification::Opinion(_) => Attribute::Opinion,
        }
    }

    #[must_use]
    pub fn category_str(self) -> &'static str {
        match self {
            Classification::Fact(category) => category.as_str(),
            Classification::Opinion(category) => category.as_str(),
        }
    }
}

/// Strength of the financial impact extracted for a record.
///
/// `Unknown` marks a response whose strength label was missing or malformed;
/// the rest of the analysis is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStrength {
    None,
    Low,
    Medium,
    High,
    Unknown,
}

impl ImpactStrength {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactStrength::None => "none",
            ImpactStrength::Low => "low",
            ImpactStrength::Medium => "medium",
            ImpactStrength::High => "high",
            ImpactStrength::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(ImpactStrength::None),
            "low" => Some(ImpactStrength::Low),
            "medium" => Some(ImpactStrength::Medium),
            "high" => Some(ImpactStrength::High),
            "unknown" => Some(ImpactStrength::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImpactStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Financial-impact extraction result for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialImpact {
    /// Industries the event may move, in model order.
    pub industries: Vec<String>,
    /// Related instruments (tickers, symbols), in model order.
    pub instruments: Vec<String>,
    pub strength: ImpactStrength,
}

/// Persisted pipeline position of a record.
///
/// Advances `ingested → classified → analyzed` or terminates at `failed`;
/// the store guards every transition so the stage never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Ingested,
    Classified,
    Analyzed,
    Failed,
}

impl ProcessingStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStage::Ingested => "ingested",
            ProcessingStage::Classified => "classified",
            ProcessingStage::Analyzed => "analyzed",
            ProcessingStage::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ingested" => Some(ProcessingStage::Ingested),
            "classified" => Some(ProcessingStage::Classified),
            "analyzed" => Some(ProcessingStage::Analyzed),
            "failed" => Some(ProcessingStage::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_and_opinion_vocabularies_are_disjoint() {
        for fact in FactCategory::ALL {
            assert!(
                OpinionCategory::parse(fact.as_str()).is_none(),
                "{fact} must not parse as an opinion category"
            );
        }
        for opinion in OpinionCategory::ALL {
            assert!(
                FactCategory::parse(opinion.as_str()).is_none(),
                "{opinion} must not parse as a fact category"
            );
        }
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(
            FactCategory::parse("Market_Dynamics"),
            Some(FactCategory::MarketDynamics)
        );
        assert_eq!(
            OpinionCategory::parse("  EXPERT_OPINIONS "),
            Some(OpinionCategory::ExpertOpinions)
        );
    }

    #[test]
    fn classification_carries_matching_attribute() {
        let fact = Classification::Fact(FactCategory::MarketDynamics);
        assert_eq!(fact.attribute(), Attribute::Fact);
        assert_eq!(fact.category_str(), "market_dynamics");

        let opinion = Classification::Opinion(OpinionCategory::RiskAssessment);
        assert_eq!(opinion.attribute(), Attribute::Opinion);
        assert_eq!(opinion.category_str(), "risk_assessment");
    }

    #[test]
    fn stage_round_trips_through_strings() {
        for stage in [
            ProcessingStage::Ingested,
            ProcessingStage::Classified,
            ProcessingStage::Analyzed,
            ProcessingStage::Failed,
        ] {
            assert_eq!(ProcessingStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(ProcessingStage::parse("queued"), None);
    }

    #[test]
    fn strength_parse_rejects_out_of_scale_labels() {
        assert_eq!(ImpactStrength::parse("HIGH"), Some(ImpactStrength::High));
        assert_eq!(ImpactStrength::parse("strong"), None);
    }
}
