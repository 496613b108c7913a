use crate::domain::company::CompanyId;
use serde::{Deserialize, Serialize};

/// Points one strategy awarded to one compared pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityContribution {
    pub strategy: String,
    pub points: u32,
}

impl SimilarityContribution {
    pub fn new(strategy: impl Into<String>, points: u32) -> Self {
        Self {
            strategy: strategy.into(),
            points,
        }
    }
}

/// Outcome of linking a source company to a candidate.
///
/// Both variants keep every strategy contribution so a decision can be audited
/// after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum MatchDecision {
    Confirmed {
        source_id: CompanyId,
        candidate_id: CompanyId,
        score: u32,
        contributions: Vec<SimilarityContribution>,
    },
    Rejected {
        score: u32,
        contributions: Vec<SimilarityContribution>,
    },
}

impl MatchDecision {
    pub fn confirmed(
        source_id: impl Into<CompanyId>,
        candidate_id: impl Into<CompanyId>,
        score: u32,
        contributions: Vec<SimilarityContribution>,
    ) -> Self {
        MatchDecision::Confirmed {
            source_id: source_id.into(),
            candidate_id: candidate_id.into(),
            score,
            contributions,
        }
    }

    pub fn rejected(score: u32, contributions: Vec<SimilarityContribution>) -> Self {
        MatchDecision::Rejected {
            score,
            contributions,
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            MatchDecision::Confirmed { score, .. } | MatchDecision::Rejected { score, .. } => *score,
        }
    }

    pub fn contributions(&self) -> &[SimilarityContribution] {
        match self {
            MatchDecision::Confirmed { contributions, .. }
            | MatchDecision::Rejected { contributions, .. } => contributions,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, MatchDecision::Confirmed { .. })
    }
}
