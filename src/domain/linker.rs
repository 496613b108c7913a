use crate::domain::company::Company;
use crate::domain::decision::{MatchDecision, SimilarityContribution};
use crate::domain::ports::MatchingStrategy;

pub struct ConfidenceThreshold;

impl ConfidenceThreshold {
    /// Minimum summed score for a confirmed match with the default weights:
    /// a tax-id hit alone, or a domain hit backed by a strong name match.
    pub const HIGH: u32 = 90;
}

/// Runs every strategy on a pair and turns the summed score into a decision.
pub struct CompanyIdentityLinker {
    strategies: Vec<Box<dyn MatchingStrategy>>,
    threshold: u32,
}

impl CompanyIdentityLinker {
    pub fn new(strategies: Vec<Box<dyn MatchingStrategy>>) -> Self {
        Self::with_threshold(strategies, ConfidenceThreshold::HIGH)
    }

    pub fn with_threshold(strategies: Vec<Box<dyn MatchingStrategy>>, threshold: u32) -> Self {
        Self {
            strategies,
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn link(&self, source: &Company, candidate: &Company) -> MatchDecision {
        let contributions: Vec<SimilarityContribution> = self
            .strategies
            .iter()
            .map(|strategy| strategy.calculate_similarity(source, candidate))
            .collect();

        let total_score = contributions
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.points));

        if total_score >= self.threshold {
            MatchDecision::confirmed(source.id(), candidate.id(), total_score, contributions)
        } else {
            MatchDecision::rejected(total_score, contributions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::CompanyProps;

    struct FixedStrategy {
        name: &'static str,
        points: u32,
    }

    impl MatchingStrategy for FixedStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn weight(&self) -> u32 {
            self.points
        }

        fn calculate_similarity(&self, _: &Company, _: &Company) -> SimilarityContribution {
            SimilarityContribution::new(self.name, self.points)
        }
    }

    fn fixed(name: &'static str, points: u32) -> Box<dyn MatchingStrategy> {
        Box::new(FixedStrategy { name, points })
    }

    fn company(id: &str) -> Company {
        Company::create(CompanyProps {
            id: id.to_string(),
            name: "Acme".to_string(),
            country: "US".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_confirms_at_exact_threshold() {
        let linker = CompanyIdentityLinker::with_threshold(vec![fixed("a", 60), fixed("b", 30)], 90);
        let decision = linker.link(&company("s1"), &company("c1"));

        match decision {
            MatchDecision::Confirmed {
                source_id,
                candidate_id,
                score,
                contributions,
            } => {
                assert_eq!(source_id, "s1");
                assert_eq!(candidate_id, "c1");
                assert_eq!(score, 90);
                assert_eq!(contributions.len(), 2);
            }
            MatchDecision::Rejected { .. } => panic!("expected a confirmed decision"),
        }
    }

    #[test]
    fn test_rejects_below_threshold_and_keeps_contributions() {
        let linker = CompanyIdentityLinker::with_threshold(vec![fixed("a", 60), fixed("b", 29)], 90);
        let decision = linker.link(&company("s1"), &company("c1"));

        assert_eq!(
            decision,
            MatchDecision::rejected(
                89,
                vec![
                    SimilarityContribution::new("a", 60),
                    SimilarityContribution::new("b", 29)
                ]
            )
        );
    }

    #[test]
    fn test_contribution_order_follows_strategy_order() {
        let linker = CompanyIdentityLinker::new(vec![fixed("z", 1), fixed("a", 2), fixed("m", 3)]);
        let decision = linker.link(&company("s1"), &company("c1"));
        let names: Vec<&str> = decision
            .contributions()
            .iter()
            .map(|c| c.strategy.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(linker.strategy_names(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_no_strategies_scores_zero() {
        let linker = CompanyIdentityLinker::new(vec![]);
        assert_eq!(
            linker.link(&company("s1"), &company("c1")),
            MatchDecision::rejected(0, vec![])
        );
        assert_eq!(linker.threshold(), ConfidenceThreshold::HIGH);
    }

    #[test]
    fn test_huge_weights_saturate_instead_of_overflowing() {
        let linker =
            CompanyIdentityLinker::with_threshold(vec![fixed("a", u32::MAX), fixed("b", 1)], u32::MAX);
        let decision = linker.link(&company("s1"), &company("c1"));

        assert!(decision.is_confirmed());
        assert_eq!(decision.score(), u32::MAX);
    }
}
