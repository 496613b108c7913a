use crate::domain::company::Company;
use crate::domain::decision::SimilarityContribution;
use crate::domain::ports::MatchingStrategy;

pub const DEFAULT_TAX_ID_WEIGHT: u32 = 100;
pub const DEFAULT_DOMAIN_WEIGHT: u32 = 60;
pub const DEFAULT_NAME_WEIGHT: u32 = 40;

/// Full weight when both normalized tax ids are present and equal.
#[derive(Debug, Clone, Copy)]
pub struct TaxIdStrategy {
    weight: u32,
}

impl TaxIdStrategy {
    pub const NAME: &'static str = "tax_id";

    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Default for TaxIdStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_ID_WEIGHT)
    }
}

impl MatchingStrategy for TaxIdStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn calculate_similarity(&self, source: &Company, candidate: &Company) -> SimilarityContribution {
        let points = exact_points(
            source.normalized_tax_id(),
            candidate.normalized_tax_id(),
            self.weight,
        );
        SimilarityContribution::new(Self::NAME, points)
    }
}

/// Full weight when both normalized domains are present and equal.
#[derive(Debug, Clone, Copy)]
pub struct DomainStrategy {
    weight: u32,
}

impl DomainStrategy {
    pub const NAME: &'static str = "domain";

    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Default for DomainStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_WEIGHT)
    }
}

impl MatchingStrategy for DomainStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn calculate_similarity(&self, source: &Company, candidate: &Company) -> SimilarityContribution {
        let points = exact_points(
            source.normalized_domain(),
            candidate.normalized_domain(),
            self.weight,
        );
        SimilarityContribution::new(Self::NAME, points)
    }
}

fn exact_points(a: Option<String>, b: Option<String>, weight: u32) -> u32 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => weight,
        _ => 0,
    }
}

/// Scales its weight by the normalized Levenshtein similarity of the names.
#[derive(Debug, Clone, Copy)]
pub struct LevenshteinNameStrategy {
    weight: u32,
}

impl LevenshteinNameStrategy {
    pub const NAME: &'static str = "levenshtein_name";

    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Default for LevenshteinNameStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_WEIGHT)
    }
}

impl MatchingStrategy for LevenshteinNameStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn calculate_similarity(&self, source: &Company, candidate: &Company) -> SimilarityContribution {
        let a = source.normalized_name();
        let b = candidate.normalized_name();

        let max_len = a.chars().count().max(b.chars().count());
        if a.is_empty() || b.is_empty() || max_len == 0 {
            return SimilarityContribution::new(Self::NAME, 0);
        }

        let distance = strsim::levenshtein(&a, &b);
        let similarity = (1.0 - distance as f64 / max_len as f64).max(0.0);
        let points = (self.weight as f64 * similarity).round() as u32;

        SimilarityContribution::new(Self::NAME, points)
    }
}

/// Tax id, domain and name strategies with their default weights, in that order.
pub fn default_strategies() -> Vec<Box<dyn MatchingStrategy>> {
    vec![
        Box::new(TaxIdStrategy::default()),
        Box::new(DomainStrategy::default()),
        Box::new(LevenshteinNameStrategy::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::CompanyProps;

    fn company(name: &str, domain: Option<&str>, tax_id: Option<&str>) -> Company {
        Company::create(CompanyProps {
            id: "x".to_string(),
            name: name.to_string(),
            country: "US".to_string(),
            domain: domain.map(String::from),
            tax_id: tax_id.map(String::from),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_tax_id_matches_after_normalization() {
        let strategy = TaxIdStrategy::default();
        let a = company("Acme", None, Some("us 12 345"));
        let b = company("Other", None, Some("US12345"));
        assert_eq!(strategy.calculate_similarity(&a, &b), SimilarityContribution::new("tax_id", 100));
    }

    #[test]
    fn test_tax_id_absent_or_different_scores_zero() {
        let strategy = TaxIdStrategy::new(80);
        let a = company("Acme", None, Some("123"));
        assert_eq!(strategy.calculate_similarity(&a, &company("Acme", None, None)).points, 0);
        assert_eq!(strategy.calculate_similarity(&a, &company("Acme", None, Some("124"))).points, 0);
        assert_eq!(strategy.calculate_similarity(&company("Acme", None, Some(" ")), &company("Acme", None, Some(" "))).points, 0);
    }

    #[test]
    fn test_domain_returns_exactly_its_weight_on_equal_domains() {
        for weight in [1, 60, 250] {
            let strategy = DomainStrategy::new(weight);
            let a = company("Acme", Some("https://www.acme.com/contact"), None);
            let b = company("Acme", Some("ACME.com"), None);
            assert_eq!(strategy.calculate_similarity(&a, &b).points, weight);
        }
    }

    #[test]
    fn test_domain_absent_on_either_side_scores_zero() {
        let strategy = DomainStrategy::default();
        let a = company("Acme", Some("acme.com"), None);
        let b = company("Acme", None, None);
        assert_eq!(strategy.calculate_similarity(&a, &b).points, 0);
        assert_eq!(strategy.calculate_similarity(&b, &a).points, 0);
        assert_eq!(strategy.calculate_similarity(&b, &b).points, 0);
    }

    #[test]
    fn test_name_identical_after_normalization_scores_full_weight() {
        let strategy = LevenshteinNameStrategy::default();
        let a = company("Acme Inc", None, None);
        let b = company("ACME, INC.", None, None);
        assert_eq!(strategy.calculate_similarity(&a, &b).points, 40);
    }

    #[test]
    fn test_name_partial_similarity_is_rounded() {
        let strategy = LevenshteinNameStrategy::default();
        // "acme inc" vs "acme corp": distance 4, max length 9
        let a = company("Acme Inc", None, None);
        let b = company("Acme Corp", None, None);
        let expected = (40.0_f64 * (1.0 - 4.0 / 9.0)).round() as u32;
        assert_eq!(strategy.calculate_similarity(&a, &b).points, expected);
    }

    #[test]
    fn test_name_score_stays_within_weight() {
        let strategy = LevenshteinNameStrategy::new(40);
        let names = ["Acme", "Zebra Logistics", "A", "acme acme acme", "Ωmega", "Q"];
        for x in names {
            for y in names {
                let points = strategy
                    .calculate_similarity(&company(x, None, None), &company(y, None, None))
                    .points;
                assert!(points <= 40, "{} vs {} scored {}", x, y, points);
            }
        }
    }

    #[test]
    fn test_name_that_normalizes_to_empty_scores_zero() {
        let strategy = LevenshteinNameStrategy::default();
        let a = company("株式会社", None, None);
        let b = company("Acme", None, None);
        assert_eq!(strategy.calculate_similarity(&a, &b).points, 0);
        assert_eq!(strategy.calculate_similarity(&a, &a).points, 0);
    }

    #[test]
    fn test_default_strategy_order() {
        let names: Vec<String> = default_strategies().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["tax_id", "domain", "levenshtein_name"]);
    }
}
