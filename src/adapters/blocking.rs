use crate::domain::company::{normalize_text, Company};
use crate::domain::ports::BlockingKeyFactory;

pub const DEFAULT_PREFIX_LENGTH: usize = 3;

/// Blocks on `COUNTRY:prefix`, where the prefix is taken from the normalized
/// name with spaces removed.
#[derive(Debug, Clone, Copy)]
pub struct PrefixCountryBlockingKeyFactory {
    prefix_length: usize,
}

impl PrefixCountryBlockingKeyFactory {
    pub fn new(prefix_length: usize) -> Self {
        Self { prefix_length }
    }

    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }
}

impl Default for PrefixCountryBlockingKeyFactory {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_LENGTH)
    }
}

impl BlockingKeyFactory for PrefixCountryBlockingKeyFactory {
    fn create_key(&self, company: &Company) -> Option<String> {
        let country = company.country().trim().to_uppercase();
        if country.is_empty() {
            return None;
        }

        let normalized = normalize_text(company.name());
        let prefix: String = normalized
            .chars()
            .filter(|c| !c.is_whitespace())
            .take(self.prefix_length)
            .collect();
        if prefix.is_empty() {
            return None;
        }

        Some(format!("{}:{}", country, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::CompanyProps;

    fn company(name: &str, country: &str) -> Company {
        Company::create(CompanyProps {
            id: "c1".to_string(),
            name: name.to_string(),
            country: country.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_key_uses_upper_country_and_name_prefix() {
        let factory = PrefixCountryBlockingKeyFactory::default();
        assert_eq!(factory.create_key(&company("Acme Inc", "us")), Some("US:acm".to_string()));
        assert_eq!(factory.create_key(&company("ACME INC.", "US")), Some("US:acm".to_string()));
    }

    #[test]
    fn test_prefix_skips_spaces_between_words() {
        let factory = PrefixCountryBlockingKeyFactory::new(5);
        assert_eq!(factory.create_key(&company("A B C Holdings", "de")), Some("DE:abcho".to_string()));
    }

    #[test]
    fn test_short_names_use_whole_name() {
        let factory = PrefixCountryBlockingKeyFactory::new(3);
        assert_eq!(factory.create_key(&company("3M", "US")), Some("US:3m".to_string()));
    }

    #[test]
    fn test_unblockable_when_name_normalizes_to_empty() {
        let factory = PrefixCountryBlockingKeyFactory::default();
        assert_eq!(factory.create_key(&company("日本電気", "JP")), None);
        assert_eq!(factory.create_key(&company("!!!", "US")), None);
    }

    #[test]
    fn test_zero_prefix_length_never_blocks() {
        let factory = PrefixCountryBlockingKeyFactory::new(0);
        assert_eq!(factory.create_key(&company("Acme", "US")), None);
    }
}
