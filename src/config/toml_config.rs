use crate::adapters::blocking::{PrefixCountryBlockingKeyFactory, DEFAULT_PREFIX_LENGTH};
use crate::adapters::semantic_http::{HttpSemanticSearch, DEFAULT_TIMEOUT_SECONDS};
use crate::adapters::strategies::{
    DomainStrategy, LevenshteinNameStrategy, TaxIdStrategy, DEFAULT_DOMAIN_WEIGHT,
    DEFAULT_NAME_WEIGHT, DEFAULT_TAX_ID_WEIGHT,
};
use crate::core::match_companies::{MatchCompanies, DEFAULT_MAX_SEMANTIC_CANDIDATES};
use crate::domain::golden_record::GoldenRecordFactory;
use crate::domain::linker::{CompanyIdentityLinker, ConfidenceThreshold};
use crate::domain::ports::MatchingStrategy;
use crate::utils::error::{MatcherError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

const MAX_PREFIX_LENGTH: usize = 32;
const MAX_STRATEGY_WEIGHT: u32 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub blocking: BlockingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub semantic_search: Option<SemanticSearchConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockingConfig {
    #[serde(default = "default_prefix_length")]
    pub prefix_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_tax_id_weight")]
    pub tax_id_weight: u32,
    #[serde(default = "default_domain_weight")]
    pub domain_weight: u32,
    #[serde(default = "default_name_weight")]
    pub name_weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticSearchConfig {
    pub endpoint: String,
    pub max_candidates: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_filename")]
    pub filename: String,
    #[serde(default)]
    pub confirmed_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_prefix_length() -> usize {
    DEFAULT_PREFIX_LENGTH
}

fn default_threshold() -> u32 {
    ConfidenceThreshold::HIGH
}

fn default_tax_id_weight() -> u32 {
    DEFAULT_TAX_ID_WEIGHT
}

fn default_domain_weight() -> u32 {
    DEFAULT_DOMAIN_WEIGHT
}

fn default_name_weight() -> u32 {
    DEFAULT_NAME_WEIGHT
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_filename() -> String {
    "matches.json".to_string()
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            prefix_length: default_prefix_length(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            tax_id_weight: default_tax_id_weight(),
            domain_weight: default_domain_weight(),
            name_weight: default_name_weight(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_filename(),
            confirmed_only: false,
        }
    }
}

impl MatcherConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatcherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after substituting `${VAR}` references from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MatcherError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn max_semantic_candidates(&self) -> usize {
        self.semantic_search
            .as_ref()
            .and_then(|s| s.max_candidates)
            .unwrap_or(DEFAULT_MAX_SEMANTIC_CANDIDATES)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Strategies in scoring order: tax id, domain, name.
    pub fn strategies(&self) -> Vec<Box<dyn MatchingStrategy>> {
        vec![
            Box::new(TaxIdStrategy::new(self.scoring.tax_id_weight)),
            Box::new(DomainStrategy::new(self.scoring.domain_weight)),
            Box::new(LevenshteinNameStrategy::new(self.scoring.name_weight)),
        ]
    }

    pub fn semantic_search(&self) -> Result<Option<HttpSemanticSearch>> {
        let Some(config) = &self.semantic_search else {
            return Ok(None);
        };

        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
        let search = HttpSemanticSearch::new(config.endpoint.clone(), timeout)?
            .with_retry(
                config.retry_attempts.unwrap_or(0),
                Duration::from_secs(config.retry_delay_seconds.unwrap_or(1)),
            )
            .with_headers(config.headers.clone().unwrap_or_default());
        Ok(Some(search))
    }

    /// Wires the matcher described by this configuration.
    pub fn build_matcher(&self) -> Result<MatchCompanies<PrefixCountryBlockingKeyFactory>> {
        let linker = CompanyIdentityLinker::with_threshold(self.strategies(), self.scoring.threshold);
        let matcher = MatchCompanies::new(
            PrefixCountryBlockingKeyFactory::new(self.blocking.prefix_length),
            linker,
            GoldenRecordFactory::new(),
        );

        Ok(match self.semantic_search()? {
            Some(search) => matcher.with_semantic_search(Arc::new(search)),
            None => matcher,
        })
    }
}

impl Validate for MatcherConfig {
    fn validate(&self) -> Result<()> {
        validation::check_range("blocking.prefix_length", self.blocking.prefix_length, 1, MAX_PREFIX_LENGTH)?;

        let weights = [
            ("scoring.tax_id_weight", self.scoring.tax_id_weight),
            ("scoring.domain_weight", self.scoring.domain_weight),
            ("scoring.name_weight", self.scoring.name_weight),
        ];
        for (field, weight) in weights {
            validation::check_range(field, weight, 0, MAX_STRATEGY_WEIGHT)?;
        }

        let max_score: u64 = weights.iter().map(|(_, weight)| u64::from(*weight)).sum();
        if max_score == 0 {
            return Err(MatcherError::ConfigValidationError {
                field: "scoring".to_string(),
                message: "At least one strategy weight must be positive".to_string(),
            });
        }
        if u64::from(self.scoring.threshold) > max_score || self.scoring.threshold == 0 {
            return Err(MatcherError::InvalidConfigValueError {
                field: "scoring.threshold".to_string(),
                value: self.scoring.threshold.to_string(),
                reason: format!("Must be between 1 and the strategy weight sum {}", max_score),
            });
        }

        if let Some(semantic) = &self.semantic_search {
            validation::check_endpoint("semantic_search.endpoint", &semantic.endpoint)?;
            if let Some(max) = semantic.max_candidates {
                validation::check_range("semantic_search.max_candidates", max, 1, 1000)?;
            }
            if let Some(timeout) = semantic.timeout_seconds {
                validation::check_range("semantic_search.timeout_seconds", timeout, 1, 300)?;
            }
        }

        validation::check_non_blank("output.path", &self.output.path)?;
        validation::check_non_blank("output.filename", &self.output.filename)?;
        Ok(())
    }
}
