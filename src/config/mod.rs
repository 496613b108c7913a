pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::dataset::DatasetFormat;
#[cfg(feature = "cli")]
use crate::utils::error::{MatcherError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub use toml_config::MatcherConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "company-matcher")]
#[command(about = "Resolve which candidate companies denote the same entity as each source company")]
pub struct CliConfig {
    /// Source companies (.json or .csv)
    #[arg(long)]
    pub source: Option<String>,

    /// Candidate companies (.json or .csv)
    #[arg(long)]
    pub candidates: Option<String>,

    /// JSON request body with `sourceCompanies` and `candidateCompanies`
    #[arg(long, conflicts_with_all = ["source", "candidates"])]
    pub request: Option<String>,

    /// Path to the TOML matcher configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the match report is written to (overrides the config file)
    #[arg(long)]
    pub output_path: Option<String>,

    /// Neighbors requested from semantic search per unblockable source
    #[arg(long)]
    pub max_semantic_candidates: Option<usize>,

    /// Only write confirmed matches to the report
    #[arg(long)]
    pub confirmed_only: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML configuration (or defaults) and applies command line overrides.
    pub fn matcher_config(&self) -> Result<MatcherConfig> {
        let mut config = match &self.config {
            Some(path) => MatcherConfig::from_file(path)?,
            None => MatcherConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.output.path = output_path.clone();
        }
        if self.confirmed_only {
            config.output.confirmed_only = true;
        }
        if let Some(max) = self.max_semantic_candidates {
            let Some(semantic) = config.semantic_search.as_mut() else {
                return Err(MatcherError::ConfigError {
                    message: "--max-semantic-candidates needs a config file with [semantic_search]"
                        .to_string(),
                });
            };
            semantic.max_candidates = Some(max);
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.request {
            Some(request) => {
                if DatasetFormat::from_path(request)? != DatasetFormat::Json {
                    return Err(MatcherError::UnsupportedFormatError {
                        path: request.clone(),
                    });
                }
            }
            None => {
                DatasetFormat::from_path(validation::require("source", &self.source)?)?;
                DatasetFormat::from_path(validation::require("candidates", &self.candidates)?)?;
            }
        }
        if let Some(max) = self.max_semantic_candidates {
            validation::check_range("max_semantic_candidates", max, 1, 1000)?;
        }
        if let Some(path) = &self.output_path {
            validation::check_non_blank("output_path", path)?;
        }
        Ok(())
    }
}
