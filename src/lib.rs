pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::MatcherConfig;

pub use adapters::blocking::PrefixCountryBlockingKeyFactory;
pub use adapters::storage::LocalStorage;
pub use core::{
    engine::MatchEngine,
    match_companies::{CompanyMatch, MatchCompanies, MatchCompaniesRequest, MatchCompaniesResponse},
    report::{MatchReport, ReportWriter},
};
pub use domain::company::{Company, CompanyProps};
pub use domain::decision::{MatchDecision, SimilarityContribution};
pub use domain::golden_record::{GoldenRecord, GoldenRecordFactory};
pub use domain::linker::{CompanyIdentityLinker, ConfidenceThreshold};
pub use utils::error::{InvalidRecord, MatchError, MatcherError, Result};
