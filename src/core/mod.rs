pub mod engine;
pub mod match_companies;
pub mod report;

pub use crate::domain::company::{Company, CompanyProps};
pub use crate::domain::ports::{BlockingKeyFactory, MatchingStrategy, SemanticCompanySearch, Storage};
pub use crate::utils::error::Result;
