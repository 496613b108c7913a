use crate::domain::company::Company;
use crate::domain::decision::SimilarityContribution;
use crate::utils::error::{Result, SemanticSearchError};
use async_trait::async_trait;

/// Scores one attribute family of a company pair.
pub trait MatchingStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn weight(&self) -> u32;
    fn calculate_similarity(&self, source: &Company, candidate: &Company) -> SimilarityContribution;
}

/// Maps a company to its coarse grouping key, or `None` when it cannot be blocked.
pub trait BlockingKeyFactory: Send + Sync {
    fn create_key(&self, company: &Company) -> Option<String>;
}

/// Nearest-neighbor lookup used for companies that produce no blocking key.
///
/// Implementations own their timeout and retry policy.
#[async_trait]
pub trait SemanticCompanySearch: Send + Sync {
    async fn find_nearest_neighbors(
        &self,
        company: &Company,
        top_k: usize,
    ) -> std::result::Result<Vec<Company>, SemanticSearchError>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
