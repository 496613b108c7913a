use crate::domain::company::{Company, CompanyId};
use crate::domain::decision::MatchDecision;
use crate::domain::golden_record::{GoldenRecord, GoldenRecordFactory};
use crate::domain::linker::CompanyIdentityLinker;
use crate::domain::ports::{BlockingKeyFactory, SemanticCompanySearch};
use crate::utils::error::MatchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAX_SEMANTIC_CANDIDATES: usize = 25;

#[derive(Debug, Clone)]
pub struct MatchCompaniesRequest {
    pub source_companies: Vec<Company>,
    pub candidate_companies: Vec<Company>,
    pub max_semantic_candidates: Option<usize>,
}

impl MatchCompaniesRequest {
    pub fn new(source_companies: Vec<Company>, candidate_companies: Vec<Company>) -> Self {
        Self {
            source_companies,
            candidate_companies,
            max_semantic_candidates: None,
        }
    }

    pub fn with_max_semantic_candidates(mut self, max: usize) -> Self {
        self.max_semantic_candidates = Some(max);
        self
    }
}

/// One decision of a run. Only confirmed decisions carry a golden record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMatch {
    pub source_id: CompanyId,
    /// `None` when the source could not be compared against anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CompanyId>,
    pub decision: MatchDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golden_record: Option<GoldenRecord>,
}

impl CompanyMatch {
    pub fn is_confirmed(&self) -> bool {
        self.decision.is_confirmed()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCompaniesResponse {
    pub matches: Vec<CompanyMatch>,
    pub comparisons_performed: usize,
}

impl MatchCompaniesResponse {
    pub fn confirmed(&self) -> impl Iterator<Item = &CompanyMatch> {
        self.matches.iter().filter(|m| m.is_confirmed())
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed().count()
    }
}

/// Resolves source companies against a candidate pool.
///
/// Candidates are grouped by blocking key once per run. Each source is linked
/// against its own block, or against semantic-search neighbors when it has no
/// key. A semantic-search failure fails the whole run.
pub struct MatchCompanies<B: BlockingKeyFactory> {
    blocking_key_factory: B,
    identity_linker: CompanyIdentityLinker,
    golden_record_factory: GoldenRecordFactory,
    semantic_search: Option<Arc<dyn SemanticCompanySearch>>,
}

impl<B: BlockingKeyFactory> MatchCompanies<B> {
    pub fn new(
        blocking_key_factory: B,
        identity_linker: CompanyIdentityLinker,
        golden_record_factory: GoldenRecordFactory,
    ) -> Self {
        Self {
            blocking_key_factory,
            identity_linker,
            golden_record_factory,
            semantic_search: None,
        }
    }

    pub fn with_semantic_search(mut self, semantic_search: Arc<dyn SemanticCompanySearch>) -> Self {
        self.semantic_search = Some(semantic_search);
        self
    }

    pub fn has_semantic_search(&self) -> bool {
        self.semantic_search.is_some()
    }

    pub fn identity_linker(&self) -> &CompanyIdentityLinker {
        &self.identity_linker
    }

    pub async fn execute(
        &self,
        request: &MatchCompaniesRequest,
    ) -> Result<MatchCompaniesResponse, MatchError> {
        if request.source_companies.is_empty() || request.candidate_companies.is_empty() {
            return Err(MatchError::InvalidRequest {
                message: "both datasets must be non-empty".to_string(),
            });
        }

        let blocks = self.build_blocks(&request.candidate_companies);
        tracing::debug!(
            "Built {} blocks from {} candidates",
            blocks.len(),
            request.candidate_companies.len()
        );

        let max_semantic = request
            .max_semantic_candidates
            .unwrap_or(DEFAULT_MAX_SEMANTIC_CANDIDATES);

        let mut matches = Vec::new();
        let mut comparisons_performed = 0;

        for source in &request.source_companies {
            match self.blocking_key_factory.create_key(source) {
                Some(key) => {
                    let bucket = blocks.get(&key).map(Vec::as_slice).unwrap_or_default();
                    comparisons_performed += self.compare(source, bucket.iter().copied(), &mut matches);
                }
                None => {
                    let Some(semantic_search) = &self.semantic_search else {
                        tracing::debug!("Source {} is unblockable, no semantic search configured", source.id());
                        matches.push(CompanyMatch {
                            source_id: source.id().to_string(),
                            candidate_id: None,
                            decision: MatchDecision::rejected(0, Vec::new()),
                            golden_record: None,
                        });
                        continue;
                    };

                    tracing::debug!(
                        "Source {} is unblockable, requesting up to {} semantic neighbors",
                        source.id(),
                        max_semantic
                    );
                    let neighbors = semantic_search
                        .find_nearest_neighbors(source, max_semantic)
                        .await
                        .map_err(|e| {
                            tracing::warn!("Semantic search failed for source {}: {}", source.id(), e.message);
                            MatchError::SemanticSearchUnavailable { message: e.message }
                        })?;

                    comparisons_performed += self.compare(source, neighbors.iter(), &mut matches);
                }
            }
        }

        Ok(MatchCompaniesResponse {
            matches,
            comparisons_performed,
        })
    }

    fn build_blocks<'a>(&self, candidates: &'a [Company]) -> HashMap<String, Vec<&'a Company>> {
        let mut blocks: HashMap<String, Vec<&Company>> = HashMap::new();
        for candidate in candidates {
            if let Some(key) = self.blocking_key_factory.create_key(candidate) {
                blocks.entry(key).or_default().push(candidate);
            }
        }
        blocks
    }

    fn compare<'a>(
        &self,
        source: &Company,
        candidates: impl Iterator<Item = &'a Company>,
        matches: &mut Vec<CompanyMatch>,
    ) -> usize {
        let mut comparisons = 0;
        for candidate in candidates {
            comparisons += 1;
            let decision = self.identity_linker.link(source, candidate);
            let golden_record = match &decision {
                MatchDecision::Confirmed { score, .. } => {
                    tracing::debug!("Confirmed {} <-> {} (score {})", source.id(), candidate.id(), score);
                    Some(self.golden_record_factory.create(source, candidate))
                }
                MatchDecision::Rejected { .. } => None,
            };
            matches.push(CompanyMatch {
                source_id: source.id().to_string(),
                candidate_id: Some(candidate.id().to_string()),
                decision,
                golden_record,
            });
        }
        comparisons
    }
}
