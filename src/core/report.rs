use crate::core::match_companies::{CompanyMatch, MatchCompaniesRequest, MatchCompaniesResponse};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub source_count: usize,
    pub candidate_count: usize,
    pub comparisons_performed: usize,
    pub confirmed_count: usize,
    pub matches: Vec<CompanyMatch>,
}

impl MatchReport {
    pub fn new(request: &MatchCompaniesRequest, response: MatchCompaniesResponse) -> Self {
        let confirmed_count = response.confirmed_count();
        Self {
            generated_at: Utc::now(),
            source_count: request.source_companies.len(),
            candidate_count: request.candidate_companies.len(),
            comparisons_performed: response.comparisons_performed,
            confirmed_count,
            matches: response.matches,
        }
    }

    /// Drops rejected decisions from the report; counts are kept as computed.
    pub fn confirmed_only(mut self) -> Self {
        self.matches.retain(CompanyMatch::is_confirmed);
        self
    }
}

/// Writes match reports as pretty JSON through a storage backend.
pub struct ReportWriter<S: Storage> {
    storage: S,
    filename: String,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, filename: impl Into<String>) -> Self {
        Self {
            storage,
            filename: filename.into(),
        }
    }

    pub async fn write(&self, report: &MatchReport) -> Result<String> {
        let json = serde_json::to_string_pretty(report)?;
        tracing::debug!("Writing match report ({} bytes) to {}", json.len(), self.filename);
        self.storage.write_file(&self.filename, json.as_bytes()).await?;
        Ok(self.filename.clone())
    }
}
