use crate::domain::company::{Company, CompanyProps};
use crate::domain::ports::SemanticCompanySearch;
use crate::utils::error::{Result, SemanticSearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NeighborsRequest<'a> {
    company: &'a CompanyProps,
    top_k: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NeighborsResponse {
    List(Vec<CompanyProps>),
    Wrapped { neighbors: Vec<CompanyProps> },
}

impl NeighborsResponse {
    fn into_props(self) -> Vec<CompanyProps> {
        match self {
            NeighborsResponse::List(props) => props,
            NeighborsResponse::Wrapped { neighbors } => neighbors,
        }
    }
}

enum AttemptError {
    Retryable(String),
    Fatal(String),
}

/// Semantic search backed by an HTTP endpoint.
///
/// POSTs `{"company": {...}, "topK": n}` and accepts either a JSON array of
/// companies or `{"neighbors": [...]}`. Transport errors and 5xx responses are
/// retried; every other failure is returned immediately.
pub struct HttpSemanticSearch {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpSemanticSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            retry_attempts: 0,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn with_retry(mut self, retry_attempts: u32, retry_delay: Duration) -> Self {
        self.retry_attempts = retry_attempts;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(
        &self,
        company: &Company,
        top_k: usize,
    ) -> std::result::Result<Vec<CompanyProps>, AttemptError> {
        let mut request = self.client.post(&self.endpoint).json(&NeighborsRequest {
            company: company.props(),
            top_k,
        });
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        tracing::debug!("Semantic search response status: {}", status);
        if status.is_server_error() {
            return Err(AttemptError::Retryable(format!(
                "{} responded with {}",
                self.endpoint, status
            )));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(format!(
                "{} responded with {}",
                self.endpoint, status
            )));
        }

        let body: NeighborsResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(format!("invalid neighbors payload: {}", e)))?;
        Ok(body.into_props())
    }
}

#[async_trait]
impl SemanticCompanySearch for HttpSemanticSearch {
    async fn find_nearest_neighbors(
        &self,
        company: &Company,
        top_k: usize,
    ) -> std::result::Result<Vec<Company>, SemanticSearchError> {
        let mut attempt = 0;
        let props = loop {
            match self.attempt(company, top_k).await {
                Ok(props) => break props,
                Err(AttemptError::Retryable(message)) if attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "Semantic search attempt {} failed: {}; retrying in {:?}",
                        attempt,
                        message,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(AttemptError::Retryable(message)) | Err(AttemptError::Fatal(message)) => {
                    return Err(SemanticSearchError::new(message));
                }
            }
        };

        let mut neighbors = Vec::with_capacity(props.len().min(top_k));
        for (index, neighbor) in props.into_iter().take(top_k).enumerate() {
            let company = Company::create(neighbor).map_err(|e| {
                SemanticSearchError::new(format!("neighbor {} is invalid: {}", index, e))
            })?;
            neighbors.push(company);
        }

        tracing::debug!("Semantic search returned {} neighbors", neighbors.len());
        Ok(neighbors)
    }
}
