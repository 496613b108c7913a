use crate::core::match_companies::MatchCompaniesRequest;
use crate::domain::company::{Company, CompanyProps};
use crate::domain::ports::Storage;
use crate::utils::error::{InvalidRecord, MatcherError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(DatasetFormat::Json),
            Some("csv") => Ok(DatasetFormat::Csv),
            _ => Err(MatcherError::UnsupportedFormatError {
                path: path.to_string(),
            }),
        }
    }
}

/// JSON body carrying both datasets, as accepted by the match endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequestDto {
    #[serde(default)]
    pub source_companies: Vec<CompanyProps>,
    #[serde(default)]
    pub candidate_companies: Vec<CompanyProps>,
    #[serde(default)]
    pub max_semantic_candidates: Option<usize>,
}

impl MatchRequestDto {
    /// Validates both datasets; either one failing rejects the whole request.
    pub fn into_request(self) -> Result<MatchCompaniesRequest> {
        let source_companies = validated("source", self.source_companies)?;
        let candidate_companies = validated("candidate", self.candidate_companies)?;
        Ok(MatchCompaniesRequest {
            source_companies,
            candidate_companies,
            max_semantic_candidates: self.max_semantic_candidates,
        })
    }
}

/// Validates every record, returning all validation errors when any record fails.
pub fn map_companies(
    props: Vec<CompanyProps>,
) -> std::result::Result<Vec<Company>, Vec<InvalidRecord>> {
    let mut companies = Vec::with_capacity(props.len());
    let mut errors = Vec::new();

    for (index, record) in props.into_iter().enumerate() {
        match Company::create(record) {
            Ok(company) => companies.push(company),
            Err(error) => errors.push(InvalidRecord { index, error }),
        }
    }

    if errors.is_empty() {
        Ok(companies)
    } else {
        Err(errors)
    }
}

fn validated(dataset: &str, props: Vec<CompanyProps>) -> Result<Vec<Company>> {
    map_companies(props).map_err(|errors| MatcherError::DatasetValidationError {
        dataset: dataset.to_string(),
        errors,
    })
}

pub fn parse_company_props(data: &[u8], format: DatasetFormat) -> Result<Vec<CompanyProps>> {
    match format {
        DatasetFormat::Json => Ok(serde_json::from_slice(data)?),
        DatasetFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(data);
            let mut props = Vec::new();
            for row in reader.deserialize::<CompanyProps>() {
                props.push(row?);
            }
            Ok(props)
        }
    }
}

/// Loads company datasets and request files through a storage backend.
pub struct DatasetLoader<S: Storage> {
    storage: S,
}

impl<S: Storage> DatasetLoader<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Reads a JSON or CSV dataset and validates every company in it.
    pub async fn load_companies(&self, dataset: &str, path: &str) -> Result<Vec<Company>> {
        let format = DatasetFormat::from_path(path)?;
        let data = self.storage.read_file(path).await?;
        let props = parse_company_props(&data, format)?;
        tracing::debug!("Read {} {} records from {}", props.len(), dataset, path);
        validated(dataset, props)
    }

    pub async fn load_request(&self, path: &str) -> Result<MatchCompaniesRequest> {
        let data = self.storage.read_file(path).await?;
        let dto: MatchRequestDto = serde_json::from_slice(&data)?;
        dto.into_request()
    }
}
