use crate::domain::company::{Company, CompanyId, CompanyProps};
use serde::{Deserialize, Serialize};

/// Canonical record merged from a confirmed source/candidate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenRecord {
    pub id: String,
    pub source_company_id: CompanyId,
    pub matched_company_id: CompanyId,
    pub merged: CompanyProps,
}

/// Builds golden records field by field: the longer trimmed value wins and
/// ties go to the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoldenRecordFactory;

impl GoldenRecordFactory {
    pub fn new() -> Self {
        Self
    }

    // The id is not escaped, so ids containing ':' can collide.
    pub fn golden_id(source_id: &str, candidate_id: &str) -> String {
        format!("golden:{}:{}", source_id, candidate_id)
    }

    pub fn create(&self, source: &Company, candidate: &Company) -> GoldenRecord {
        let id = Self::golden_id(source.id(), candidate.id());

        let merged = CompanyProps {
            id: id.clone(),
            name: pick_best_required_text(source.name(), candidate.name()),
            country: pick_best_required_text(source.country(), candidate.country()),
            domain: pick_best_text(source.domain(), candidate.domain()),
            tax_id: pick_best_text(source.tax_id(), candidate.tax_id()),
            address_line1: pick_best_text(source.address_line1(), candidate.address_line1()),
            city: pick_best_text(source.city(), candidate.city()),
            region: pick_best_text(source.region(), candidate.region()),
            postal_code: pick_best_text(source.postal_code(), candidate.postal_code()),
        };

        GoldenRecord {
            id,
            source_company_id: source.id().to_string(),
            matched_company_id: candidate.id().to_string(),
            merged,
        }
    }

    /// Turns a golden record back into a validated company.
    ///
    /// # Panics
    ///
    /// Panics if the merged attributes fail validation, which `create` rules out.
    pub fn materialize(&self, record: &GoldenRecord) -> Company {
        match Company::create(record.merged.clone()) {
            Ok(company) => company,
            Err(e) => unreachable!("golden record {} violates company invariants: {}", record.id, e),
        }
    }
}

fn pick_best_text(a: Option<&str>, b: Option<&str>) -> Option<String> {
    let a = a.map(str::trim).filter(|v| !v.is_empty());
    let b = b.map(str::trim).filter(|v| !v.is_empty());

    match (a, b) {
        (None, None) => None,
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (Some(a), Some(b)) => {
            if a.chars().count() >= b.chars().count() {
                Some(a.to_string())
            } else {
                Some(b.to_string())
            }
        }
    }
}

fn pick_best_required_text(a: &str, b: &str) -> String {
    pick_best_text(Some(a), Some(b)).unwrap_or_else(|| a.to_string())
}
