use crate::utils::error::CompanyValidationError;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub type CompanyId = String;

/// Raw attributes of a company as they arrive from a dataset or a search backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProps {
    #[serde(default)]
    pub id: CompanyId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, alias = "tax_id", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, alias = "address_line1", skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, alias = "postal_code", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// A validated company record.
///
/// `Company::create` is the only way to obtain one; `id`, `name` and `country`
/// are guaranteed non-blank and `name`/`country` are stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Company {
    props: CompanyProps,
}

impl Company {
    pub fn create(props: CompanyProps) -> Result<Self, CompanyValidationError> {
        if props.id.trim().is_empty() {
            return Err(CompanyValidationError::required("id"));
        }
        if props.name.trim().is_empty() {
            return Err(CompanyValidationError::required("name"));
        }
        if props.country.trim().is_empty() {
            return Err(CompanyValidationError::required("country"));
        }

        let name = props.name.trim().to_string();
        let country = props.country.trim().to_string();

        Ok(Self {
            props: CompanyProps {
                name,
                country,
                ..props
            },
        })
    }

    pub fn id(&self) -> &str {
        &self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn country(&self) -> &str {
        &self.props.country
    }

    pub fn domain(&self) -> Option<&str> {
        self.props.domain.as_deref()
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.props.tax_id.as_deref()
    }

    pub fn address_line1(&self) -> Option<&str> {
        self.props.address_line1.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.props.city.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.props.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.props.postal_code.as_deref()
    }

    pub fn props(&self) -> &CompanyProps {
        &self.props
    }

    pub fn normalized_name(&self) -> String {
        normalize_text(self.name())
    }

    pub fn normalized_domain(&self) -> Option<String> {
        non_blank(self.domain()).map(normalize_domain)
    }

    pub fn normalized_tax_id(&self) -> Option<String> {
        non_blank(self.tax_id()).map(normalize_tax_id)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Folds a company name into a comparable form: diacritics removed,
/// lower-case ASCII letters and digits, single spaces between words.
pub fn normalize_text(value: &str) -> String {
    let folded: String = value
        .nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase();

    let mut normalized = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(c);
        } else {
            pending_space = true;
        }
    }

    normalized
}

pub fn normalize_domain(domain: &str) -> String {
    let cleaned = domain.trim().to_lowercase();
    let no_scheme = cleaned
        .strip_prefix("https://")
        .or_else(|| cleaned.strip_prefix("http://"))
        .unwrap_or(cleaned.as_str());
    let host = no_scheme.split('/').next().unwrap_or(no_scheme);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

pub fn normalize_tax_id(tax_id: &str) -> String {
    tax_id
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(id: &str, name: &str, country: &str) -> CompanyProps {
        CompanyProps {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_trims_name_and_country() {
        let company = Company::create(props("c1", "  Acme Inc ", " us ")).unwrap();
        assert_eq!(company.id(), "c1");
        assert_eq!(company.name(), "Acme Inc");
        assert_eq!(company.country(), "us");
    }

    #[test]
    fn test_create_reports_first_blank_field() {
        let err = Company::create(props(" ", "", "")).unwrap_err();
        assert_eq!(err.field, "id");

        let err = Company::create(props("c1", "   ", "")).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "name is required");

        let err = Company::create(props("c1", "Acme", "\t")).unwrap_err();
        assert_eq!(err.field, "country");
    }

    #[test]
    fn test_normalize_text_strips_diacritics_and_punctuation() {
        assert_eq!(normalize_text("Société Générale S.A."), "societe generale s a");
        assert_eq!(normalize_text("  ACME, INC.  "), "acme inc");
        assert_eq!(normalize_text("Müller & Söhne GmbH"), "muller sohne gmbh");
        assert_eq!(normalize_text("---"), "");
    }

    #[test]
    fn test_normalize_text_is_idempotent() {
        for name in ["Société Générale", "ACME INC.", "  o'Reilly--Media 2  ", "Ærø"] {
            let once = normalize_text(name);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("https://www.Acme.com/about"), "acme.com");
        assert_eq!(normalize_domain("http://acme.com"), "acme.com");
        assert_eq!(normalize_domain("WWW.ACME.COM"), "acme.com");
        assert_eq!(normalize_domain(" acme.io/path/x "), "acme.io");
    }

    #[test]
    fn test_normalize_tax_id() {
        assert_eq!(normalize_tax_id(" de 123 456\t789 "), "DE123456789");
    }

    #[test]
    fn test_blank_optional_fields_normalize_to_absent() {
        let company = Company::create(CompanyProps {
            domain: Some("   ".to_string()),
            tax_id: Some("".to_string()),
            ..props("c1", "Acme", "US")
        })
        .unwrap();

        assert_eq!(company.normalized_domain(), None);
        assert_eq!(company.normalized_tax_id(), None);
    }

    #[test]
    fn test_deserializes_camel_case_with_missing_required_fields() {
        let props: CompanyProps =
            serde_json::from_str(r#"{"id":"c1","taxId":"123","postalCode":"10001"}"#).unwrap();
        assert_eq!(props.tax_id.as_deref(), Some("123"));
        assert_eq!(props.postal_code.as_deref(), Some("10001"));
        assert_eq!(Company::create(props).unwrap_err().field, "name");
    }
}
