//! Form validators for contact messages and service inquiries
//!
//! Required fields are checked for presence and length. Optional fields are
//! trimmed and empty strings become `None`; numeric, date and enum optionals
//! that fail to parse are coerced to `None` instead of rejecting the form.
//! Every offending field is reported, not only the first one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest accepted email address
pub const MAX_EMAIL_LEN: usize = 254;

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Whether the client already has a dataset for the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetAvailability {
    Yes,
    No,
    Partial,
}

impl DatasetAvailability {
    /// Lenient parse; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Partial => "partial",
        }
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check a required text field; records an error and returns `None` on failure
fn required_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    label: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let Some(value) = trimmed(value) else {
        errors.push(FieldError::new(field, format!("{} is required", label)));
        return None;
    };

    let len = value.chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("{} must be at least {} characters", label, min),
        ));
        return None;
    }
    if len > max {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", label, max),
        ));
        return None;
    }
    Some(value)
}

fn required_email(errors: &mut Vec<FieldError>, value: Option<&str>) -> Option<String> {
    let Some(value) = trimmed(value) else {
        errors.push(FieldError::new("email", "Email is required"));
        return None;
    };
    if !is_valid_email(&value) {
        errors.push(FieldError::new("email", "Email address is not valid"));
        return None;
    }
    Some(value)
}

/// Syntactic email check: `local@domain.tld`, no whitespace
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Parse a budget figure, tolerating currency symbols and thousands separators
fn parse_budget(value: Option<&str>) -> Option<i64> {
    let cleaned: String = trimmed(value)?
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '_' | ' '))
        .collect();
    cleaned.parse::<i64>().ok().filter(|v| *v >= 0)
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&trimmed(value)?, "%Y-%m-%d").ok()
}

// ============================================================================
// Contact form
// ============================================================================

/// Contact form as posted by the site; every field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Contact form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactSubmission, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required_text(&mut errors, "name", "Name", self.name.as_deref(), 2, 100);
        let email = required_email(&mut errors, self.email.as_deref());
        let message = required_text(
            &mut errors,
            "message",
            "Message",
            self.message.as_deref(),
            10,
            5000,
        );
        let subject = trimmed(self.subject.as_deref());
        if subject.as_ref().is_some_and(|s| s.chars().count() > 200) {
            errors.push(FieldError::new("subject", "Subject must be at most 200 characters"));
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(ContactSubmission {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Service inquiry form
// ============================================================================

/// Text fields of a service-inquiry multipart form
#[derive(Debug, Default, Clone)]
pub struct InquiryForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub client_type: Option<String>,
    pub study_year: Option<String>,
    pub project_title: Option<String>,
    pub domain: Option<String>,
    pub details: Option<String>,
    pub dataset_available: Option<String>,
    pub budget_min: Option<String>,
    pub budget_max: Option<String>,
    pub deadline: Option<String>,
}

/// Inquiry that passed validation, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct InquirySubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub client_type: Option<String>,
    pub study_year: Option<String>,
    pub project_title: String,
    pub domain: Option<String>,
    pub details: String,
    pub dataset_available: Option<DatasetAvailability>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub deadline: Option<NaiveDate>,
}

impl InquiryForm {
    /// Store a named text field. Returns `false` for unknown field names.
    ///
    /// The site posts both snake_case and camelCase names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "client_type" | "clientType" => &mut self.client_type,
            "study_year" | "studyYear" => &mut self.study_year,
            "project_title" | "projectTitle" => &mut self.project_title,
            "domain" => &mut self.domain,
            "details" | "projectDetails" => &mut self.details,
            "dataset_available" | "datasetAvailable" => &mut self.dataset_available,
            "budget_min" | "budgetMin" => &mut self.budget_min,
            "budget_max" | "budgetMax" => &mut self.budget_max,
            "deadline" => &mut self.deadline,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn validate(&self) -> Result<InquirySubmission, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required_text(&mut errors, "name", "Name", self.name.as_deref(), 2, 100);
        let email = required_email(&mut errors, self.email.as_deref());
        let project_title = required_text(
            &mut errors,
            "project_title",
            "Project title",
            self.project_title.as_deref(),
            3,
            200,
        );
        let details = required_text(
            &mut errors,
            "details",
            "Project details",
            self.details.as_deref(),
            10,
            5000,
        );

        match (name, email, project_title, details) {
            (Some(name), Some(email), Some(project_title), Some(details)) if errors.is_empty() => {
                Ok(InquirySubmission {
                    name,
                    email,
                    phone: trimmed(self.phone.as_deref()),
                    client_type: trimmed(self.client_type.as_deref()),
                    study_year: trimmed(self.study_year.as_deref()),
                    project_title,
                    domain: trimmed(self.domain.as_deref()),
                    details,
                    dataset_available: self
                        .dataset_available
                        .as_deref()
                        .and_then(DatasetAvailability::parse),
                    budget_min: parse_budget(self.budget_min.as_deref()),
                    budget_max: parse_budget(self.budget_max.as_deref()),
                    deadline: parse_date(self.deadline.as_deref()),
                })
            }
            _ => Err(errors),
        }
    }
}
