// src/batch/mod.rs
use crate::extractors::{extract_from_str, ExtractedRecord};
use crate::utils::error::ExtractError;
use serde::Serialize;

pub const APPLICATION_STATUS: &str = "From Processed Application Report";

/// Export header, in column order.
pub const COLUMNS: [&str; 14] = [
    "Application Current Status",
    "Consumer Name",
    "Gender",
    "PAN",
    "Address",
    "DOB",
    "State",
    "Mobile",
    "Age",
    "Total Income",
    "Bureau Score",
    "Account Institutions",
    "Account AccountTypes",
    "Account OwnershipTypes",
];

/// One raw input: a name to report errors against and its bytes.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub identifier: String,
    pub content: Vec<u8>,
}

impl SourceDocument {
    pub fn new(identifier: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self { identifier: identifier.into(), content: content.into() }
    }
}

/// A record projected onto the export columns. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Application Current Status")]
    pub application_status: String,
    #[serde(rename = "Consumer Name")]
    pub consumer_name: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "PAN")]
    pub pan: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Mobile")]
    pub mobile: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Total Income")]
    pub total_income: String, // filled in by hand later
    #[serde(rename = "Bureau Score")]
    pub bureau_score: String,
    #[serde(rename = "Account Institutions")]
    pub institutions: String,
    #[serde(rename = "Account AccountTypes")]
    pub account_types: String,
    #[serde(rename = "Account OwnershipTypes")]
    pub ownership_types: String,
}

impl ReportRow {
    /// Cell values in column order.
    pub fn cells(&self) -> [&str; 14] {
        [
            self.application_status.as_str(),
            self.consumer_name.as_str(),
            self.gender.as_str(),
            self.pan.as_str(),
            self.address.as_str(),
            self.dob.as_str(),
            self.state.as_str(),
            self.mobile.as_str(),
            self.age.as_str(),
            self.total_income.as_str(),
            self.bureau_score.as_str(),
            self.institutions.as_str(),
            self.account_types.as_str(),
            self.ownership_types.as_str(),
        ]
    }
}

impl From<ExtractedRecord> for ReportRow {
    fn from(record: ExtractedRecord) -> Self {
        Self {
            application_status: APPLICATION_STATUS.to_string(),
            consumer_name: record.consumer_name,
            gender: record.gender,
            pan: record.pan_id,
            address: record.address,
            dob: record.date_of_birth,
            state: record.state,
            mobile: record.mobile,
            age: record.age,
            total_income: String::new(),
            bureau_score: record.bureau_score,
            institutions: record.institutions.render(),
            account_types: record.account_types.render(),
            ownership_types: record.ownership_types.render(),
        }
    }
}

#[derive(Debug)]
pub struct DocumentFailure {
    pub identifier: String,
    pub error: ExtractError,
}

impl DocumentFailure {
    pub fn new(identifier: impl Into<String>, error: ExtractError) -> Self {
        Self { identifier: identifier.into(), error }
    }

    pub fn reason(&self) -> String {
        self.error.to_string()
    }
}

/// Rows for the documents that extracted, failures for the rest.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub rows: Vec<ReportRow>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    pub fn success_count(&self) -> usize {
        self.rows.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Folds in failures that happened before assembly (e.g. unreadable files).
    pub fn with_failures(mut self, failures: Vec<DocumentFailure>) -> Self {
        self.failures.extend(failures);
        self
    }
}

/// Decodes and extracts a single document.
pub fn process_document(doc: &SourceDocument) -> Result<ReportRow, ExtractError> {
    let text = std::str::from_utf8(&doc.content)?;
    let record = extract_from_str(&doc.identifier, text)?;
    Ok(ReportRow::from(record))
}

/// Runs every document through extraction, keeping input order.
/// A failing document is recorded and skipped; the rest still go through.
pub fn assemble<'a, I>(documents: I) -> BatchOutcome
where
    I: IntoIterator<Item = &'a SourceDocument>,
{
    let mut outcome = BatchOutcome::default();

    for doc in documents {
        match process_document(doc) {
            Ok(row) => {
                tracing::debug!("Extracted record from {}", doc.identifier);
                outcome.rows.push(row);
            }
            Err(e) => {
                tracing::error!("Failed to read {}: {}", doc.identifier, e);
                outcome.failures.push(DocumentFailure::new(doc.identifier.clone(), e));
            }
        }
    }

    tracing::info!(
        "Batch finished. Success: {}, Failures: {}",
        outcome.success_count(),
        outcome.failure_count()
    );
    outcome
}
