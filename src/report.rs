//! CSV persistence for batch reports and normalized email exports.
//!
//! Both writers overwrite the target file and create missing parent
//! directories.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::ReportError;
use crate::pipeline::types::{BatchReport, Email};
use crate::text::TextNormalizer;

/// One report row per processed email.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: &'a str,
    classification: Option<&'static str>,
    /// The full email as a JSON object.
    email: String,
    response: Option<&'a str>,
    actions: String,
    error: Option<&'a str>,
    processing_time: f64,
}

/// Report columns, in `ReportRow` field order.
const REPORT_COLUMNS: [&str; 7] = [
    "id",
    "classification",
    "email",
    "response",
    "actions",
    "error",
    "processing_time",
];

/// Write the batch report as CSV. The header row is written even when the
/// batch produced no results.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(REPORT_COLUMNS)?;

    for result in &report.results {
        writer.serialize(ReportRow {
            id: &result.email.id,
            classification: result.category.map(|c| c.label()),
            email: serde_json::to_string(&result.email)?,
            response: result.response.as_deref(),
            actions: result.actions.join(";"),
            error: result.error.as_deref(),
            processing_time: result.processing_time,
        })?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        rows = report.results.len(),
        run_id = %report.run_id,
        "Wrote batch report"
    );
    Ok(())
}

/// An email with normalized text and an integer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEmail {
    pub id: i64,
    #[serde(rename = "from")]
    pub sender: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub timestamp: String,
}

/// Normalize subject and body of every email and coerce ids to integers.
///
/// Fails on the first id that does not parse; no partial output is produced.
pub fn normalize_emails(
    emails: &[Email],
    normalizer: &dyn TextNormalizer,
) -> Result<Vec<NormalizedEmail>, ReportError> {
    emails
        .iter()
        .map(|email| {
            let id = email
                .id
                .trim()
                .parse::<i64>()
                .map_err(|_| ReportError::InvalidId {
                    id: email.id.clone(),
                })?;
            Ok(NormalizedEmail {
                id,
                sender: email.sender.clone(),
                subject: normalizer.normalize(email.subject.as_deref()),
                body: normalizer.normalize(email.body.as_deref()),
                timestamp: email.timestamp.clone(),
            })
        })
        .collect()
}

/// Write normalized emails as CSV.
pub fn write_normalized_emails(rows: &[NormalizedEmail], path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Wrote normalized email export");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
