//! Shared types for the triage pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

// ── Email ───────────────────────────────────────────────────────────

/// An ingested email. Read-only to every pipeline component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    /// Sender address.
    #[serde(rename = "from")]
    pub sender: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// ISO-8601 receive time, kept as given.
    pub timestamp: String,
}

impl Email {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            subject: Some(subject.into()),
            body: Some(body.into()),
            timestamp: timestamp.into(),
        }
    }

    /// Subject and body, if both are present and non-blank.
    pub fn subject_and_body(&self) -> Option<(&str, &str)> {
        let subject = self.subject.as_deref().filter(|s| !s.trim().is_empty())?;
        let body = self.body.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((subject, body))
    }

    /// Subject and body, or `MissingFields`.
    pub fn require_fields(&self) -> Result<(&str, &str), TriageError> {
        self.subject_and_body()
            .ok_or_else(|| TriageError::MissingFields {
                id: self.id.clone(),
            })
    }
}

// ── Category ────────────────────────────────────────────────────────

/// Closed set of classification labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Complaint,
    Inquiry,
    Feedback,
    SupportRequest,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Complaint,
        Self::Inquiry,
        Self::Feedback,
        Self::SupportRequest,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::Inquiry => "inquiry",
            Self::Feedback => "feedback",
            Self::SupportRequest => "support_request",
            Self::Other => "other",
        }
    }

    /// Parse free-form model output.
    ///
    /// Trims whitespace, quotes and trailing punctuation, lowercases, and
    /// maps spaces/hyphens to underscores before matching a label.
    pub fn parse_model_output(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '*'))
            .trim()
            .to_lowercase()
            .replace([' ', '-'], "_");
        cleaned.parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complaint" => Ok(Self::Complaint),
            "inquiry" => Ok(Self::Inquiry),
            "feedback" => Ok(Self::Feedback),
            "support_request" => Ok(Self::SupportRequest),
            "other" => Ok(Self::Other),
            _ => Err(TriageError::UnhandledCategory {
                label: s.to_string(),
            }),
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────

/// Outcome of running one email through the pipeline. Never mutated
/// after the processor returns it.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub email: Email,
    pub category: Option<Category>,
    pub response: Option<String>,
    /// Labels of the dispatch actions that completed.
    pub actions: Vec<String>,
    pub error: Option<String>,
    /// Wall-clock seconds spent on this email.
    pub processing_time: f64,
}

impl ProcessingResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// All results of one batch run, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: uuid::Uuid,
    pub results: Vec<ProcessingResult>,
    /// Ids of emails skipped for missing subject or body.
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut by_category = BTreeMap::new();
        for category in self.results.iter().filter_map(|r| r.category) {
            *by_category.entry(category).or_insert(0) += 1;
        }
        BatchSummary {
            processed: self.results.len(),
            failed: self.results.iter().filter(|r| !r.is_success()).count(),
            skipped: self.skipped.len(),
            by_category,
        }
    }
}

/// Counts for a finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub by_category: BTreeMap<Category, usize>,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} (failed {}), skipped {}",
            self.processed, self.failed, self.skipped
        )?;
        for (category, count) in &self.by_category {
            write!(f, "\n  {:<16} {}", category.label(), count)?;
        }
        Ok(())
    }
}
