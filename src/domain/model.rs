use crate::utils::error::ImportError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub phone: String,
    pub comments: Option<String>,
}

impl Lead {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Result of a single create call against the CRM.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// CRM returned the id of the new record.
    Success { id: String },
    Failure(ImportError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    pub fn message(&self) -> Option<String> {
        match self {
            SubmissionOutcome::Success { .. } => None,
            SubmissionOutcome::Failure(e) => Some(e.to_string()),
        }
    }
}

impl From<crate::utils::error::Result<String>> for SubmissionOutcome {
    fn from(result: crate::utils::error::Result<String>) -> Self {
        match result {
            Ok(id) => SubmissionOutcome::Success { id },
            Err(e) => SubmissionOutcome::Failure(e),
        }
    }
}

/// Per-lead progress event handed to the batch observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadReport {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub phone: String,
    pub success: bool,
}

impl LeadReport {
    pub fn line(&self) -> String {
        let verb = if self.success { "created" } else { "failed" };
        format!("{} {}/{}: {}", verb, self.index, self.total, self.phone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub success_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Summary {
    pub fn failed_count(&self) -> usize {
        self.total - self.success_count
    }

    pub fn line(&self) -> String {
        format!(
            "Upload finished. Success: {}/{}",
            self.success_count, self.total
        )
    }
}
