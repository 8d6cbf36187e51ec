use crate::domain::model::{Lead, SubmissionOutcome};
use async_trait::async_trait;

/// Destination for leads. The batch runner only talks to the CRM through this.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, lead: &Lead) -> SubmissionOutcome;
}
