use crate::domain::model::{Lead, LeadReport, SubmissionOutcome, Summary};
use crate::domain::ports::LeadSubmitter;
use chrono::Utc;
use std::time::Duration;

/// Submits leads one at a time, in order, with a fixed pause after each request.
///
/// No retries and no concurrency: the pause is what keeps us under the CRM rate limit.
pub struct BatchRunner<S: LeadSubmitter> {
    submitter: S,
    request_delay: Duration,
}

impl<S: LeadSubmitter> BatchRunner<S> {
    pub fn new(submitter: S, request_delay: Duration) -> Self {
        Self {
            submitter,
            request_delay,
        }
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub async fn run<F>(&self, leads: &[Lead], mut on_lead: F) -> Summary
    where
        F: FnMut(&LeadReport),
    {
        let total = leads.len();
        let started_at = Utc::now();
        let mut success_count = 0;

        tracing::info!("Starting upload of {} leads", total);

        for (index, lead) in leads.iter().enumerate() {
            let index = index + 1;
            let outcome = self.submitter.submit(lead).await;

            let success = match &outcome {
                SubmissionOutcome::Success { id } => {
                    success_count += 1;
                    tracing::info!("Lead {}/{} created: {} (ID {})", index, total, lead.phone, id);
                    true
                }
                SubmissionOutcome::Failure(e) => {
                    tracing::warn!("Lead {}/{} failed: {}: {}", index, total, lead.phone, e);
                    false
                }
            };

            on_lead(&LeadReport {
                index,
                total,
                phone: lead.phone.clone(),
                success,
            });

            // 固定間隔，避免觸發 Bitrix24 的速率限制
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let summary = Summary {
            total,
            success_count,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!("{}", summary.line());

        summary
    }
}
