pub mod batch;
pub mod import;

pub use crate::domain::model::{Lead, LeadReport, SubmissionOutcome, Summary};
pub use crate::domain::ports::LeadSubmitter;
pub use crate::utils::error::Result;
