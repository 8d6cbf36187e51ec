pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "cli")]
pub mod ui;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::bitrix::BitrixClient;
pub use adapters::spreadsheet::{read_leads, try_read_leads};
pub use config::{ConfigSources, SubmissionConfig};
pub use core::batch::BatchRunner;
pub use core::import::{import_leads, ImportOutcome};
pub use domain::model::{Lead, LeadReport, SubmissionOutcome, Summary};
pub use utils::error::{ImportError, Result};
