use crate::adapters::bitrix::BitrixClient;
use crate::adapters::spreadsheet::read_leads;
use crate::config::ConfigSources;
use crate::core::batch::BatchRunner;
use crate::domain::model::{Lead, LeadReport, Summary};
use crate::utils::error::Result;
use std::path::Path;

/// How an import run ended when nothing went wrong with the configuration.
#[derive(Debug)]
pub enum ImportOutcome {
    NoLeads,
    Cancelled,
    Finished(Summary),
}

/// The whole importer flow behind the operator prompts.
///
/// Order matters: the webhook is checked first, so a missing configuration sends no
/// request and never reaches the confirmation. `confirm` sees the leads that would be
/// uploaded and `on_lead` is called once per submitted lead.
pub async fn import_leads<C, F>(
    sources: &ConfigSources,
    path: &Path,
    confirm: C,
    on_lead: F,
) -> Result<ImportOutcome>
where
    C: FnOnce(&[Lead]) -> Result<bool>,
    F: FnMut(&LeadReport),
{
    let config = sources.resolve().map_err(|e| {
        tracing::error!("❌ Configuration validation failed: {}", e);
        e
    })?;

    let leads = read_leads(path);
    if leads.is_empty() {
        tracing::info!("No leads in {}", path.display());
        return Ok(ImportOutcome::NoLeads);
    }

    if !confirm(&leads)? {
        tracing::info!("Upload of {} leads declined", leads.len());
        return Ok(ImportOutcome::Cancelled);
    }

    let request_delay = config.request_delay;
    let client = BitrixClient::new(config)?;
    let runner = BatchRunner::new(client, request_delay);

    let summary = runner.run(&leads, on_lead).await;
    Ok(ImportOutcome::Finished(summary))
}
