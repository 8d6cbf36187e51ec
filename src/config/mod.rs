#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::config::toml_config::TomlConfig;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const WEBHOOK_ENV_VAR: &str = "BITRIX_SUPERMET_WEBHOOK_URL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

const LEAD_ADD_METHODS: [&str; 2] = ["/crm.lead.add.json", "/crm.lead.add"];
const CONTACT_ADD_METHOD: &str = "crm.contact.add.json";

/// Fixed lead fields sent with every phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDefaults {
    pub title_prefix: String,
    pub source_id: String,
    pub status_id: String,
    pub assigned_by_id: String,
}

impl Default for LeadDefaults {
    fn default() -> Self {
        Self {
            title_prefix: "LR_конк_ ".to_string(),
            source_id: "106".to_string(),
            status_id: "UC_LF7L5W".to_string(),
            assigned_by_id: "20140".to_string(),
        }
    }
}

/// Everything the submitter and batch runner need; built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionConfig {
    pub webhook_url: String,
    pub contact_webhook_url: Option<String>,
    pub timeout: Duration,
    pub request_delay: Duration,
    pub lead: LeadDefaults,
}

impl SubmissionConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            contact_webhook_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            lead: LeadDefaults::default(),
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 讀取 .env、環境變數與（可選的）TOML 檔案
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        ConfigSources::load(config_file)?.resolve()
    }

    /// Merges the environment value with an optional file; the file wins where it sets a value.
    pub fn resolve(env_webhook: Option<String>, file: Option<&TomlConfig>) -> Result<Self> {
        let webhook_url = file
            .and_then(|f| f.webhook_url().map(str::to_string))
            .or_else(|| env_webhook.filter(|url| !url.trim().is_empty()))
            .ok_or_else(|| ImportError::MissingConfigError {
                field: WEBHOOK_ENV_VAR.to_string(),
            })?;

        let mut config = Self::new(webhook_url.trim());

        if let Some(file) = file {
            config.contact_webhook_url = file.contact_webhook_url().map(str::to_string);
            if let Some(secs) = file.crm.timeout_seconds {
                config.timeout = Duration::from_secs(secs);
            }
            if let Some(ms) = file.batch.request_delay_ms {
                config.request_delay = Duration::from_millis(ms);
            }

            let lead = &file.lead;
            if let Some(prefix) = &lead.title_prefix {
                config.lead.title_prefix = prefix.clone();
            }
            if let Some(source_id) = &lead.source_id {
                config.lead.source_id = source_id.clone();
            }
            if let Some(status_id) = &lead.status_id {
                config.lead.status_id = status_id.clone();
            }
            if let Some(assigned_by_id) = &lead.assigned_by_id {
                config.lead.assigned_by_id = assigned_by_id.clone();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Webhook base: the lead URL without its trailing `crm.lead.add` method.
    pub fn webhook_base(&self) -> &str {
        let url = self.webhook_url.trim_end_matches('/');
        LEAD_ADD_METHODS
            .iter()
            .find_map(|method| url.strip_suffix(method))
            .unwrap_or(url)
    }

    pub fn contact_url(&self) -> String {
        match &self.contact_webhook_url {
            Some(url) => url.clone(),
            None => format!("{}/{}", self.webhook_base(), CONTACT_ADD_METHOD),
        }
    }
}

/// Raw configuration inputs, gathered before anything is validated.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub env_webhook: Option<String>,
    pub file: Option<TomlConfig>,
}

impl ConfigSources {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let env_webhook = std::env::var(WEBHOOK_ENV_VAR).ok();
        let file = match config_file {
            Some(path) => {
                tracing::debug!("Loading configuration file {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };

        Ok(Self { env_webhook, file })
    }

    pub fn resolve(&self) -> Result<SubmissionConfig> {
        SubmissionConfig::resolve(self.env_webhook.clone(), self.file.as_ref())
    }
}

impl Validate for SubmissionConfig {
    fn validate(&self) -> Result<()> {
        validate_url(WEBHOOK_ENV_VAR, &self.webhook_url)?;
        if let Some(url) = &self.contact_webhook_url {
            validate_url("crm.contact_webhook_url", url)?;
        }
        validate_range("crm.timeout_seconds", self.timeout.as_secs(), 1, 300)?;
        validate_non_empty_string("lead.source_id", &self.lead.source_id)?;
        validate_non_empty_string("lead.status_id", &self.lead.status_id)?;
        validate_non_empty_string("lead.assigned_by_id", &self.lead.assigned_by_id)?;
        Ok(())
    }
}
