use crate::utils::error::{ImportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional importer configuration file.
///
/// ```toml
/// [crm]
/// webhook_url = "${BITRIX_SUPERMET_WEBHOOK_URL}"
/// timeout_seconds = 10
///
/// [lead]
/// title_prefix = "LR_конк_ "
/// source_id = "106"
///
/// [batch]
/// request_delay_ms = 500
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub crm: CrmSection,
    #[serde(default)]
    pub lead: LeadSection,
    #[serde(default)]
    pub batch: BatchSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrmSection {
    pub webhook_url: Option<String>,
    pub contact_webhook_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadSection {
    pub title_prefix: Option<String>,
    pub source_id: Option<String>,
    pub status_id: Option<String>,
    pub assigned_by_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSection {
    pub request_delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, |name| std::env::var(name).ok());

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BITRIX_SUPERMET_WEBHOOK_URL})，未定義的保留原樣
    pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Webhook URL from the file, ignoring values whose `${VAR}` did not resolve.
    pub fn webhook_url(&self) -> Option<&str> {
        resolved(self.crm.webhook_url.as_deref())
    }

    pub fn contact_webhook_url(&self) -> Option<&str> {
        resolved(self.crm.contact_webhook_url.as_deref())
    }
}

fn resolved(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.contains("${"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[crm]
webhook_url = "https://example.bitrix24.ru/rest/1/token/crm.lead.add.json"
timeout_seconds = 5

[lead]
title_prefix = "Import "
source_id = "7"

[batch]
request_delay_ms = 0
"#,
        )
        .unwrap();

        assert_eq!(
            config.webhook_url(),
            Some("https://example.bitrix24.ru/rest/1/token/crm.lead.add.json")
        );
        assert_eq!(config.crm.timeout_seconds, Some(5));
        assert_eq!(config.lead.title_prefix.as_deref(), Some("Import "));
        assert_eq!(config.lead.status_id, None);
        assert_eq!(config.batch.request_delay_ms, Some(0));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.webhook_url().is_none());
        assert!(config.crm.timeout_seconds.is_none());
    }

    #[test]
    fn test_substitute_env_vars() {
        let content = r#"webhook_url = "${HOOK}/crm.lead.add.json"
other = "${UNSET_VAR}""#;
        let result = TomlConfig::substitute_env_vars(content, |name| {
            (name == "HOOK").then(|| "https://crm.local/rest/1/abc".to_string())
        });

        assert!(result.contains("https://crm.local/rest/1/abc/crm.lead.add.json"));
        assert!(result.contains("${UNSET_VAR}"));
    }

    #[test]
    fn test_unresolved_webhook_is_ignored() {
        let config = TomlConfig {
            crm: CrmSection {
                webhook_url: Some("${NOT_DEFINED_ANYWHERE}".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.webhook_url().is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[crm\nwebhook_url = 1").unwrap_err();
        assert!(matches!(err, ImportError::ConfigError { .. }));
    }
}
