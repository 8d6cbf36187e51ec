use crate::config::{LeadDefaults, SubmissionConfig};
use crate::domain::model::{Lead, SubmissionOutcome};
use crate::domain::ports::LeadSubmitter;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PhoneField {
    pub value: String,
    pub value_type: String,
}

impl PhoneField {
    pub fn work(phone: &str) -> Self {
        Self {
            value: phone.to_string(),
            value_type: "WORK".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeadFields {
    pub title: String,
    pub phone: Vec<PhoneField>,
    pub source_id: String,
    pub status_id: String,
    pub assigned_by_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ContactFields {
    pub name: String,
    pub phone: Vec<PhoneField>,
    pub opened: String,
}

/// Body of every `crm.*.add` call: `{"fields": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePayload<F> {
    pub fields: F,
}

pub fn lead_payload(lead: &Lead, defaults: &LeadDefaults) -> CreatePayload<LeadFields> {
    CreatePayload {
        fields: LeadFields {
            title: format!("{}{}", defaults.title_prefix, lead.phone),
            phone: vec![PhoneField::work(&lead.phone)],
            source_id: defaults.source_id.clone(),
            status_id: defaults.status_id.clone(),
            assigned_by_id: defaults.assigned_by_id.clone(),
            comments: lead.comments.clone(),
        },
    }
}

pub fn contact_payload(phone: &str) -> CreatePayload<ContactFields> {
    CreatePayload {
        fields: ContactFields {
            name: phone.to_string(),
            phone: vec![PhoneField::work(phone)],
            opened: "Y".to_string(),
        },
    }
}

/// Maps an HTTP status and raw body to the id of the created record.
///
/// 2xx without a truthy `result` is reported as [`ImportError::MissingResultId`],
/// separately from non-2xx statuses ([`ImportError::ApiStatus`]).
pub fn classify_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(ImportError::ApiStatus {
            status,
            body: body.to_string(),
        });
    }

    let json: Value = serde_json::from_str(body).map_err(|e| ImportError::InvalidResponse {
        message: format!("{} (body: {})", e, body),
    })?;

    match json.get("result") {
        Some(result) if is_truthy(result) => Ok(result_id(result)),
        _ => Err(ImportError::MissingResultId {
            body: body.to_string(),
        }),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn result_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Bitrix24 REST client working through an incoming webhook.
#[derive(Debug, Clone)]
pub struct BitrixClient {
    client: Client,
    config: SubmissionConfig,
}

impl BitrixClient {
    pub fn new(config: SubmissionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    pub async fn create_lead(&self, lead: &Lead) -> Result<String> {
        let payload = lead_payload(lead, &self.config.lead);
        self.post_create("lead", &self.config.webhook_url, &payload)
            .await
    }

    /// Same request/response contract as [`Self::create_lead`], against `crm.contact.add`.
    pub async fn create_contact(&self, phone: &str) -> Result<String> {
        let payload = contact_payload(phone);
        let url = self.config.contact_url();
        self.post_create("contact", &url, &payload).await
    }

    async fn post_create<F: Serialize>(
        &self,
        entity: &str,
        url: &str,
        payload: &CreatePayload<F>,
    ) -> Result<String> {
        let result = self.send(entity, url, payload).await;

        match &result {
            Ok(id) => tracing::info!("✅ Created {} in Bitrix24, ID: {}", entity, id),
            Err(e) => tracing::error!(
                "❌ Failed to create {} (Category: {:?}): {}",
                entity,
                e.category(),
                e
            ),
        }

        result
    }

    async fn send<F: Serialize>(
        &self,
        entity: &str,
        url: &str,
        payload: &CreatePayload<F>,
    ) -> Result<String> {
        let body = serde_json::to_string(payload)?;
        tracing::info!("Sending {} create request to Bitrix24", entity);
        tracing::info!("Payload: {}", body);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::info!("Response: {} - {}", status, text);

        classify_response(status, &text)
    }
}

#[async_trait]
impl LeadSubmitter for BitrixClient {
    async fn submit(&self, lead: &Lead) -> SubmissionOutcome {
        self.create_lead(lead).await.into()
    }
}
