use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use super::Signup;
use crate::config::MailchimpSettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("missing Mailchimp configuration: {}", missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },
    #[error("failed to reach Mailchimp: {0}")]
    Transport(#[from] reqwest::Error),
}

/// How the provider answered a subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
    /// Provider-side failure (5xx).
    Unavailable,
    /// Any other refusal, with the provider's explanation when it gave one.
    Rejected(Option<String>),
}

pub struct MailchimpClient {
    http: reqwest::Client,
    settings: MailchimpSettings,
}

impl MailchimpClient {
    pub fn new(settings: MailchimpSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, settings })
    }

    /// Add the address to the audience as `pending` (double opt-in).
    pub async fn subscribe(&self, signup: &Signup) -> Result<SubscribeOutcome, NewsletterError> {
        let (url, api_key) = self.members_endpoint()?;

        let merge_fields = match &signup.first_name {
            Some(name) if !name.is_empty() => json!({ "FNAME": name }),
            _ => json!({}),
        };
        let payload = json!({
            "email_address": signup.email,
            "status": "pending",
            "merge_fields": merge_fields,
        });

        let response = self
            .http
            .post(&url)
            .basic_auth("anystring", Some(api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            info!("Newsletter signup accepted");
            return Ok(SubscribeOutcome::Subscribed);
        }
        if status.as_u16() == 400 && body.get("title").and_then(Value::as_str) == Some("Member Exists") {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }
        if status.is_server_error() {
            error!(%status, body = %body, "Mailchimp server error");
            return Ok(SubscribeOutcome::Unavailable);
        }

        warn!(%status, body = %body, "Mailchimp API error");
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(SubscribeOutcome::Rejected(detail))
    }

    fn members_endpoint(&self) -> Result<(String, &str), NewsletterError> {
        let s = &self.settings;
        let present = |v: &Option<String>| v.as_deref().filter(|v| !v.is_empty()).is_some();

        let mut missing = Vec::new();
        if !present(&s.api_key) {
            missing.push("MAILCHIMP_API_KEY");
        }
        if !present(&s.server_prefix) && !present(&s.base_url) {
            missing.push("MAILCHIMP_SERVER_PREFIX");
        }
        if !present(&s.audience_id) {
            missing.push("MAILCHIMP_AUDIENCE_ID");
        }
        if !missing.is_empty() {
            return Err(NewsletterError::NotConfigured { missing });
        }

        let base = match (&s.base_url, &s.server_prefix) {
            (Some(base), _) if !base.is_empty() => base.trim_end_matches('/').to_string(),
            (_, Some(prefix)) => format!("https://{}.api.mailchimp.com", prefix),
            _ => return Err(NewsletterError::NotConfigured { missing }),
        };
        let audience = s.audience_id.as_deref().unwrap_or_default();
        let api_key = s.api_key.as_deref().unwrap_or_default();
        Ok((format!("{}/3.0/lists/{}/members", base, audience), api_key))
    }
}
