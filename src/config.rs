use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Runtime settings: defaults overridden by `REFEREE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Export document read by `extract` when no path is given.
    pub export_path: PathBuf,
    /// Directory `extract` writes `content.json` into.
    pub output_dir: PathBuf,
    pub content_path: PathBuf,
    pub content_fallback_path: PathBuf,
    pub bind: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("export_path", "data/export.xml")?
            .set_default("output_dir", "content")?
            .set_default("content_path", "referee-next/content/content.json")?
            .set_default("content_fallback_path", "content/content.json")?
            .set_default("bind", "127.0.0.1:3000")?
            .add_source(Environment::with_prefix("REFEREE"))
            .build()?
            .try_deserialize()
            .context("Invalid REFEREE_* configuration")
    }
}

/// Credentials for the email-marketing provider, read from `MAILCHIMP_*`.
///
/// Every field is optional here; a missing value is reported per request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MailchimpSettings {
    pub api_key: Option<String>,
    pub server_prefix: Option<String>,
    pub audience_id: Option<String>,
    /// Overrides `https://{server_prefix}.api.mailchimp.com`.
    pub base_url: Option<String>,
}

impl MailchimpSettings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("MAILCHIMP"))
            .build()?
            .try_deserialize()
            .context("Invalid MAILCHIMP_* configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_content_json() {
        // Only the REFEREE_* prefix is read; nothing in the test env sets it.
        let s = Settings::load().unwrap();
        assert!(s.content_fallback_path.ends_with("content/content.json"));
        assert_eq!(s.output_dir, PathBuf::from("content"));
    }
}
