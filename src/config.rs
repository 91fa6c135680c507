use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_WEBHOOK_URL: &str = "https://n8n.srv1081620.hstgr.cloud/webhook-test/chat-web";
pub const DEFAULT_AIRTABLE_URL: &str = "https://api.airtable.com/v0";

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
    pub api_url: String,
    pub api_key: String,
    pub base_id: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub airtable: AirtableConfig,
    pub webhook: WebhookConfig,
}

impl AirtableConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .map(|v| v.parse::<u16>().context("parse APP_PORT/PORT"))
            .transpose()?
            .unwrap_or(3000);

        let airtable = AirtableConfig {
            api_url: std::env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| DEFAULT_AIRTABLE_URL.into()),
            api_key: std::env::var("AIRTABLE_API_KEY").context("AIRTABLE_API_KEY is not set")?,
            base_id: std::env::var("AIRTABLE_BASE_ID").context("AIRTABLE_BASE_ID is not set")?,
            timeout_secs: secs_from_env("AIRTABLE_TIMEOUT_SECS", 30),
        };
        let webhook = WebhookConfig {
            url: std::env::var("N8N_WEBHOOK_URL").unwrap_or_else(|_| DEFAULT_WEBHOOK_URL.into()),
            timeout_secs: secs_from_env("N8N_TIMEOUT_SECS", 30),
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            airtable,
            webhook,
        })
    }
}

fn secs_from_env(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
