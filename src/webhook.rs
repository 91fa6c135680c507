use anyhow::Context;
use axum::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::WebhookConfig;
use crate::error::{read_body, UpstreamError};

/// Payload posted to the chat workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub message: String,
    pub user_id: String,
    pub timestamp: String,
}

#[async_trait]
pub trait ChatWebhook: Send + Sync {
    /// Posts the message and returns the raw reply payload.
    async fn send(&self, msg: &OutboundMessage) -> Result<Value, UpstreamError>;
}

#[derive(Clone)]
pub struct N8nWebhook {
    client: Client,
    url: String,
    timeout_secs: u64,
}

impl N8nWebhook {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("build webhook http client")?;
        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl ChatWebhook for N8nWebhook {
    async fn send(&self, msg: &OutboundMessage) -> Result<Value, UpstreamError> {
        debug!(url = %self.url, user_id = %msg.user_id, "posting to webhook");
        let resp = self
            .client
            .post(&self.url)
            .json(msg)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;
        read_body(resp, self.timeout_secs).await
    }
}
