use crate::airtable::{AirtableClient, RecordStore};
use crate::config::AppConfig;
use crate::webhook::{ChatWebhook, N8nWebhook};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub webhook: Arc<dyn ChatWebhook>,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(AirtableClient::new(&config.airtable)?) as Arc<dyn RecordStore>;
        let webhook = Arc::new(N8nWebhook::new(&config.webhook)?) as Arc<dyn ChatWebhook>;

        Ok(Self {
            config: Arc::new(config),
            store,
            webhook,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn RecordStore>,
        webhook: Arc<dyn ChatWebhook>,
    ) -> Self {
        Self {
            config,
            store,
            webhook,
        }
    }
}
