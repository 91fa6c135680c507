//! In-process fakes for the two outbound seams, plus a request helper.

use std::sync::{Arc, Mutex};

use axum::{
    async_trait,
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::airtable::{Fields, Record, RecordStore};
use crate::config::{AirtableConfig, AppConfig, WebhookConfig};
use crate::error::UpstreamError;
use crate::state::AppState;
use crate::webhook::{ChatWebhook, OutboundMessage};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List { table: String, filter: Option<String> },
    Get { table: String, id: String },
    Create { table: String, fields: Fields },
    Update { table: String, id: String, fields: Fields },
    Delete { table: String, id: String },
}

#[derive(Default)]
pub struct FakeStore {
    pub calls: Mutex<Vec<StoreCall>>,
    pub records: Vec<Record>,
    pub failure: Option<UpstreamError>,
}

impl FakeStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self {
            failure: Some(err),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<(), UpstreamError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn list(&self, table: &str, filter: Option<&str>) -> Result<Vec<Record>, UpstreamError> {
        self.record(StoreCall::List {
            table: table.into(),
            filter: filter.map(str::to_string),
        })?;
        Ok(self.records.clone())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Record, UpstreamError> {
        self.record(StoreCall::Get { table: table.into(), id: id.into() })?;
        self.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::Status {
                status: 404,
                status_text: "Not Found".into(),
                body: serde_json::json!({"error": "NOT_FOUND"}),
            })
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, UpstreamError> {
        self.record(StoreCall::Create { table: table.into(), fields: fields.clone() })?;
        Ok(Record {
            id: "recNew".into(),
            fields,
            created_time: Some("2024-01-01T00:00:00.000Z".into()),
        })
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, UpstreamError> {
        self.record(StoreCall::Update {
            table: table.into(),
            id: id.into(),
            fields: fields.clone(),
        })?;
        Ok(Record { id: id.into(), fields, created_time: None })
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), UpstreamError> {
        self.record(StoreCall::Delete { table: table.into(), id: id.into() })
    }
}

pub struct FakeWebhook {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub reply: Result<Value, UpstreamError>,
}

impl FakeWebhook {
    pub fn replying(reply: Value) -> Self {
        Self { sent: Mutex::new(Vec::new()), reply: Ok(reply) }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self { sent: Mutex::new(Vec::new()), reply: Err(err) }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatWebhook for FakeWebhook {
    async fn send(&self, msg: &OutboundMessage) -> Result<Value, UpstreamError> {
        self.sent.lock().unwrap().push(msg.clone());
        self.reply.clone()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        airtable: AirtableConfig {
            api_url: "http://airtable.test/v0".into(),
            api_key: "test".into(),
            base_id: "appTest".into(),
            timeout_secs: 5,
        },
        webhook: WebhookConfig {
            url: "http://n8n.test/webhook".into(),
            timeout_secs: 5,
        },
    }
}

pub fn app(store: Arc<FakeStore>, webhook: Arc<FakeWebhook>) -> Router {
    let state = AppState::from_parts(Arc::new(test_config()), store, webhook);
    crate::app::build_app(state)
}

pub fn store_app(store: Arc<FakeStore>) -> Router {
    app(store, Arc::new(FakeWebhook::replying(Value::Null)))
}

/// Sends one request through the router and decodes the JSON response.
pub async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(json) => call_raw(app, method, uri, Some("application/json"), &json.to_string()).await,
        None => call_raw(app, method, uri, None, "").await,
    }
}

/// Like [`call`], with the body and content type sent exactly as given.
pub async fn call_raw(
    app: Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        req = req.header("content-type", ct);
    }
    let response = app
        .oneshot(req.body(Body::from(body.to_owned())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn record(id: &str, fields: Value) -> Record {
    serde_json::from_value(serde_json::json!({ "id": id, "fields": fields })).unwrap()
}
