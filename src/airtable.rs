use anyhow::Context;
use axum::async_trait;
use reqwest::{Client, Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::AirtableConfig;
use crate::error::{read_body, UpstreamError};

pub const RECIPES_TABLE: &str = "Recettes";
pub const PLANNING_TABLE: &str = "Plannings Hebdomadaires";
pub const SHOPPING_TABLE: &str = "Liste de Courses";

pub type Fields = Map<String, Value>;

/// One row of a backing-store table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<Record>,
}

/// Whether a field value counts as set. Missing, null, false, "" and 0 do not.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String values as-is, anything else as JSON.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Record {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| is_set(v))
    }

    /// Text value of `key`, or `default` when unset. Non-string values are
    /// rendered as JSON.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.field(key)
            .map(as_text)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn value_or(&self, key: &str, default: Value) -> Value {
        self.field(key).cloned().unwrap_or(default)
    }

    /// `{id, ...fields}`, the shape returned after writes.
    pub fn flatten(self) -> Value {
        let mut out = Map::with_capacity(self.fields.len() + 1);
        out.insert("id".into(), Value::String(self.id));
        out.extend(self.fields);
        Value::Object(out)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Single unpaged listing, optionally narrowed by a filter formula.
    async fn list(&self, table: &str, filter: Option<&str>) -> Result<Vec<Record>, UpstreamError>;
    async fn get(&self, table: &str, id: &str) -> Result<Record, UpstreamError>;
    async fn create(&self, table: &str, fields: Fields) -> Result<Record, UpstreamError>;
    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, UpstreamError>;
    async fn delete(&self, table: &str, id: &str) -> Result<(), UpstreamError>;
}

#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_url: Url,
    api_key: String,
    base_id: String,
    timeout_secs: u64,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> anyhow::Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .with_context(|| format!("parse airtable url {}", config.api_url))?;
        anyhow::ensure!(
            !api_url.cannot_be_a_base(),
            "airtable url {} cannot carry a path",
            config.api_url
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("build airtable http client")?;

        Ok(Self {
            client,
            api_url,
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// `<api>/<base>/<table>[/<id>]` with every segment percent-encoded.
    fn table_url(&self, table: &str, id: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::Request(format!("bad base url {}", self.api_url)))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn call(
        &self,
        method: Method,
        url: Url,
        query: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Result<Value, UpstreamError> {
        debug!(%method, %url, "airtable request");
        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.api_key);
        if let Some(q) = query {
            req = req.query(&[q]);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;
        read_body(resp, self.timeout_secs).await
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(body).map_err(|e| UpstreamError::InvalidPayload(e.to_string()))
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list(&self, table: &str, filter: Option<&str>) -> Result<Vec<Record>, UpstreamError> {
        let url = self.table_url(table, None)?;
        let query = filter.map(|f| ("filterByFormula", f));
        let page: RecordPage = decode(self.call(Method::GET, url, query, None).await?)?;
        Ok(page.records)
    }

    async fn get(&self, table: &str, id: &str) -> Result<Record, UpstreamError> {
        let url = self.table_url(table, Some(id))?;
        decode(self.call(Method::GET, url, None, None).await?)
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, UpstreamError> {
        let url = self.table_url(table, None)?;
        let body = json!({ "fields": fields });
        decode(self.call(Method::POST, url, None, Some(body)).await?)
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, UpstreamError> {
        let url = self.table_url(table, Some(id))?;
        let body = json!({ "fields": fields });
        decode(self.call(Method::PATCH, url, None, Some(body)).await?)
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), UpstreamError> {
        let url = self.table_url(table, Some(id))?;
        self.call(Method::DELETE, url, None, None).await?;
        Ok(())
    }
}
