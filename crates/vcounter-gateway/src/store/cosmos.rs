//! Azure Cosmos DB (SQL API) over its REST interface.
//!
//! Only the three point operations the counter needs are implemented:
//! - read:   `GET  dbs/{db}/colls/{coll}/docs/{id}`
//! - create: `POST dbs/{db}/colls/{coll}/docs`
//! - upsert: `POST dbs/{db}/colls/{coll}/docs` + `x-ms-documentdb-is-upsert: True`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use vcounter_core::error::{CounterError, Result};
use vcounter_core::record::CounterRecord;
use vcounter_core::store::{DocumentStore, ReadOutcome};

use super::auth::{http_date, MasterKey};
use crate::config::StoreSection;

const API_VERSION: &str = "2018-12-31";

pub struct CosmosStore {
    http: reqwest::Client,
    endpoint: String,
    database: String,
    container: String,
    key: MasterKey,
}

/// Error body shape returned by the service (`{"code": "...", "message": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl CosmosStore {
    pub fn from_config(cfg: &StoreSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| CounterError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            database: cfg.database.clone(),
            container: cfg.container.clone(),
            key: MasterKey::from_base64(&cfg.key)?,
        })
    }

    fn collection_link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.container)
    }

    fn document_link(&self, id: &str) -> String {
        format!("{}/docs/{}", self.collection_link(), id)
    }

    /// Build a signed request. `resource_link` is what gets signed; `path` is what gets hit.
    fn signed(
        &self,
        method: Method,
        resource_link: &str,
        path: &str,
        partition_key: &str,
    ) -> Result<RequestBuilder> {
        let date = http_date(chrono::Utc::now());
        let token = self.key.token(method.as_str(), "docs", resource_link, &date);
        let pk = serde_json::to_string(&[partition_key])
            .map_err(|e| CounterError::Internal(format!("partition key encode failed: {e}")))?;

        Ok(self
            .http
            .request(method, format!("{}/{}", self.endpoint, path))
            .header("authorization", token)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-documentdb-partitionkey", pk)
            .header("accept", "application/json"))
    }

    async fn write(&self, record: &CounterRecord, upsert: bool) -> Result<()> {
        let link = self.collection_link();
        let path = format!("{link}/docs");
        let body = serde_json::to_vec(record)?;

        let mut req = self
            .signed(Method::POST, &link, &path, record.partition_key())?
            .header("content-type", "application/json")
            .body(body);
        if upsert {
            req = req.header("x-ms-documentdb-is-upsert", "True");
        }

        let resp = req.send().await.map_err(unavailable)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(failure(resp).await)
        }
    }

    async fn read_record(&self, id: &str, partition_key: &str) -> Result<Option<CounterRecord>> {
        let link = self.document_link(id);
        let resp = self
            .signed(Method::GET, &link, &link, partition_key)?
            .send()
            .await
            .map_err(unavailable)?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let bytes = resp.bytes().await.map_err(unavailable)?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            _ => Err(failure(resp).await),
        }
    }
}

fn unavailable(e: reqwest::Error) -> CounterError {
    CounterError::Unavailable(e.to_string())
}

async fn failure(resp: Response) -> CounterError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(b) if !b.message.is_empty() => format!("{}: {}", b.code, b.message),
        _ => text,
    };

    if status == StatusCode::CONFLICT.as_u16() {
        CounterError::Conflict(message)
    } else {
        CounterError::Rejected { status, message }
    }
}

#[async_trait]
impl DocumentStore for CosmosStore {
    fn name(&self) -> &'static str {
        "cosmos"
    }

    async fn read(&self, id: &str, partition_key: &str) -> ReadOutcome {
        self.read_record(id, partition_key).await.into()
    }

    async fn create(&self, record: &CounterRecord) -> Result<()> {
        self.write(record, false).await
    }

    async fn upsert(&self, record: &CounterRecord) -> Result<()> {
        self.write(record, true).await
    }
}
