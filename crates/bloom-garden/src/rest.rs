#![forbid(unsafe_code)]

//! PostgREST-backed flower store.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::flower::Flower;
use crate::store::FlowerStore;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Talks to `{url}/rest/v1/{table}` with the anonymous key.
#[derive(Debug)]
pub struct RestStore {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.table_endpoint(),
            anon_key: config.anon_key.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

impl FlowerStore for RestStore {
    fn load_all(&mut self) -> Result<Vec<Flower>, StoreError> {
        let url = format!("{}?select=*&order=date.asc", self.endpoint);
        let response = self
            .authorize(self.client.get(&url))
            .header("Accept", "application/json")
            .send()?;
        let body = check_status(response)?;
        let flowers: Vec<Flower> = serde_json::from_str(&body)?;
        tracing::debug!(count = flowers.len(), "loaded flowers from store");
        Ok(flowers)
    }

    fn insert(&mut self, flower: &Flower) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.post(&self.endpoint))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(&[flower])
            .send()?;
        check_status(response)?;
        tracing::debug!(id = %flower.id, "inserted flower");
        Ok(())
    }
}

/// Read the body, turning a non-2xx answer into [`StoreError::Rejected`].
fn check_status(response: Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text()?;
    if status.is_success() {
        return Ok(body);
    }
    Err(StoreError::rejected(status.as_u16(), rejection_message(status, &body)))
}

/// PostgREST reports failures as `{"message": ..., "code": ..., ...}`.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status.to_string(),
        None => body.trim().to_string(),
    }
}
