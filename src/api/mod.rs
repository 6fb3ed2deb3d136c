pub mod client;
pub mod requests;
pub mod types;

pub use client::RemoteClient;
pub use requests::*;
pub use types::*;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ScanerrError};

/// Uniform wrapper around every remote response.
///
/// `succeeded` follows the status class only; the payload is kept as-is so
/// remote error details survive a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub succeeded: bool,
    pub status: u16,
    pub payload: Value,
}

impl Envelope {
    pub fn new(status: u16, payload: Value) -> Self {
        Envelope {
            succeeded: status.to_string().starts_with('2'),
            status,
            payload,
        }
    }

    /// Build from a raw response body. Non-JSON bodies are kept as strings.
    pub fn from_body(status: u16, body: &str) -> Self {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        Self::new(status, payload)
    }

    /// The payload, or a `Remote` error carrying it when the call failed.
    pub fn require(self, operation: &'static str) -> Result<Value> {
        if self.succeeded {
            Ok(self.payload)
        } else {
            Err(ScanerrError::Remote {
                operation,
                status: self.status,
                payload: self.payload,
            })
        }
    }

    pub fn decode<T: DeserializeOwned>(self, operation: &'static str) -> Result<T> {
        let payload = self.require(operation)?;
        serde_json::from_value(payload).map_err(|e| ScanerrError::decode(operation, e.to_string()))
    }
}

/// Typed operations against the Scanerr REST API.
#[async_trait]
pub trait ScanerrApi: Send + Sync {
    async fn add_site(&self, request: &AddSiteRequest) -> Result<Envelope>;
    async fn crawl_site(&self, site_id: &str) -> Result<Envelope>;
    async fn get_sites(&self, request: &GetSitesRequest) -> Result<Envelope>;
    async fn delete_site(&self, site_id: &str) -> Result<Envelope>;

    async fn add_page(&self, request: &AddPageRequest) -> Result<Envelope>;
    async fn get_pages(&self, request: &GetPagesRequest) -> Result<Envelope>;
    async fn delete_page(&self, page_id: &str) -> Result<Envelope>;

    async fn scan(&self, request: &ScanRequest) -> Result<Envelope>;
    async fn get_scans(&self, request: &GetScansRequest) -> Result<Envelope>;

    async fn test_page(&self, request: &TestPageRequest) -> Result<Envelope>;
    async fn get_tests(&self, request: &GetTestsRequest) -> Result<Envelope>;

    async fn get_cases(&self, request: &GetCasesRequest) -> Result<Envelope>;
    async fn delete_case(&self, case_id: &str) -> Result<Envelope>;

    async fn testcase_site(&self, request: &TestcaseRequest) -> Result<Envelope>;
    async fn get_testcases(&self, request: &GetTestcasesRequest) -> Result<Envelope>;
    async fn delete_testcase(&self, testcase_id: &str) -> Result<Envelope>;
}

/// Plain liveness check of an arbitrary URL.
#[async_trait]
pub trait Reachability: Send + Sync {
    /// Status code of an unauthenticated GET, or `None` if nothing answered.
    async fn status_of(&self, url: &str) -> Option<u16>;
}
