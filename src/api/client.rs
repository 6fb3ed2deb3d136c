use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::requests::*;
use super::{Envelope, Reachability, ScanerrApi};
use crate::config::{ClientConfig, PROBE_REQUEST_TIMEOUT_SECS};
use crate::error::{Result, ScanerrError};

/// reqwest-backed client for the Scanerr API.
///
/// Holds only the immutable `ClientConfig` and a connection pool; nothing is
/// cached between calls.
#[derive(Clone)]
pub struct RemoteClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Same connection pool, different credential.
    pub fn with_api_key(&self, api_key: &str) -> Result<Self> {
        Ok(Self {
            config: self.config.with_api_key(api_key)?,
            http: self.http.clone(),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.config.auth_header())
            .header(CONTENT_TYPE, "application/json")
    }

    fn url_with_query(&self, path: &str, params: &[(&'static str, String)]) -> Result<String> {
        let mut url = Url::parse(&self.config.endpoint(path))
            .map_err(|e| ScanerrError::Config(format!("invalid endpoint for {}: {}", path, e)))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<Envelope> {
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        let envelope = Envelope::from_body(status, &body);
        debug!("{} -> {} (succeeded={})", operation, status, envelope.succeeded);
        Ok(envelope)
    }

    async fn get(&self, operation: &'static str, path: &str, query: &impl QueryParams) -> Result<Envelope> {
        let url = self.url_with_query(path, &query.query())?;
        self.send(operation, self.request(Method::GET, &url)).await
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        operation: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope> {
        let url = self.config.endpoint(path);
        let mut builder = self.request(Method::POST, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(operation, builder).await
    }

    async fn delete(&self, operation: &'static str, path: &str) -> Result<Envelope> {
        let url = self.config.endpoint(path);
        self.send(operation, self.request(Method::DELETE, &url)).await
    }
}

#[async_trait]
impl ScanerrApi for RemoteClient {
    async fn add_site(&self, request: &AddSiteRequest) -> Result<Envelope> {
        self.post("add_site", "site/delay", Some(request)).await
    }

    async fn crawl_site(&self, site_id: &str) -> Result<Envelope> {
        self.post::<()>("crawl_site", &format!("site/{}/crawl", site_id), None)
            .await
    }

    async fn get_sites(&self, request: &GetSitesRequest) -> Result<Envelope> {
        self.get("get_sites", "site", request).await
    }

    async fn delete_site(&self, site_id: &str) -> Result<Envelope> {
        self.delete("delete_site", &format!("site/{}", site_id)).await
    }

    async fn add_page(&self, request: &AddPageRequest) -> Result<Envelope> {
        self.post("add_page", "page/delay", Some(request)).await
    }

    async fn get_pages(&self, request: &GetPagesRequest) -> Result<Envelope> {
        self.get("get_pages", "page", request).await
    }

    async fn delete_page(&self, page_id: &str) -> Result<Envelope> {
        self.delete("delete_page", &format!("page/{}", page_id)).await
    }

    async fn scan(&self, request: &ScanRequest) -> Result<Envelope> {
        self.post("scan", "scan/delay", Some(request)).await
    }

    async fn get_scans(&self, request: &GetScansRequest) -> Result<Envelope> {
        self.get("get_scans", "scan", request).await
    }

    async fn test_page(&self, request: &TestPageRequest) -> Result<Envelope> {
        self.post("test_page", "test/delay", Some(request)).await
    }

    async fn get_tests(&self, request: &GetTestsRequest) -> Result<Envelope> {
        self.get("get_tests", "test", request).await
    }

    async fn get_cases(&self, request: &GetCasesRequest) -> Result<Envelope> {
        self.get("get_cases", "case", request).await
    }

    async fn delete_case(&self, case_id: &str) -> Result<Envelope> {
        self.delete("delete_case", &format!("case/{}", case_id)).await
    }

    async fn testcase_site(&self, request: &TestcaseRequest) -> Result<Envelope> {
        self.post("testcase_site", "testcase/delay", Some(request))
            .await
    }

    async fn get_testcases(&self, request: &GetTestcasesRequest) -> Result<Envelope> {
        self.get("get_testcases", "testcase", request).await
    }

    async fn delete_testcase(&self, testcase_id: &str) -> Result<Envelope> {
        self.delete("delete_testcase", &format!("testcase/{}", testcase_id))
            .await
    }
}

#[async_trait]
impl Reachability for RemoteClient {
    async fn status_of(&self, url: &str) -> Option<u16> {
        // Plain GET against the monitored site, no API credentials attached.
        match self
            .http
            .get(url)
            .timeout(Duration::from_secs(PROBE_REQUEST_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => Some(resp.status().as_u16()),
            Err(e) => {
                debug!("Reachability check of {} failed: {}", url, e);
                None
            }
        }
    }
}
