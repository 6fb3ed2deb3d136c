//! One request struct per remote operation.
//!
//! POST bodies serialize directly; GET filters render through `query()`,
//! which omits unset filters.

use serde::Serialize;

/// Query-string filters for a list/get operation.
pub trait QueryParams {
    fn query(&self) -> Vec<(&'static str, String)>;
}

fn push_opt(params: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        params.push((key, v.clone()));
    }
}

fn push_lean(params: &mut Vec<(&'static str, String)>, lean: bool) {
    if lean {
        params.push(("lean", "true".to_string()));
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddSiteRequest {
    pub site_url: String,
    pub page_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetSitesRequest {
    pub site_id: Option<String>,
}

impl GetSitesRequest {
    pub fn by_id(site_id: impl Into<String>) -> Self {
        Self {
            site_id: Some(site_id.into()),
        }
    }
}

impl QueryParams for GetSitesRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "site_id", &self.site_id);
        params
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddPageRequest {
    pub site_id: String,
    pub page_url: Option<String>,
    pub page_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetPagesRequest {
    pub site_id: Option<String>,
    pub page_id: Option<String>,
    pub lean: bool,
}

impl GetPagesRequest {
    pub fn for_site(site_id: impl Into<String>) -> Self {
        Self {
            site_id: Some(site_id.into()),
            page_id: None,
            lean: true,
        }
    }
}

impl Default for GetPagesRequest {
    fn default() -> Self {
        Self {
            site_id: None,
            page_id: None,
            lean: true,
        }
    }
}

impl QueryParams for GetPagesRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "site_id", &self.site_id);
        push_opt(&mut params, "page_id", &self.page_id);
        push_lean(&mut params, self.lean);
        params
    }
}

/// Scan every page of a site, or a single page.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ScanRequest {
    Site { site_id: String },
    Page { page_id: String },
}

impl ScanRequest {
    pub fn site(site_id: impl Into<String>) -> Self {
        ScanRequest::Site {
            site_id: site_id.into(),
        }
    }

    pub fn page(page_id: impl Into<String>) -> Self {
        ScanRequest::Page {
            page_id: page_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetScansRequest {
    pub scan_id: Option<String>,
    pub page_id: Option<String>,
    pub lean: bool,
}

impl GetScansRequest {
    pub fn by_id(scan_id: impl Into<String>) -> Self {
        Self {
            scan_id: Some(scan_id.into()),
            page_id: None,
            lean: true,
        }
    }
}

impl Default for GetScansRequest {
    fn default() -> Self {
        Self {
            scan_id: None,
            page_id: None,
            lean: true,
        }
    }
}

impl QueryParams for GetScansRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "scan_id", &self.scan_id);
        push_opt(&mut params, "page_id", &self.page_id);
        push_lean(&mut params, self.lean);
        params
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TestPageRequest {
    pub page_id: String,
    pub pre_scan: String,
    pub post_scan: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetTestsRequest {
    pub test_id: Option<String>,
    pub page_id: Option<String>,
    pub lean: bool,
}

impl GetTestsRequest {
    pub fn by_id(test_id: impl Into<String>) -> Self {
        Self {
            test_id: Some(test_id.into()),
            page_id: None,
            lean: true,
        }
    }
}

impl Default for GetTestsRequest {
    fn default() -> Self {
        Self {
            test_id: None,
            page_id: None,
            lean: true,
        }
    }
}

impl QueryParams for GetTestsRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "test_id", &self.test_id);
        push_opt(&mut params, "page_id", &self.page_id);
        push_lean(&mut params, self.lean);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetCasesRequest {
    pub case_id: Option<String>,
    pub site_id: Option<String>,
}

impl QueryParams for GetCasesRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "case_id", &self.case_id);
        push_opt(&mut params, "site_id", &self.site_id);
        params
    }
}

/// A 0-based step override sent with a testcase run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepUpdate {
    pub index: usize,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TestcaseRequest {
    pub site_id: String,
    pub case_id: String,
    pub updates: Vec<StepUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetTestcasesRequest {
    pub testcase_id: Option<String>,
    pub site_id: Option<String>,
    pub lean: bool,
}

impl GetTestcasesRequest {
    pub fn by_id(testcase_id: impl Into<String>) -> Self {
        Self {
            testcase_id: Some(testcase_id.into()),
            site_id: None,
            lean: true,
        }
    }
}

impl Default for GetTestcasesRequest {
    fn default() -> Self {
        Self {
            testcase_id: None,
            site_id: None,
            lean: true,
        }
    }
}

impl QueryParams for GetTestcasesRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "testcase_id", &self.testcase_id);
        push_opt(&mut params, "site_id", &self.site_id);
        push_lean(&mut params, self.lean);
        params
    }
}
