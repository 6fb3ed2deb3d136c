//! In-memory stand-in for the Scanerr API.
//!
//! Jobs complete after a configurable number of status fetches, so the
//! pollers can be driven deterministically with millisecond intervals.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use scanerr::api::*;
use scanerr::config::{PollSettings, ProbeSettings};
use scanerr::error::Result;

// Timezone-less, the way the service renders timestamps.
pub const COMPLETED_AT: &str = "2024-05-01T12:00:00.000000";

pub fn fast_poll(max_wait_ms: u64) -> PollSettings {
    PollSettings {
        poll_interval: Duration::from_millis(1),
        max_wait: Duration::from_millis(max_wait_ms),
    }
}

pub fn fast_probe() -> ProbeSettings {
    ProbeSettings {
        interval: Duration::from_millis(1),
        max_wait: Duration::from_millis(5),
    }
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub id: String,
    pub url: String,
    pub latest_scan: Option<String>,
}

#[derive(Debug, Clone)]
struct FakeTest {
    polls_left: u32,
    score: f64,
}

#[derive(Debug, Clone)]
struct FakeTestcase {
    polls_left: u32,
    steps: Vec<Option<bool>>,
}

#[derive(Default)]
struct FakeState {
    sites: HashMap<String, String>,
    pages: Vec<FakePage>,
    scans: HashMap<String, u32>,
    tests: HashMap<String, FakeTest>,
    testcases: HashMap<String, FakeTestcase>,
    next_id: u32,

    // knobs
    new_scan_polls: u32,
    test_polls: HashMap<String, u32>,
    default_test_polls: u32,
    scores: HashMap<String, f64>,
    reachability: VecDeque<Option<u16>>,
    default_reachability: Option<u16>,
    testcase_create_status: u16,
    testcase_polls: u32,
    testcase_steps: Vec<Option<bool>>,

    // recordings
    calls: Vec<String>,
    test_requests: Vec<TestPageRequest>,
    testcase_requests: Vec<TestcaseRequest>,
    probed_urls: Vec<String>,
}

pub struct FakeScanerr {
    state: Mutex<FakeState>,
}

impl FakeScanerr {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                default_reachability: Some(200),
                testcase_create_status: 201,
                ..FakeState::default()
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn add_site(&self, id: &str, url: &str) -> &Self {
        self.with(|s| s.sites.insert(id.to_string(), url.to_string()));
        self
    }

    /// A page whose latest scan completes after `polls` status checks.
    pub fn add_page(&self, id: &str, url: &str, latest_scan: Option<(&str, u32)>) -> &Self {
        self.with(|s| {
            if let Some((scan_id, polls)) = latest_scan {
                s.scans.insert(scan_id.to_string(), polls);
            }
            s.pages.push(FakePage {
                id: id.to_string(),
                url: url.to_string(),
                latest_scan: latest_scan.map(|(scan_id, _)| scan_id.to_string()),
            });
        });
        self
    }

    pub fn add_scan(&self, scan_id: &str, polls: u32) -> &Self {
        self.with(|s| s.scans.insert(scan_id.to_string(), polls));
        self
    }

    pub fn set_new_scan_polls(&self, polls: u32) -> &Self {
        self.with(|s| s.new_scan_polls = polls);
        self
    }

    pub fn set_score(&self, page_id: &str, score: f64) -> &Self {
        self.with(|s| s.scores.insert(page_id.to_string(), score));
        self
    }

    pub fn set_test_polls(&self, page_id: &str, polls: u32) -> &Self {
        self.with(|s| s.test_polls.insert(page_id.to_string(), polls));
        self
    }

    pub fn set_default_test_polls(&self, polls: u32) -> &Self {
        self.with(|s| s.default_test_polls = polls);
        self
    }

    pub fn set_reachability(&self, statuses: Vec<Option<u16>>, then: Option<u16>) -> &Self {
        self.with(|s| {
            s.reachability = statuses.into();
            s.default_reachability = then;
        });
        self
    }

    pub fn set_testcase(&self, create_status: u16, polls: u32, steps: Vec<Option<bool>>) -> &Self {
        self.with(|s| {
            s.testcase_create_status = create_status;
            s.testcase_polls = polls;
            s.testcase_steps = steps;
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        let prefix = format!("{}:", operation);
        self.calls()
            .into_iter()
            .filter(|c| c == operation || c.starts_with(&prefix))
            .collect()
    }

    pub fn test_requests(&self) -> Vec<TestPageRequest> {
        self.with(|s| s.test_requests.clone())
    }

    pub fn testcase_requests(&self) -> Vec<TestcaseRequest> {
        self.with(|s| s.testcase_requests.clone())
    }

    pub fn probed_urls(&self) -> Vec<String> {
        self.with(|s| s.probed_urls.clone())
    }

    pub fn latest_scan_of(&self, page_id: &str) -> Option<String> {
        self.with(|s| {
            s.pages
                .iter()
                .find(|p| p.id == page_id)
                .and_then(|p| p.latest_scan.clone())
        })
    }
}

impl FakeState {
    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn page_json(page: &FakePage) -> Value {
        json!({
            "id": page.id,
            "page_url": page.url,
            "info": {
                "latest_scan": page.latest_scan.as_ref().map(|id| json!({"id": id}))
            }
        })
    }
}

fn ok(payload: Value) -> Result<Envelope> {
    Ok(Envelope::new(200, payload))
}

fn created(payload: Value) -> Result<Envelope> {
    Ok(Envelope::new(201, payload))
}

fn not_found() -> Result<Envelope> {
    Ok(Envelope::new(404, json!({"detail": "Not found."})))
}

/// Count one status fetch down; `true` once the job has finished.
fn tick(polls_left: &mut u32) -> bool {
    if *polls_left == 0 {
        true
    } else {
        *polls_left -= 1;
        false
    }
}

fn completed_at(done: bool) -> Value {
    if done {
        json!(COMPLETED_AT)
    } else {
        Value::Null
    }
}

#[async_trait]
impl ScanerrApi for FakeScanerr {
    async fn add_site(&self, request: &AddSiteRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("add_site:{}", request.site_url));
            let id = s.next("site");
            s.sites.insert(id.clone(), request.site_url.clone());
            created(json!({"id": id, "site_url": request.site_url}))
        })
    }

    async fn crawl_site(&self, site_id: &str) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("crawl_site:{}", site_id));
            created(json!({"id": site_id}))
        })
    }

    async fn get_sites(&self, request: &GetSitesRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("get_sites:{}", request.site_id.clone().unwrap_or_default()));
            match request.site_id.as_ref() {
                Some(id) => match s.sites.get(id) {
                    Some(url) => ok(json!({"id": id, "site_url": url, "status": "active"})),
                    None => not_found(),
                },
                None => {
                    let results: Vec<Value> = s
                        .sites
                        .iter()
                        .map(|(id, url)| json!({"id": id, "site_url": url}))
                        .collect();
                    ok(json!({"count": results.len(), "results": results}))
                }
            }
        })
    }

    async fn delete_site(&self, site_id: &str) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("delete_site:{}", site_id));
            match s.sites.remove(site_id) {
                Some(_) => ok(json!({"message": "site deleted"})),
                None => not_found(),
            }
        })
    }

    async fn add_page(&self, request: &AddPageRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("add_page:{}", request.site_id));
            let id = s.next("page");
            s.pages.push(FakePage {
                id: id.clone(),
                url: request.page_url.clone().unwrap_or_default(),
                latest_scan: None,
            });
            created(json!({"id": id}))
        })
    }

    async fn get_pages(&self, request: &GetPagesRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("get_pages:{}", request.site_id.clone().unwrap_or_default()));
            let results: Vec<Value> = s.pages.iter().map(FakeState::page_json).collect();
            ok(json!({"count": results.len(), "results": results}))
        })
    }

    async fn delete_page(&self, page_id: &str) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("delete_page:{}", page_id));
            ok(json!({"message": "page deleted"}))
        })
    }

    async fn scan(&self, request: &ScanRequest) -> Result<Envelope> {
        self.with(|s| {
            let targets: Vec<usize> = match request {
                ScanRequest::Site { site_id } => {
                    s.record(format!("scan:site:{}", site_id));
                    (0..s.pages.len()).collect()
                }
                ScanRequest::Page { page_id } => {
                    s.record(format!("scan:page:{}", page_id));
                    s.pages.iter().position(|p| &p.id == page_id).into_iter().collect()
                }
            };

            let mut ids = Vec::new();
            for index in targets {
                let scan_id = s.next("scan");
                let polls = s.new_scan_polls;
                s.scans.insert(scan_id.clone(), polls);
                s.pages[index].latest_scan = Some(scan_id.clone());
                ids.push(scan_id);
            }
            created(json!({"ids": ids}))
        })
    }

    async fn get_scans(&self, request: &GetScansRequest) -> Result<Envelope> {
        self.with(|s| {
            let id = request.scan_id.clone().unwrap_or_default();
            s.record(format!("get_scans:{}", id));
            match s.scans.get_mut(&id) {
                Some(polls_left) => {
                    let done = tick(polls_left);
                    ok(json!({"id": id, "time_completed": completed_at(done)}))
                }
                None => not_found(),
            }
        })
    }

    async fn test_page(&self, request: &TestPageRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("test_page:{}", request.page_id));
            s.test_requests.push(request.clone());
            let test_id = s.next("test");
            let polls = s
                .test_polls
                .get(&request.page_id)
                .copied()
                .unwrap_or(s.default_test_polls);
            let score = s.scores.get(&request.page_id).copied().unwrap_or(100.0);
            s.tests.insert(test_id.clone(), FakeTest { polls_left: polls, score });
            created(json!({"ids": [test_id]}))
        })
    }

    async fn get_tests(&self, request: &GetTestsRequest) -> Result<Envelope> {
        self.with(|s| {
            let id = request.test_id.clone().unwrap_or_default();
            s.record(format!("get_tests:{}", id));
            match s.tests.get_mut(&id) {
                Some(test) => {
                    let done = tick(&mut test.polls_left);
                    let score = if done { json!(test.score) } else { Value::Null };
                    ok(json!({"id": id, "time_completed": completed_at(done), "score": score}))
                }
                None => not_found(),
            }
        })
    }

    async fn get_cases(&self, request: &GetCasesRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("get_cases:{}", request.case_id.clone().unwrap_or_default()));
            ok(json!({"results": []}))
        })
    }

    async fn delete_case(&self, case_id: &str) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("delete_case:{}", case_id));
            ok(json!({"message": "case deleted"}))
        })
    }

    async fn testcase_site(&self, request: &TestcaseRequest) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("testcase_site:{}", request.case_id));
            s.testcase_requests.push(request.clone());
            if !s.testcase_create_status.to_string().starts_with('2') {
                return Ok(Envelope::new(
                    s.testcase_create_status,
                    json!({"reason": "case does not exist"}),
                ));
            }
            let id = s.next("testcase");
            let testcase = FakeTestcase {
                polls_left: s.testcase_polls,
                steps: s.testcase_steps.clone(),
            };
            s.testcases.insert(id.clone(), testcase);
            created(json!({"id": id}))
        })
    }

    async fn get_testcases(&self, request: &GetTestcasesRequest) -> Result<Envelope> {
        self.with(|s| {
            let id = request.testcase_id.clone().unwrap_or_default();
            s.record(format!("get_testcases:{}", id));
            match s.testcases.get_mut(&id) {
                Some(testcase) => {
                    let done = tick(&mut testcase.polls_left);
                    let steps: Vec<Value> = testcase
                        .steps
                        .iter()
                        .map(|passed| {
                            let passed = if done { json!(passed) } else { Value::Null };
                            json!({"action": {"passed": passed}})
                        })
                        .collect();
                    let passed = if done {
                        json!(testcase.steps.iter().all(|p| *p != Some(false)))
                    } else {
                        Value::Null
                    };
                    ok(json!({
                        "id": id,
                        "time_completed": completed_at(done),
                        "passed": passed,
                        "steps": steps,
                    }))
                }
                None => not_found(),
            }
        })
    }

    async fn delete_testcase(&self, testcase_id: &str) -> Result<Envelope> {
        self.with(|s| {
            s.record(format!("delete_testcase:{}", testcase_id));
            ok(json!({"message": "testcase deleted"}))
        })
    }
}

#[async_trait]
impl Reachability for FakeScanerr {
    async fn status_of(&self, url: &str) -> Option<u16> {
        self.with(|s| {
            s.probed_urls.push(url.to_string());
            s.reachability.pop_front().unwrap_or(s.default_reachability)
        })
    }
}
