//! Read-only projections of the remote resources.
//!
//! Every field the server may omit is an `Option`; callers decide what an
//! absent value means.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ids arrive as strings, numbers, or `{ "id": ... }` objects depending on
/// the endpoint and the `lean` flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
    Nested { id: Box<RawId> },
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
            RawId::Nested { id } => String::from(*id),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Completion timestamps are kept as sent. Only their presence matters for
/// completion; `parse_timestamp` reads them for display.
fn de_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn de_steps<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<TestcaseStep>, D::Error> {
    Ok(Option::<Vec<TestcaseStep>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything other than an object with a boolean `passed` counts as no
/// outcome for that step.
fn de_action<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<StepAction>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(StepAction {
            passed: map.get("passed").and_then(Value::as_bool),
        }),
        _ => None,
    })
}

/// Best-effort parse of a server timestamp. Accepts RFC 3339 and naive
/// ISO 8601 (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Site {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub site_url: String,
    #[serde(default)]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScanRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub time_completed: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PageInfo {
    #[serde(default)]
    pub latest_scan: Option<ScanRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Page {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub info: Option<PageInfo>,
    #[serde(default)]
    pub latest_scan: Option<ScanRef>,
}

impl Page {
    /// The page's most recent scan, read from `info.latest_scan` or a
    /// top-level `latest_scan`.
    pub fn latest_scan_id(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.latest_scan.as_ref())
            .or(self.latest_scan.as_ref())
            .map(|scan| scan.id.as_str())
    }

    pub fn display_url(&self) -> &str {
        self.page_url.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Scan {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, alias = "page", deserialize_with = "de_opt_id")]
    pub page_id: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub time_completed: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Test {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, alias = "page", deserialize_with = "de_opt_id")]
    pub page_id: Option<String>,
    #[serde(default, alias = "pre_scan", deserialize_with = "de_opt_id")]
    pub pre_scan_id: Option<String>,
    #[serde(default, alias = "post_scan", deserialize_with = "de_opt_id")]
    pub post_scan_id: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub time_completed: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Case {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "site", deserialize_with = "de_opt_id")]
    pub site_id: Option<String>,
    #[serde(default)]
    pub steps: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StepAction {
    #[serde(default)]
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TestcaseStep {
    #[serde(default, deserialize_with = "de_action")]
    pub action: Option<StepAction>,
}

impl TestcaseStep {
    pub fn failed(&self) -> bool {
        matches!(
            self.action,
            Some(StepAction {
                passed: Some(false)
            })
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Testcase {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, alias = "site", deserialize_with = "de_opt_id")]
    pub site_id: Option<String>,
    #[serde(default, alias = "case", deserialize_with = "de_opt_id")]
    pub case_id: Option<String>,
    #[serde(default, deserialize_with = "de_steps")]
    pub steps: Vec<TestcaseStep>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub time_completed: Option<String>,
    #[serde(default)]
    pub passed: Option<bool>,
}

impl Testcase {
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.time_completed.as_deref().and_then(parse_timestamp)
    }

    /// 1-based labels (`step-3`) of every step whose action reported a failure.
    pub fn failed_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.failed())
            .map(|(i, _)| format!("step-{}", i + 1))
            .collect()
    }
}

/// Minimal projection shared by scans, tests and testcases.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JobStatus {
    #[serde(default, deserialize_with = "de_timestamp")]
    pub time_completed: Option<String>,
}

impl JobStatus {
    pub fn is_complete(&self) -> bool {
        self.time_completed.is_some()
    }
}

#[derive(Deserialize)]
struct RawJobIds {
    #[serde(default)]
    ids: Option<Vec<RawId>>,
    #[serde(default)]
    id: Option<RawId>,
}

/// Ids of jobs created by a trigger call, from `ids` (batch) or `id` (single).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "RawJobIds")]
pub struct JobIds(pub Vec<String>);

impl From<RawJobIds> for JobIds {
    fn from(raw: RawJobIds) -> Self {
        match (raw.ids, raw.id) {
            (Some(ids), _) => JobIds(ids.into_iter().map(String::from).collect()),
            (None, Some(id)) => JobIds(vec![String::from(id)]),
            (None, None) => JobIds(Vec::new()),
        }
    }
}

impl JobIds {
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// A list response, paginated (`{"results": [...]}`) or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paginated { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paginated { results } => results,
            Listing::Bare(items) => items,
        }
    }
}
