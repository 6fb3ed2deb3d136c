use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::api::{GetScansRequest, GetTestcasesRequest, GetTestsRequest, JobStatus, ScanerrApi};
use crate::config::PollSettings;
use crate::error::{Result, ScanerrError};
use crate::progress::ProgressLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Scan,
    Test,
    Testcase,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobKind::Scan => "scan",
            JobKind::Test => "test",
            JobKind::Testcase => "testcase",
        };
        f.write_str(name)
    }
}

/// What one wait observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub kind: JobKind,
    /// Ids in the order their completion was first observed.
    pub completed: Vec<String>,
    /// Ids never observed complete, in caller order.
    pub pending: Vec<String>,
    pub elapsed: Duration,
}

impl CompletionReport {
    pub fn timed_out(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }
}

async fn fetch_status<A: ScanerrApi + ?Sized>(api: &A, kind: JobKind, id: &str) -> Result<JobStatus> {
    match kind {
        JobKind::Scan => {
            api.get_scans(&GetScansRequest::by_id(id))
                .await?
                .decode("get_scans")
        }
        JobKind::Test => {
            api.get_tests(&GetTestsRequest::by_id(id))
                .await?
                .decode("get_tests")
        }
        JobKind::Testcase => {
            api.get_testcases(&GetTestcasesRequest::by_id(id))
                .await?
                .decode("get_testcases")
        }
    }
}

/// Block until every id reports a completion timestamp or `max_wait` runs out.
///
/// Each round sleeps `poll_interval`, then fetches every still-pending id
/// concurrently. Elapsed time advances by exactly `poll_interval` per round.
/// Running out of time is not an error: the leftover ids come back in
/// `pending`. A failed fetch is, and so is a zero `poll_interval`.
pub async fn await_completion<A: ScanerrApi + ?Sized>(
    api: &A,
    ids: &[String],
    kind: JobKind,
    settings: PollSettings,
    progress: &ProgressLog,
) -> Result<CompletionReport> {
    if settings.poll_interval.is_zero() {
        return Err(ScanerrError::Config(
            "poll_interval must be greater than zero".to_string(),
        ));
    }

    let mut pending: Vec<String> = Vec::new();
    for id in ids {
        if !pending.contains(id) {
            pending.push(id.clone());
        }
    }

    let mut completed = Vec::new();
    let mut elapsed = Duration::ZERO;

    while !pending.is_empty() && elapsed < settings.max_wait {
        sleep(settings.poll_interval).await;
        elapsed += settings.poll_interval;

        let statuses = join_all(pending.iter().map(|id| fetch_status(api, kind, id))).await;

        let mut still_pending = Vec::with_capacity(pending.len());
        for (id, status) in pending.into_iter().zip(statuses) {
            if status?.is_complete() {
                progress.success(format!("{} completed -> {}", kind, id)).await;
                completed.push(id);
            } else {
                still_pending.push(id);
            }
        }
        pending = still_pending;

        debug!(
            "{} poll after {:?}: {} complete, {} pending",
            kind,
            elapsed,
            completed.len(),
            pending.len()
        );
    }

    if !pending.is_empty() {
        progress
            .warn(format!(
                "max wait time reached - {} {}(s) not observed complete: {}",
                pending.len(),
                kind,
                pending.join(", ")
            ))
            .await;
    }

    Ok(CompletionReport {
        kind,
        completed,
        pending,
        elapsed,
    })
}
