use serde::Serialize;
use tracing::{info, warn};

use super::{check_availability, fetch_site, parse_step_updates, TestStatus};
use crate::api::{GetTestcasesRequest, JobIds, Reachability, ScanerrApi, Testcase, TestcaseRequest};
use crate::config::{PollSettings, ProbeSettings};
use crate::error::{Result, ScanerrError};
use crate::poller::{await_completion, CompletionReport, JobKind};
use crate::probe::ProbeOutcome;
use crate::progress::{Phase, ProgressLog};

#[derive(Debug, Clone, PartialEq)]
pub struct TestcaseParams {
    pub site_id: String,
    pub case_id: String,
    /// Raw `step-<n>:<value>` overrides as typed by the user.
    pub updates: Vec<String>,
    pub probe: ProbeSettings,
    pub poll: PollSettings,
}

impl TestcaseParams {
    pub fn new(site_id: impl Into<String>, case_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            case_id: case_id.into(),
            updates: Vec::new(),
            probe: ProbeSettings::default(),
            poll: PollSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestcaseOutcome {
    /// `None` when the server refused to create the testcase.
    pub testcase_id: Option<String>,
    pub probe: ProbeOutcome,
    pub wait: Option<CompletionReport>,
    pub status: TestStatus,
    pub passed: bool,
    /// 1-based labels of steps whose action failed.
    pub failed_steps: Vec<String>,
}

/// Run a predefined case against a site and report the server's verdict.
///
/// Overrides are validated before anything is sent, so a malformed one
/// aborts with `InvalidStepUpdate` and no remote side effects.
pub async fn run_testcase<A>(
    api: &A,
    params: &TestcaseParams,
    progress: &ProgressLog,
) -> Result<TestcaseOutcome>
where
    A: ScanerrApi + Reachability + ?Sized,
{
    let updates = parse_step_updates(params.updates.as_slice())?;

    let site = fetch_site(api, &params.site_id).await?;
    let probe = check_availability(api, &site, params.probe, progress).await;

    progress
        .enter(Phase::Testcase, format!("starting testcase for case {}...", params.case_id))
        .await;
    let request = TestcaseRequest {
        site_id: site.id.clone(),
        case_id: params.case_id.clone(),
        updates,
    };
    let envelope = api.testcase_site(&request).await?;
    if !envelope.succeeded {
        warn!("Testcase creation refused with status {}", envelope.status);
        progress
            .failure(format!(
                "testcase could not be created ({}): {}",
                envelope.status, envelope.payload
            ))
            .await;
        return Ok(TestcaseOutcome {
            testcase_id: None,
            probe,
            wait: None,
            status: TestStatus::Failed,
            passed: false,
            failed_steps: Vec::new(),
        });
    }

    let testcase_id = envelope
        .decode::<JobIds>("testcase_site")?
        .first()
        .map(str::to_string)
        .ok_or_else(|| ScanerrError::decode("testcase_site", "response carried no testcase id"))?;
    progress.success(format!("testcase created -> {}", testcase_id)).await;

    progress.info("checking testcase completion...").await;
    let wait = await_completion(
        api,
        std::slice::from_ref(&testcase_id),
        JobKind::Testcase,
        params.poll,
        progress,
    )
    .await?;

    let testcase: Testcase = api
        .get_testcases(&GetTestcasesRequest::by_id(&testcase_id))
        .await?
        .decode("get_testcases")?;
    let failed_steps = testcase.failed_steps();

    let status = match (testcase.time_completed.is_some(), testcase.passed) {
        (true, Some(true)) => TestStatus::Passed,
        (true, _) => TestStatus::Failed,
        (false, _) => TestStatus::Incomplete,
    };

    match status {
        TestStatus::Passed => progress.success("testcase passed").await,
        TestStatus::Failed if failed_steps.is_empty() => progress.failure("testcase failed").await,
        TestStatus::Failed => {
            progress
                .failure(format!("testcase failed at {}", failed_steps.join(", ")))
                .await
        }
        TestStatus::Incomplete => {
            progress
                .failure("testcase did not complete before the max wait time")
                .await
        }
    }

    info!(
        "Testcase {} finished: {:?} (completed at {:?})",
        testcase_id,
        status,
        testcase.completed_at()
    );

    Ok(TestcaseOutcome {
        testcase_id: Some(testcase_id),
        probe,
        wait: Some(wait),
        status,
        passed: status.passed(),
        failed_steps,
    })
}
