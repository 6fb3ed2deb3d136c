pub mod overrides;
pub mod testcase;

pub use overrides::{parse_step_update, parse_step_updates};
pub use site_test::{run_site_test, PageTestResult, SiteTestOutcome, SiteTestParams};
pub use testcase::{run_testcase, TestcaseOutcome, TestcaseParams};

use serde::Serialize;

use crate::api::{GetPagesRequest, GetSitesRequest, Listing, Page, Reachability, ScanerrApi, Site};
use crate::config::ProbeSettings;
use crate::error::Result;
use crate::probe::{probe, ProbeOutcome};
use crate::progress::{Phase, ProgressLog};

/// Final verdict for one test or testcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    /// Never observed complete, so there is nothing to judge.
    Incomplete,
}

impl TestStatus {
    pub fn passed(self) -> bool {
        self == TestStatus::Passed
    }
}

/// `Passed` iff a score exists and reaches `threshold`.
pub fn evaluate_score(score: Option<f64>, threshold: f64) -> TestStatus {
    match score {
        Some(s) if s >= threshold => TestStatus::Passed,
        Some(_) => TestStatus::Failed,
        None => TestStatus::Incomplete,
    }
}

async fn fetch_site<A: ScanerrApi + ?Sized>(api: &A, site_id: &str) -> Result<Site> {
    api.get_sites(&GetSitesRequest::by_id(site_id))
        .await?
        .decode("get_sites")
}

async fn fetch_pages<A: ScanerrApi + ?Sized>(api: &A, site_id: &str) -> Result<Vec<Page>> {
    let listing: Listing<Page> = api
        .get_pages(&GetPagesRequest::for_site(site_id))
        .await?
        .decode("get_pages")?;
    Ok(listing.into_items())
}

/// Advisory liveness check before a workflow starts; the run continues
/// either way.
async fn check_availability<R: Reachability + ?Sized>(
    checker: &R,
    site: &Site,
    settings: ProbeSettings,
    progress: &ProgressLog,
) -> ProbeOutcome {
    progress
        .enter(Phase::Availability, "checking site availability...")
        .await;
    let outcome = probe(checker, &site.site_url, settings).await;
    if outcome.available {
        progress.success("site is available").await;
    } else {
        progress
            .failure("max wait time reached - proceeding with caution...")
            .await;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_threshold_boundaries() {
        assert_eq!(evaluate_score(Some(95.0), 90.0), TestStatus::Passed);
        assert_eq!(evaluate_score(Some(90.0), 90.0), TestStatus::Passed);
        assert_eq!(evaluate_score(Some(89.9), 90.0), TestStatus::Failed);
        assert_eq!(evaluate_score(None, 90.0), TestStatus::Incomplete);
    }

    #[test]
    fn test_incomplete_is_not_a_pass() {
        assert!(!TestStatus::Incomplete.passed());
        assert!(!TestStatus::Failed.passed());
        assert!(TestStatus::Passed.passed());
    }
}
