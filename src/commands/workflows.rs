use std::time::Duration;

use super::{TestSiteArgs, TestcaseSiteArgs, WaitArgs};
use crate::api::{Reachability, ScanerrApi};
use crate::config::{PollSettings, ProbeSettings};
use crate::orchestrator::{run_site_test, run_testcase, SiteTestParams, TestcaseParams};
use crate::progress::ProgressLog;

impl WaitArgs {
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings::with_max_wait(Duration::from_secs(self.max_wait_time))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            poll_interval: Duration::from_secs(self.poll_interval),
            max_wait: Duration::from_secs(self.poll_timeout),
        }
    }
}

pub async fn test_site<A>(api: &A, args: &TestSiteArgs) -> anyhow::Result<bool>
where
    A: ScanerrApi + Reachability + ?Sized,
{
    let params = SiteTestParams {
        threshold: args.min_score,
        probe: args.wait.probe_settings(),
        poll: args.wait.poll_settings(),
        ..SiteTestParams::new(&args.site_id)
    };

    let progress = ProgressLog::console();
    let outcome = run_site_test(api, &params, &progress).await?;
    if !outcome.passed {
        progress.failure("- Scanerr Tests Failed -").await;
    }
    Ok(outcome.passed)
}

pub async fn testcase_site<A>(api: &A, args: &TestcaseSiteArgs) -> anyhow::Result<bool>
where
    A: ScanerrApi + Reachability + ?Sized,
{
    let params = TestcaseParams {
        updates: args.updates.clone(),
        probe: args.wait.probe_settings(),
        poll: args.wait.poll_settings(),
        ..TestcaseParams::new(&args.site_id, &args.case_id)
    };

    let progress = ProgressLog::console();
    let outcome = run_testcase(api, &params, &progress).await?;
    if !outcome.passed {
        progress.failure("- Scanerr Testcase Failed -").await;
    }
    Ok(outcome.passed)
}
