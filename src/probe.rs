use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::api::Reachability;
use crate::config::ProbeSettings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    pub available: bool,
    /// Status of the last answer, `None` if nothing ever answered.
    pub last_status: Option<u16>,
    pub elapsed: Duration,
}

fn is_server_error(status: Option<u16>) -> bool {
    match status {
        Some(code) => (500..600).contains(&code),
        None => true,
    }
}

/// Wait for `url` to answer with anything other than a 5xx.
///
/// Sleeps `interval` before every check and stops once `max_wait` has been
/// spent. Never fails; an unreachable target just comes back unavailable.
pub async fn probe<R: Reachability + ?Sized>(
    checker: &R,
    url: &str,
    settings: ProbeSettings,
) -> ProbeOutcome {
    // A zero interval would never use up `max_wait`; check once instead.
    let interval = if settings.interval.is_zero() {
        settings.max_wait
    } else {
        settings.interval
    };
    let mut elapsed = Duration::ZERO;
    let mut last_status = None;

    while elapsed < settings.max_wait {
        sleep(interval).await;
        elapsed += interval;

        last_status = checker.status_of(url).await;
        debug!("Probe {} after {:?}: {:?}", url, elapsed, last_status);

        if !is_server_error(last_status) {
            return ProbeOutcome {
                available: true,
                last_status,
                elapsed,
            };
        }
    }

    ProbeOutcome {
        available: false,
        last_status,
        elapsed,
    }
}
