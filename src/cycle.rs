use reqwest::Client;

use crate::config::AppConfig;
use crate::display::DisplayRequest;
use crate::display::client::{DisplayError, send_to_display};
use crate::health::{Verdict, evaluate};
use crate::ping::prelude::*;

/// Runs one probe → parse → evaluate → report pass.
///
/// Probe and parse failures end up in the returned verdict; only a failed
/// display update is returned as an error.
pub async fn run_cycle<R: ProbeRunner>(
    runner: &R,
    client: &Client,
    config: &AppConfig,
) -> Result<Verdict, DisplayError> {
    let result = probe_host(runner, &config.probe.host).await;
    match &result.outcome {
        ProbeOutcome::Measured(m) => log::debug!(
            "[{}] {}/{} replies, rtt {:.3}-{:.3}ms",
            result.host,
            m.received(),
            m.sent(),
            m.min_rtt(),
            m.max_rtt()
        ),
        ProbeOutcome::Unparseable(failure) => {
            log::warn!("[{}] Unexpected ping output: {failure}", result.host)
        }
        ProbeOutcome::Failed(failure) => log::warn!("[{}] Ping failed: {failure}", result.host),
    }

    let verdict = evaluate(&result, &config.probe.thresholds);
    if verdict.degraded {
        println!("[{}] ❌ {}", result.host, verdict.message);
    } else {
        println!("[{}] ✅ {}", result.host, verdict.message);
    }

    let request = DisplayRequest::from_verdict(&verdict, &config.display);
    send_to_display(client, &config.display.endpoint, &request).await?;

    Ok(verdict)
}
