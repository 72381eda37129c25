use serde::Deserialize;

use crate::ping::prelude::*;

/// Limits above which a measured host is reported as degraded.
///
/// Both values are deployment-tunable. Earlier deployments used a jitter
/// multiple of 1 with a 10ms ceiling, later ones 2 with 25ms.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    /// Degrade when `max_rtt - min_rtt` exceeds this multiple of `min_rtt`.
    #[serde(default = "default_jitter_multiple")]
    pub jitter_multiple: f64,

    /// Degrade when `max_rtt` exceeds this many milliseconds.
    #[serde(default = "default_latency_ceiling_ms")]
    pub latency_ceiling_ms: f64,
}

fn default_jitter_multiple() -> f64 {
    2.0
}

fn default_latency_ceiling_ms() -> f64 {
    25.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            jitter_multiple: default_jitter_multiple(),
            latency_ceiling_ms: default_latency_ceiling_ms(),
        }
    }
}

/// Health classification of one probe, ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub degraded: bool,
    pub message: String,
    pub emphasis: bool,
}

impl Verdict {
    fn degraded(message: String) -> Self {
        Verdict {
            degraded: true,
            message,
            emphasis: true,
        }
    }
}

fn has_packet_loss(m: &Measurement) -> bool {
    m.sent() == 0 || m.received() != m.sent()
}

// Relative to the fastest reply, so very small minimums make this strict.
// Skipped when there is no positive minimum to compare against.
fn has_jitter(m: &Measurement, thresholds: &Thresholds) -> bool {
    m.min_rtt() > 0.0 && (m.max_rtt() - m.min_rtt()) > thresholds.jitter_multiple * m.min_rtt()
}

fn exceeds_ceiling(m: &Measurement, thresholds: &Thresholds) -> bool {
    m.max_rtt() > thresholds.latency_ceiling_ms
}

fn latency_range(m: &Measurement) -> String {
    format!("{}-{}ms", m.min_rtt().floor(), m.max_rtt().floor())
}

/// Judges a probe result against `thresholds`.
///
/// Execution and parse failures are always degraded and carry their
/// diagnostic verbatim. Measurements are degraded on packet loss, jitter or
/// a slow maximum round trip.
pub fn evaluate(result: &ProbeResult, thresholds: &Thresholds) -> Verdict {
    let m = match &result.outcome {
        ProbeOutcome::Failed(failure) => return Verdict::degraded(failure.description().to_string()),
        ProbeOutcome::Unparseable(failure) => return Verdict::degraded(failure.to_string()),
        ProbeOutcome::Measured(m) => m,
    };

    let degraded = has_packet_loss(m) || has_jitter(m, thresholds) || exceeds_ceiling(m, thresholds);

    if degraded {
        Verdict::degraded(format!(
            "{} {}/{} {}",
            result.host,
            m.received(),
            m.sent(),
            latency_range(m)
        ))
    } else {
        Verdict {
            degraded: false,
            message: format!("{} {}", result.host, latency_range(m)),
            emphasis: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn measured(sent: u32, received: u32, min: f64, max: f64) -> ProbeResult {
        ProbeResult::new(
            "8.8.8.8",
            ProbeOutcome::Measured(Measurement::new(sent, received, min, max).unwrap()),
        )
    }

    #[test]
    fn test_healthy_measurement_shows_only_latency() {
        let verdict = evaluate(&measured(10, 10, 6.315, 7.553), &Thresholds::default());
        assert_eq!(
            verdict,
            Verdict {
                degraded: false,
                message: "8.8.8.8 6-7ms".to_string(),
                emphasis: false,
            }
        );
    }

    #[test]
    fn test_packet_loss_is_degraded() {
        let verdict = evaluate(&measured(10, 8, 6.315, 7.553), &Thresholds::default());
        assert!(verdict.degraded);
        assert!(verdict.emphasis);
        assert_eq!(verdict.message, "8.8.8.8 8/10 6-7ms");
    }

    #[test]
    fn test_jitter_uses_configured_multiple() {
        // spread of 12ms on a 6ms minimum is exactly 2x
        let result = measured(10, 10, 6.0, 18.0);
        assert!(!evaluate(&result, &Thresholds::default()).degraded);

        let strict = Thresholds {
            jitter_multiple: 1.0,
            latency_ceiling_ms: 25.0,
        };
        let verdict = evaluate(&result, &strict);
        assert!(verdict.degraded);
        assert_eq!(verdict.message, "8.8.8.8 10/10 6-18ms");
    }

    #[test]
    fn test_latency_ceiling_is_configurable() {
        let result = measured(10, 10, 11.0, 12.0);
        assert!(!evaluate(&result, &Thresholds::default()).degraded);

        let strict = Thresholds {
            jitter_multiple: 2.0,
            latency_ceiling_ms: 10.0,
        };
        assert!(evaluate(&result, &strict).degraded);
    }

    #[test]
    fn test_nothing_sent_is_degraded() {
        let verdict = evaluate(&measured(0, 0, 0.0, 0.0), &Thresholds::default());
        assert!(verdict.degraded);
        assert_eq!(verdict.message, "8.8.8.8 0/0 0-0ms");
    }

    #[test]
    fn test_zero_minimum_skips_jitter_but_not_ceiling() {
        assert!(!evaluate(&measured(5, 5, 0.0, 3.0), &Thresholds::default()).degraded);
        assert!(evaluate(&measured(5, 5, 0.0, 30.0), &Thresholds::default()).degraded);
    }

    #[test]
    fn test_execution_failure_message_is_verbatim() {
        let result = ProbeResult::new(
            "example.invalid",
            ProbeOutcome::Failed(ExecutionFailure::from_error_text(
                "ping: cannot resolve example.invalid: Unknown host\nAdditional detail line",
            )),
        );
        assert_eq!(
            evaluate(&result, &Thresholds::default()),
            Verdict {
                degraded: true,
                message: "Additional detail line".to_string(),
                emphasis: true,
            }
        );
    }

    #[test]
    fn test_parse_failure_message_is_verbatim() {
        let result = ProbeResult::new(
            "8.8.8.8",
            ProbeOutcome::Unparseable(parse_statistics("").unwrap_err()),
        );
        let verdict = evaluate(&result, &Thresholds::default());
        assert!(verdict.degraded);
        assert!(verdict.emphasis);
        assert_eq!(verdict.message, "could not parse ping output: no packet summary");
    }

    proptest! {
        #[test]
        fn lossless_steady_fast_hosts_are_healthy(
            sent in 1u32..1_000,
            min in 0.001f64..10.0,
            spread_fraction in 0.0f64..=1.0,
        ) {
            let thresholds = Thresholds::default();
            let max = (min + spread_fraction * thresholds.jitter_multiple * min)
                .min(thresholds.latency_ceiling_ms)
                .max(min);
            prop_assume!(max - min <= thresholds.jitter_multiple * min);

            let verdict = evaluate(&measured(sent, sent, min, max), &thresholds);
            prop_assert!(!verdict.degraded);
            prop_assert!(!verdict.emphasis);
        }

        #[test]
        fn any_packet_loss_is_degraded(
            sent in 1u32..1_000,
            lost in 1u32..1_000,
            min in 0.0f64..100.0,
            spread in 0.0f64..100.0,
        ) {
            let received = sent.saturating_sub(lost);
            let verdict = evaluate(&measured(sent, received, min, min + spread), &Thresholds::default());
            prop_assert!(verdict.degraded);
            let fraction = format!("{}/{}", received, sent);
            prop_assert!(verdict.message.contains(&fraction));
        }

        #[test]
        fn evaluation_is_repeatable(
            sent in 0u32..100,
            received_fraction in 0.0f64..=1.0,
            min in 0.0f64..50.0,
            spread in 0.0f64..50.0,
        ) {
            let received = (sent as f64 * received_fraction) as u32;
            let result = measured(sent, received, min, min + spread);
            let thresholds = Thresholds::default();
            prop_assert_eq!(evaluate(&result, &thresholds), evaluate(&result, &thresholds));
        }
    }
}
