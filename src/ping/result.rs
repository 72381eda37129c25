use thiserror::Error;

/// Packet counts and round-trip bounds of a single ping run.
///
/// Only constructible through [`Measurement::new`], so a value of this type
/// always satisfies `received <= sent` and `min_rtt <= max_rtt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    sent: u32,
    received: u32,
    min_rtt: f64,
    max_rtt: f64,
}

impl Measurement {
    pub fn new(sent: u32, received: u32, min_rtt: f64, max_rtt: f64) -> Result<Self, ParseFailure> {
        if !min_rtt.is_finite() || !max_rtt.is_finite() || min_rtt < 0.0 || max_rtt < 0.0 {
            return Err(ParseFailure::Malformed(format!(
                "round-trip times {min_rtt}/{max_rtt} are not valid durations"
            )));
        }
        if received > sent {
            return Err(ParseFailure::Malformed(format!(
                "{received} packets received but only {sent} transmitted"
            )));
        }
        if min_rtt > max_rtt {
            return Err(ParseFailure::Malformed(format!(
                "minimum rtt {min_rtt}ms exceeds maximum rtt {max_rtt}ms"
            )));
        }

        Ok(Measurement {
            sent,
            received,
            min_rtt,
            max_rtt,
        })
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    /// Fastest round trip in milliseconds.
    pub fn min_rtt(&self) -> f64 {
        self.min_rtt
    }

    /// Slowest round trip in milliseconds.
    pub fn max_rtt(&self) -> f64 {
        self.max_rtt
    }
}

/// Why ping output could not be reduced to a [`Measurement`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("could not parse ping output: no packet summary")]
    MissingPacketSummary,

    #[error("could not parse ping output: no timing summary")]
    MissingTimingSummary,

    #[error("malformed statistics: {0}")]
    Malformed(String),
}

/// The diagnostic reported by ping itself when it could not run or reach the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    description: String,
}

const FALLBACK_DESCRIPTION: &str = "ping failed";

impl ExecutionFailure {
    /// Extracts the description from a raw error blob.
    ///
    /// The first line of the blob is a header naming the failed command; the
    /// diagnostic of interest is the line after it. If that line is missing or
    /// blank, the first non-empty line is used instead.
    pub fn from_error_text(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        let description = lines
            .get(1)
            .filter(|line| !line.is_empty())
            .or_else(|| lines.iter().find(|line| !line.is_empty()))
            .map(|line| line.to_string())
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

        ExecutionFailure { description }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Exactly one of the three things a probe can end in.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Measured(Measurement),
    Unparseable(ParseFailure),
    Failed(ExecutionFailure),
}

/// The outcome of probing one host, tagged with that host.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub host: String,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(host: impl Into<String>, outcome: ProbeOutcome) -> Self {
        ProbeResult {
            host: host.into(),
            outcome,
        }
    }
}
