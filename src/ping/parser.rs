use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::result::{Measurement, ParseFailure};

/// Compiles an ordered list of candidate patterns. Adding support for another
/// ping variant means appending its pattern to the relevant list.
fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// Candidate shapes of the "N transmitted, M received" line, tried in order.
static PACKET_SUMMARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        // iputils: "10 packets transmitted, 10 received, 0% packet loss, time 9012ms"
        r"^\s*(?<tx>\d+) packets transmitted, (?<rx>\d+) received\b",
        // BSD / macOS: "10 packets transmitted, 10 packets received, 0.0% packet loss"
        r"^\s*(?<tx>\d+) packets transmitted, (?<rx>\d+) packets received\b",
    ])
});

/// Candidate shapes of the "min/avg/max/dev" line, tried in order.
static TIMING_SUMMARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        // iputils: "rtt min/avg/max/mdev = 6.315/6.663/7.553/0.362 ms"
        r"^\s*rtt min/avg/max/mdev = (?<min>[0-9.]+)/(?<avg>[0-9.]+)/(?<max>[0-9.]+)/(?<dev>[0-9.]+) ms\b",
        // BSD / macOS: "round-trip min/avg/max/stddev = 6.315/6.663/7.553/0.362 ms"
        r"^\s*round-trip min/avg/max/stddev = (?<min>[0-9.]+)/(?<avg>[0-9.]+)/(?<max>[0-9.]+)/(?<dev>[0-9.]+) ms\b",
    ])
});

struct PacketSummary {
    sent: u32,
    received: u32,
}

struct TimingSummary {
    min: f64,
    max: f64,
}

/// Returns the captures of the first line matched by any of `patterns`.
///
/// Patterns are tried in order for each line, so the earliest matching line
/// wins regardless of which pattern recognised it.
fn find_summary<'a>(lines: &[&'a str], patterns: &[Regex]) -> Option<Captures<'a>> {
    lines
        .iter()
        .copied()
        .find_map(|line| patterns.iter().find_map(|re| re.captures(line)))
}

fn parse_packet_summary(lines: &[&str]) -> Result<PacketSummary, ParseFailure> {
    let caps =
        find_summary(lines, &PACKET_SUMMARY_PATTERNS).ok_or(ParseFailure::MissingPacketSummary)?;

    let count = |name: &str| -> Result<u32, ParseFailure> {
        caps[name].parse::<u32>().map_err(|e| {
            ParseFailure::Malformed(format!("packet count '{}' is not a number: {e}", &caps[name]))
        })
    };

    Ok(PacketSummary {
        sent: count("tx")?,
        received: count("rx")?,
    })
}

fn parse_timing_summary(lines: &[&str]) -> Result<TimingSummary, ParseFailure> {
    let caps =
        find_summary(lines, &TIMING_SUMMARY_PATTERNS).ok_or(ParseFailure::MissingTimingSummary)?;

    let millis = |name: &str| -> Result<f64, ParseFailure> {
        caps[name].parse::<f64>().map_err(|e| {
            ParseFailure::Malformed(format!("round-trip time '{}' is not a number: {e}", &caps[name]))
        })
    };

    let min = millis("min")?;
    let avg = millis("avg")?;
    let max = millis("max")?;
    let _deviation = millis("dev")?;

    if avg < min || avg > max {
        return Err(ParseFailure::Malformed(format!(
            "average rtt {avg}ms lies outside {min}-{max}ms"
        )));
    }

    Ok(TimingSummary { min, max })
}

/// Reduces the textual output of `ping -q` to a [`Measurement`].
///
/// The packet summary is looked up first, so output lacking both summaries
/// reports the missing packet summary.
pub fn parse_statistics(output: &str) -> Result<Measurement, ParseFailure> {
    let lines: Vec<&str> = output
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let packets = parse_packet_summary(&lines)?;
    let timing = parse_timing_summary(&lines)?;

    Measurement::new(packets.sent, packets.received, timing.min, timing.max)
}
