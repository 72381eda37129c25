use serde::Deserialize;

use crate::display::{Emphasis, Style};
use crate::health::Thresholds;

/// Root of the pingbox configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub probe: ProbeConfig,
    pub display: DisplayConfig,
}

/// What to ping, how often, and when to call the result degraded.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Hostname or IP address handed to ping.
    pub host: String,

    /// Number of echo requests per probe, defaults to 10.
    #[serde(default = "default_packet_count")]
    pub packet_count: u32,

    /// Seconds between the start of two probe cycles.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,

    /// Seconds after which a running ping is killed and counted as failed.
    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Where and how the status line is shown.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Full URL the display request is posted to.
    pub endpoint: String,

    #[serde(default = "default_channel")]
    pub channel: String,

    /// 1-based line on the display.
    #[serde(default = "default_row")]
    pub row: u16,

    /// Width in display columns the message is padded or cut to.
    #[serde(default = "default_length")]
    pub length: u16,

    #[serde(default)]
    pub style: Style,

    /// Highlight applied to degraded verdicts.
    #[serde(default)]
    pub emphasis: Emphasis,

    #[serde(default = "default_display_timeout")]
    pub timeout_seconds: u64,
}

fn default_packet_count() -> u32 {
    10
}

fn default_polling_interval() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_channel() -> String {
    "ping".to_string()
}

fn default_row() -> u16 {
    1
}

fn default_length() -> u16 {
    20
}

fn default_display_timeout() -> u64 {
    5
}
