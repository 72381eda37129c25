use serde::{Deserialize, Serialize};

use crate::config::model::DisplayConfig;
use crate::health::Verdict;

pub mod client;

/// How the display renders a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Style {
    #[default]
    Normal,
    Inverse,
}

/// Extra highlighting for lines that need attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emphasis {
    #[default]
    AlertColor,
    Blink,
}

/// One line to be written to the remote display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRequest {
    pub channel: String,
    pub row: u16,
    pub length: u16,
    pub message: String,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
}

/// Cuts or pads `input` to exactly `width` terminal columns. Wide characters
/// count as two columns; one that would straddle the edge is dropped.
fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::{Alignment, UnicodeTruncateStr};

    input.unicode_pad(width, Alignment::Left, true).into_owned()
}

impl DisplayRequest {
    /// Lays out `verdict` on the row described by `config`.
    ///
    /// The message is cut or padded to exactly `config.length` display columns.
    pub fn from_verdict(verdict: &Verdict, config: &DisplayConfig) -> Self {
        DisplayRequest {
            channel: config.channel.clone(),
            row: config.row,
            length: config.length,
            message: to_fixed_width(&verdict.message, config.length as usize),
            style: config.style,
            emphasis: verdict.emphasis.then_some(config.emphasis),
        }
    }
}
