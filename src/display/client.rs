use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::DisplayRequest;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("request to display failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("display rejected the update: {status} - {body}")]
    Status { status: StatusCode, body: String },
}

/// Pushes a single line to the display.
///
/// # Arguments
///
/// * `client` - A shared HTTP client; its timeout bounds the whole call.
/// * `endpoint` - Full URL of the display's text endpoint (e.g., "http://display.local:8080/api/text").
/// * `request` - The line to render, sent as a JSON body.
pub async fn send_to_display(
    client: &Client,
    endpoint: &str,
    request: &DisplayRequest,
) -> Result<(), DisplayError> {
    let response = client.post(endpoint).json(request).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DisplayError::Status { status, body });
    }

    log::debug!("Display row {} updated on channel '{}'", request.row, request.channel);
    Ok(())
}
