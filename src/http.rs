use serde::de::DeserializeOwned;

use crate::error::{FeedError, Result};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

pub(crate) async fn response_text_truncated(response: reqwest::Response, max_bytes: usize) -> String {
    let bytes = response.bytes().await.unwrap_or_default();
    let truncated = bytes.len() > max_bytes;
    let mut body = String::from_utf8_lossy(&bytes[..bytes.len().min(max_bytes)]).to_string();
    if truncated {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("...(truncated)");
    }
    body
}

/// Sends the request and classifies non-success statuses; 401/403/429 become
/// `Unauthorized`, everything else `Upstream`.
pub(crate) async fn send_checked(req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response_text_truncated(response, MAX_ERROR_BODY_BYTES).await;
        return Err(FeedError::from_status(status, body));
    }
    Ok(response)
}

/// As `send_checked`, but decodes a JSON body. A body that is not valid JSON of
/// the expected shape is a malformed upstream response, not a transport error.
pub(crate) async fn send_checked_json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T> {
    let response = send_checked(req).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| FeedError::InvalidResponse(err.to_string()))
}
