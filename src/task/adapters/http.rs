//! HTTP plumbing shared by the provider connectors.

use crate::task::ports::{ConnectorError, ConnectorResult};
use reqwest::{Response, StatusCode, header::RETRY_AFTER};
use std::time::Duration;

/// Per-request timeout applied to every provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Builds the HTTP client used by a connector.
///
/// # Errors
///
/// Returns [`ConnectorError::Configuration`] when the client cannot be built.
pub fn build_client() -> ConnectorResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("taskhub/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| ConnectorError::Configuration(format!("failed to build HTTP client: {err}")))
}

/// Sends a request and maps non-success statuses onto [`ConnectorError`].
///
/// # Errors
///
/// Returns [`ConnectorError::Transport`] when no response arrives, or the
/// status-derived error for non-2xx responses.
pub async fn send(request: reqwest::RequestBuilder) -> ConnectorResult<Response> {
    let response = request.send().await.map_err(ConnectorError::transport)?;
    check_status(response).await
}

/// Sends a request and decodes the JSON body.
///
/// # Errors
///
/// Returns the errors of [`send`], or [`ConnectorError::Decode`] when the
/// body is not JSON.
pub async fn send_json(request: reqwest::RequestBuilder) -> ConnectorResult<serde_json::Value> {
    let response = send(request).await?;
    response
        .json::<serde_json::Value>()
        .await
        .map_err(|err| ConnectorError::Decode(err.to_string()))
}

async fn check_status(response: Response) -> ConnectorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ConnectorError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, body))
}

/// Maps a non-success, non-429 status onto the error taxonomy.
#[must_use]
pub fn classify_status(status: StatusCode, body: String) -> ConnectorError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited { retry_after: None },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ConnectorError::Unauthorized(status.as_u16())
        }
        StatusCode::NOT_FOUND => ConnectorError::NotFound,
        _ if status.is_server_error() => ConnectorError::Server {
            status: status.as_u16(),
            body,
        },
        _ => ConnectorError::Rejected {
            status: status.as_u16(),
            body,
        },
    }
}
