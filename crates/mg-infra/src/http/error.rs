use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpAdapterError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("request rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("server error: {0}")]
    Server(StatusCode),

    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HttpAdapterError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            HttpAdapterError::Timeout
        } else if error.is_decode() {
            HttpAdapterError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            map_status_code(status, String::new())
        } else {
            HttpAdapterError::Network(error.to_string())
        }
    }
}

pub(crate) fn map_status_code(code: StatusCode, body: String) -> HttpAdapterError {
    match code {
        _ if code.is_client_error() => HttpAdapterError::Rejected { status: code, body },
        _ if code.is_server_error() => HttpAdapterError::Server(code),
        _ => HttpAdapterError::UnexpectedStatus(code),
    }
}

/// Turns a non-2xx response into an error, keeping the body for 4xx.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, HttpAdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status_code(status, body))
}
