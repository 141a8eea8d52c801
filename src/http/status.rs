//! Maps HTTP error statuses to messages a user can act on.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// A non-success HTTP status, classified.
#[derive(Debug)]
pub enum HttpStatusError {
    /// Rate limit exceeded (HTTP 403 with an exhausted quota, or 429)
    RateLimitExceeded(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Other 4xx
    ClientError(String),
    /// 5xx
    ServerError(String),
}

impl std::fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatusError::RateLimitExceeded(msg) => {
                write!(f, "Rate limit exceeded: {}. Try again later.", msg)
            }
            HttpStatusError::NotFound(msg) => write!(f, "Not found: {}", msg),
            HttpStatusError::Forbidden(msg) => write!(f, "Access forbidden: {}", msg),
            HttpStatusError::ClientError(msg) => write!(f, "Request error: {}", msg),
            HttpStatusError::ServerError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for HttpStatusError {}

/// Classifies a response status. GitHub reports an exhausted quota as a 403
/// with `x-ratelimit-remaining: 0`, so the headers are consulted too.
/// Returns `None` for anything that is not a 4xx or 5xx.
pub fn classify_status(status: StatusCode, headers: &HeaderMap) -> Option<HttpStatusError> {
    if !status.is_client_error() && !status.is_server_error() {
        return None;
    }

    let classified = match status {
        StatusCode::FORBIDDEN if is_rate_limited(headers) => {
            HttpStatusError::RateLimitExceeded("GitHub API rate limit exceeded".to_string())
        }
        StatusCode::FORBIDDEN => {
            HttpStatusError::Forbidden("Access to this resource is forbidden".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            HttpStatusError::RateLimitExceeded("Too many requests".to_string())
        }
        StatusCode::NOT_FOUND => {
            HttpStatusError::NotFound("The requested resource was not found".to_string())
        }
        s if s.is_client_error() => HttpStatusError::ClientError(format!("HTTP {}", s.as_u16())),
        s => HttpStatusError::ServerError(format!("HTTP {}", s.as_u16())),
    };
    Some(classified)
}

fn is_rate_limited(headers: &HeaderMap) -> bool {
    let remaining = headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    remaining == Some("0") || headers.contains_key(RETRY_AFTER)
}

/// Passes successful responses through and turns error statuses into a
/// classified `anyhow::Error`.
pub fn check_status(response: Response) -> anyhow::Result<Response> {
    match classify_status(response.status(), response.headers()) {
        Some(classified) => Err(anyhow::Error::from(classified)),
        None => Ok(response),
    }
}
