//! Shared HTTP client and response status classification.

mod client;
mod status;

pub use client::{ACCEPT_ENCODING_VALUE, BROWSER_USER_AGENT, HttpClient};
pub use status::{HttpStatusError, check_status, classify_status};
