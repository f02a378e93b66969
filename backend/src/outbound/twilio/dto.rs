//! Twilio response payloads.

use serde::Deserialize;

/// Subset of the message resource returned on creation.
#[derive(Debug, Deserialize)]
pub(super) struct MessageResourceDto {
    pub(super) sid: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDto {
    #[serde(default)]
    pub(super) code: Option<u32>,
    #[serde(default)]
    pub(super) message: Option<String>,
}
