//! Driven port for delivering one text message to one phone number.
//!
//! Each call is independent: a failure affects only that recipient. Adapters
//! receive credentials and sender identity at construction, never per call.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::PhoneNumber;

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Provider-assigned message identifier.
    pub provider_id: String,
}

impl MessageReceipt {
    /// Wrap a provider message identifier.
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
        }
    }
}

define_port_error! {
    /// Errors raised while submitting a message to the provider.
    pub enum TransportError {
        /// The provider refused the message (bad number, unverified sender).
        Rejected { status: u16, message: String } =>
            "message rejected with status {status}: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } =>
            "message provider rate limited the request: {message}",
        /// Network or provider-side failure.
        Transport { message: String } =>
            "message transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "message transport timed out: {message}",
        /// The adapter is missing credentials or sender identity.
        Configuration { message: String } =>
            "message transport is misconfigured: {message}",
    }
}

impl TransportError {
    /// Whether the failure is a timeout rather than an answer from the provider.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Single-recipient text message sender.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Submit `body` for delivery to `to`.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the provider does not accept the
    /// message.
    async fn send_text(&self, to: &PhoneNumber, body: &str)
    -> Result<MessageReceipt, TransportError>;
}
