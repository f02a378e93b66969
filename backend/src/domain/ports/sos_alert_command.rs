//! Driving port for triggering SOS alerts.
//!
//! Inbound adapters depend on this trait rather than on the dispatcher so
//! endpoint tests can substitute canned outcomes.

use async_trait::async_trait;

use super::MessageReceipt;
use crate::domain::{DirectSendError, DispatchError, DispatchOutcome, PhoneNumber, UserId};

/// Message used by direct sends when the caller supplies none.
pub const DEFAULT_DIRECT_SOS_MESSAGE: &str = "🚨 SOS Alert! Help is needed immediately!";

/// Request to alert every emergency contact of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosAlertRequest {
    /// User in distress.
    pub user_id: UserId,
    /// Free-form location text, passed through verbatim.
    pub location_text: Option<String>,
}

/// Request to send one SOS message to an explicit number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSosRequest {
    /// Recipient number.
    pub phone: PhoneNumber,
    /// Message body; [`DEFAULT_DIRECT_SOS_MESSAGE`] when absent.
    pub message: Option<String>,
}

impl DirectSosRequest {
    /// Body to send, falling back to the default SOS text for blank input.
    #[must_use]
    pub fn body(&self) -> &str {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(DEFAULT_DIRECT_SOS_MESSAGE)
    }
}

/// Use-case port for SOS alerts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SosAlertCommand: Send + Sync {
    /// Alert every reachable emergency contact of the requesting user.
    ///
    /// # Errors
    /// Only for unknown users and contact store outages; delivery failures
    /// are reported inside the [`DispatchOutcome`].
    async fn dispatch(&self, request: SosAlertRequest) -> Result<DispatchOutcome, DispatchError>;

    /// Send a single SOS message to an explicit number.
    ///
    /// # Errors
    /// Returns [`DirectSendError`] when the message was not accepted in time.
    async fn send_direct(&self, request: DirectSosRequest)
    -> Result<MessageReceipt, DirectSendError>;
}
