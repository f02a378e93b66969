//! Message transport that logs instead of sending.
//!
//! Selected at startup when no SMS provider is configured and dry runs are
//! allowed, so the endpoint can be exercised locally.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::domain::PhoneNumber;
use crate::domain::ports::{MessageReceipt, MessageTransport, TransportError};

/// Accepts every message and returns a synthetic identifier.
#[derive(Debug, Default)]
pub struct LoggingTransport {
    sent: AtomicU64,
}

impl LoggingTransport {
    /// Create a transport with a zeroed message counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages accepted so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessageTransport for LoggingTransport {
    async fn send_text(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageReceipt, TransportError> {
        let sequence = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            sequence,
            recipient_chars = to.as_str().chars().count(),
            body_chars = body.chars().count(),
            "dry-run message accepted"
        );
        Ok(MessageReceipt::new(format!("dry-run-{sequence}")))
    }
}
