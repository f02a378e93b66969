//! Per-contact delivery results and their aggregate.
//!
//! A dispatch produces exactly one [`DeliveryResult`] per reachable contact.
//! [`DispatchOutcome::from_results`] is the single place those results are
//! tallied, so counts never depend on the order in which sends finished.

use std::fmt;

use serde::Serialize;

use super::ContactRef;
use super::ports::{ContactStoreError, TransportError};

/// Why one contact could not be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The send did not finish within the per-send timeout.
    Timeout,
    /// The transport reported a failure.
    Provider(TransportError),
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("send timed out"),
            Self::Provider(err) => write!(f, "{err}"),
        }
    }
}

/// Terminal state of one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The provider accepted the message.
    Sent {
        /// Provider-assigned message identifier.
        provider_id: String,
    },
    /// The message was not accepted.
    Failed(DeliveryFailure),
}

/// Outcome of delivering the alert to one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    /// Contact the send targeted.
    pub contact: ContactRef,
    /// Terminal state reached.
    pub status: DeliveryStatus,
}

impl DeliveryResult {
    /// Whether the provider accepted the message.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self.status, DeliveryStatus::Sent { .. })
    }

    /// Failure reason, if the send failed.
    #[must_use]
    pub fn failure(&self) -> Option<&DeliveryFailure> {
        match &self.status {
            DeliveryStatus::Sent { .. } => None,
            DeliveryStatus::Failed(failure) => Some(failure),
        }
    }
}

/// Classification of a completed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchVerdict {
    /// The user had no contact with a phone number; nothing was sent.
    NoReachableContacts,
    /// Every send failed.
    AllFailed,
    /// At least one send succeeded and at least one failed.
    PartialSuccess,
    /// Every send succeeded.
    AllSucceeded,
}

/// Aggregate result of one dispatch.
///
/// ## Invariants
/// - `sent + failed == attempted`
/// - `success() == (sent > 0)`
/// - `attempted == 0` only with [`DispatchVerdict::NoReachableContacts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    attempted: usize,
    sent: usize,
    failed: usize,
    verdict: DispatchVerdict,
    results: Vec<DeliveryResult>,
}

impl DispatchOutcome {
    /// Outcome for a user without reachable contacts.
    #[must_use]
    pub fn no_reachable_contacts() -> Self {
        Self {
            attempted: 0,
            sent: 0,
            failed: 0,
            verdict: DispatchVerdict::NoReachableContacts,
            results: Vec::new(),
        }
    }

    /// Tally terminal results. The results are sorted by contact index so the
    /// outcome is identical for any completion order.
    ///
    /// # Examples
    /// ```
    /// use carefever_backend::domain::{
    ///     ContactRef, DeliveryFailure, DeliveryResult, DeliveryStatus, DispatchOutcome,
    ///     DispatchVerdict, PhoneNumber,
    /// };
    ///
    /// let contact = |index: usize| ContactRef {
    ///     index,
    ///     name: String::new(),
    ///     phone: PhoneNumber::parse("+1555").expect("phone"),
    /// };
    /// let outcome = DispatchOutcome::from_results(vec![
    ///     DeliveryResult {
    ///         contact: contact(1),
    ///         status: DeliveryStatus::Failed(DeliveryFailure::Timeout),
    ///     },
    ///     DeliveryResult {
    ///         contact: contact(0),
    ///         status: DeliveryStatus::Sent { provider_id: "SM1".into() },
    ///     },
    /// ]);
    /// assert_eq!((outcome.attempted(), outcome.sent(), outcome.failed()), (2, 1, 1));
    /// assert_eq!(outcome.verdict(), DispatchVerdict::PartialSuccess);
    /// assert!(outcome.success());
    /// ```
    #[must_use]
    pub fn from_results(mut results: Vec<DeliveryResult>) -> Self {
        if results.is_empty() {
            return Self::no_reachable_contacts();
        }
        results.sort_by_key(|result| result.contact.index);

        let attempted = results.len();
        let sent = results.iter().filter(|result| result.is_sent()).count();
        let failed = attempted - sent;
        let verdict = match (sent, failed) {
            (0, _) => DispatchVerdict::AllFailed,
            (_, 0) => DispatchVerdict::AllSucceeded,
            _ => DispatchVerdict::PartialSuccess,
        };
        Self {
            attempted,
            sent,
            failed,
            verdict,
            results,
        }
    }

    /// Number of reachable contacts a send was issued for.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Number of sends accepted by the provider.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Number of sends that failed or timed out.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Three-way classification of the dispatch.
    #[must_use]
    pub fn verdict(&self) -> DispatchVerdict {
        self.verdict
    }

    /// True when at least one contact was reached.
    #[must_use]
    pub fn success(&self) -> bool {
        self.sent > 0
    }

    /// Per-contact results ordered by contact index.
    #[must_use]
    pub fn results(&self) -> &[DeliveryResult] {
        &self.results
    }

    /// Number of failures caused by the per-send timeout.
    #[must_use]
    pub fn timed_out(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.failure(), Some(DeliveryFailure::Timeout)))
            .count()
    }
}

/// Call-level failures of a dispatch; every other failure is reported inside
/// the [`DispatchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The user identifier does not resolve to a user.
    #[error("user {user_id} not found")]
    UserNotFound {
        /// Identifier that failed to resolve.
        user_id: String,
    },
    /// The contact store could not be read.
    #[error("contact store unavailable: {message}")]
    StoreUnavailable {
        /// Adapter-provided description.
        message: String,
    },
}

impl From<ContactStoreError> for DispatchError {
    fn from(value: ContactStoreError) -> Self {
        match value {
            ContactStoreError::NotFound { user_id } => Self::UserNotFound { user_id },
            ContactStoreError::Unavailable { message } => Self::StoreUnavailable { message },
        }
    }
}

/// Failure of a direct single-recipient SOS send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectSendError {
    /// The send did not finish within the per-send timeout.
    #[error("send timed out")]
    Timeout,
    /// The transport reported a failure.
    #[error(transparent)]
    Provider(#[from] TransportError),
}
