//! SOS alert dispatch service.
//!
//! Loads the user's profile and contacts in one store read, composes the alert once, and delivers it to
//! every reachable contact concurrently. Sends are futures polled by the
//! calling task through a bounded `buffer_unordered` stream: nothing is
//! spawned, so no send outlives the dispatch, and dropping the dispatch future
//! abandons the sends still pending. Each send runs under its own timeout and
//! yields exactly one [`DeliveryResult`]; results are tallied once, after all
//! sends reached a terminal state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::ports::{
    ContactStore, DirectSosRequest, MessageReceipt, MessageTransport, SosAlertCommand,
    SosAlertRequest, UserContacts,
};
use crate::domain::{
    AlertMessage, ContactRef, DeliveryFailure, DeliveryResult, DeliveryStatus, DirectSendError,
    DispatchError, DispatchOutcome, PhoneNumber, UserId, reachable_contacts,
};

/// Default wall-clock bound for one send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of sends in flight per dispatch.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Limits applied to the sends of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Per-send timeout; a send exceeding it is recorded as timed out.
    pub send_timeout: Duration,
    /// Maximum concurrent sends within one dispatch. Zero is treated as one.
    ///
    /// A send's timeout starts when it is admitted, not when the dispatch
    /// starts. With `n` reachable contacts that all hang, a dispatch therefore
    /// takes about `ceil(n / max_in_flight) * send_timeout`; size this above
    /// the expected contact count to keep the bound close to one timeout.
    pub max_in_flight: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            send_timeout: DEFAULT_SEND_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Alert dispatcher implementing [`SosAlertCommand`].
pub struct AlertDispatcher<S: ?Sized, T: ?Sized> {
    contacts: Arc<S>,
    transport: Arc<T>,
    policy: DispatchPolicy,
}

impl<S: ?Sized, T: ?Sized> Clone for AlertDispatcher<S, T> {
    fn clone(&self) -> Self {
        Self {
            contacts: Arc::clone(&self.contacts),
            transport: Arc::clone(&self.transport),
            policy: self.policy,
        }
    }
}

impl<S: ?Sized, T: ?Sized> AlertDispatcher<S, T> {
    /// Create a dispatcher over the given contact store and transport.
    pub fn new(contacts: Arc<S>, transport: Arc<T>, policy: DispatchPolicy) -> Self {
        Self {
            contacts,
            transport,
            policy,
        }
    }

    /// Limits applied to each dispatch.
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }
}

impl<S, T> AlertDispatcher<S, T>
where
    S: ContactStore + ?Sized,
    T: MessageTransport + ?Sized,
{
    /// Alert every reachable emergency contact of `user_id`.
    ///
    /// # Errors
    /// [`DispatchError::UserNotFound`] and [`DispatchError::StoreUnavailable`]
    /// only. Users without reachable contacts yield an outcome with
    /// `attempted == 0`; failed sends are counted in the outcome.
    pub async fn dispatch(
        &self,
        user_id: &UserId,
        location_text: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let UserContacts { profile, contacts } = self.contacts.load_user(user_id).await?;

        let reachable = reachable_contacts(&contacts);
        if reachable.is_empty() {
            info!(
                user_id = %user_id,
                stored_contacts = contacts.len(),
                "no reachable emergency contacts"
            );
            return Ok(DispatchOutcome::no_reachable_contacts());
        }

        let body = AlertMessage::compose(profile.display_name().as_deref(), location_text).body();
        let results: Vec<DeliveryResult> = stream::iter(reachable)
            .map(|contact| self.deliver(contact, &body))
            .buffer_unordered(self.policy.max_in_flight.max(1))
            .collect()
            .await;

        let outcome = DispatchOutcome::from_results(results);
        info!(
            user_id = %user_id,
            attempted = outcome.attempted(),
            sent = outcome.sent(),
            failed = outcome.failed(),
            timed_out = outcome.timed_out(),
            verdict = ?outcome.verdict(),
            "sos dispatch finished"
        );
        Ok(outcome)
    }

    /// Send one SOS message to an explicit number.
    ///
    /// # Errors
    /// [`DirectSendError::Timeout`] when the send exceeds the per-send
    /// timeout, [`DirectSendError::Provider`] for transport failures.
    pub async fn send_direct(
        &self,
        request: &DirectSosRequest,
    ) -> Result<MessageReceipt, DirectSendError> {
        self.send_bounded(&request.phone, request.body())
            .await
            .map_err(|failure| match failure {
                DeliveryFailure::Timeout => DirectSendError::Timeout,
                DeliveryFailure::Provider(err) => DirectSendError::Provider(err),
            })
    }

    async fn deliver(&self, contact: ContactRef, body: &str) -> DeliveryResult {
        let status = match self.send_bounded(&contact.phone, body).await {
            Ok(receipt) => DeliveryStatus::Sent {
                provider_id: receipt.provider_id,
            },
            Err(failure) => {
                warn!(contact_index = contact.index, reason = %failure, "sos send failed");
                DeliveryStatus::Failed(failure)
            }
        };
        DeliveryResult { contact, status }
    }

    async fn send_bounded(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageReceipt, DeliveryFailure> {
        match tokio::time::timeout(self.policy.send_timeout, self.transport.send_text(to, body))
            .await
        {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) if err.is_timeout() => Err(DeliveryFailure::Timeout),
            Ok(Err(err)) => Err(DeliveryFailure::Provider(err)),
            Err(_elapsed) => Err(DeliveryFailure::Timeout),
        }
    }
}

#[async_trait]
impl<S, T> SosAlertCommand for AlertDispatcher<S, T>
where
    S: ContactStore + ?Sized,
    T: MessageTransport + ?Sized,
{
    async fn dispatch(&self, request: SosAlertRequest) -> Result<DispatchOutcome, DispatchError> {
        AlertDispatcher::dispatch(self, &request.user_id, request.location_text.as_deref()).await
    }

    async fn send_direct(
        &self,
        request: DirectSosRequest,
    ) -> Result<MessageReceipt, DirectSendError> {
        AlertDispatcher::send_direct(self, &request).await
    }
}

#[cfg(test)]
#[path = "alert_dispatcher_tests.rs"]
mod tests;
