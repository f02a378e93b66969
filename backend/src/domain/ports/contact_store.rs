//! Driven port for reading users and their emergency contacts.
//!
//! The document store owning these records is an external collaborator; the
//! dispatcher only needs a keyed lookup. Adapters must tell "no such user"
//! apart from "storage failed", and return an empty list (not an error) for a
//! user without contacts.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{EmergencyContact, UserId, UserProfile};

define_port_error! {
    /// Errors raised by contact store adapters.
    pub enum ContactStoreError {
        /// The identifier does not resolve to any user record.
        NotFound { user_id: String } =>
            "user {user_id} not found",
        /// The backing store could not be read.
        Unavailable { message: String } =>
            "contact store unavailable: {message}",
    }
}

/// Profile and contacts of one user, read from a single store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContacts {
    /// The user's profile.
    pub profile: UserProfile,
    /// Emergency contacts in stored order.
    pub contacts: Vec<EmergencyContact>,
}

/// Keyed lookup of user records and their emergency contacts.
///
/// Implementations are shared across concurrent dispatches and must not
/// serialise callers per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Load the profile of `user_id`.
    ///
    /// # Errors
    /// [`ContactStoreError::NotFound`] for unknown users,
    /// [`ContactStoreError::Unavailable`] for storage failures.
    async fn find_user(&self, user_id: &UserId) -> Result<UserProfile, ContactStoreError>;

    /// List the user's emergency contacts in stored order.
    ///
    /// # Errors
    /// [`ContactStoreError::NotFound`] for unknown users,
    /// [`ContactStoreError::Unavailable`] for storage failures.
    async fn list_contacts(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EmergencyContact>, ContactStoreError>;

    /// Load the profile and contacts together, from one read of the store.
    ///
    /// Dispatch uses this so a concurrent rewrite cannot pair a profile with
    /// contacts from another version of the record.
    ///
    /// # Errors
    /// As for [`ContactStore::find_user`].
    async fn load_user(&self, user_id: &UserId) -> Result<UserContacts, ContactStoreError>;
}
