//! In-memory contact store.
//!
//! Records are fixed at construction, so lookups never fail for storage
//! reasons. Used by tests and as the fallback when no contacts document is
//! configured.

use std::collections::HashMap;

use async_trait::async_trait;

use super::UserRecord;
use crate::domain::ports::{ContactStore, ContactStoreError, UserContacts};
use crate::domain::{EmergencyContact, UserId, UserProfile};

/// Immutable map of user records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    users: HashMap<UserId, UserRecord>,
}

impl InMemoryContactStore {
    /// Build a store from `(user id, record)` pairs.
    ///
    /// # Examples
    /// ```
    /// use carefever_backend::domain::UserId;
    /// use carefever_backend::outbound::contacts::{InMemoryContactStore, UserRecord};
    ///
    /// let store = InMemoryContactStore::new([(
    ///     UserId::new("u1").expect("user id"),
    ///     UserRecord::default(),
    /// )]);
    /// assert_eq!(store.len(), 1);
    /// ```
    pub fn new(records: impl IntoIterator<Item = (UserId, UserRecord)>) -> Self {
        Self {
            users: records.into_iter().collect(),
        }
    }

    /// Add or replace one user record.
    #[must_use]
    pub fn with_user(mut self, user_id: UserId, record: UserRecord) -> Self {
        self.users.insert(user_id, record);
        self
    }

    /// Number of users held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn record(&self, user_id: &UserId) -> Result<&UserRecord, ContactStoreError> {
        self.users
            .get(user_id)
            .ok_or_else(|| ContactStoreError::not_found(user_id.to_string()))
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_user(&self, user_id: &UserId) -> Result<UserProfile, ContactStoreError> {
        self.record(user_id).map(UserRecord::profile)
    }

    async fn list_contacts(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EmergencyContact>, ContactStoreError> {
        self.record(user_id)
            .map(|record| record.emergency_contacts.clone())
    }

    async fn load_user(&self, user_id: &UserId) -> Result<UserContacts, ContactStoreError> {
        self.record(user_id).map(|record| record.clone().into_user_contacts())
    }
}
