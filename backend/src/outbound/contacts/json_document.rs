//! Contact store backed by a JSON document on disk.
//!
//! The document is re-read on every lookup so edits made by the profile
//! subsystem are visible to the next alert without a restart. `load_user`
//! answers from a single read, so a dispatch never mixes two versions. Read and decode
//! failures surface as [`ContactStoreError::Unavailable`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::UserRecord;
use super::dto::ContactsDocumentDto;
use crate::domain::ports::{ContactStore, ContactStoreError, UserContacts};
use crate::domain::{EmergencyContact, UserId, UserProfile};

/// Reads `{ "users": { "<id>": { ... } } }` from a file.
#[derive(Debug, Clone)]
pub struct JsonDocumentContactStore {
    path: PathBuf,
}

impl JsonDocumentContactStore {
    /// Create a store reading from `path`.
    ///
    /// The file is not opened until the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_record(&self, user_id: &UserId) -> Result<UserRecord, ContactStoreError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|err| {
            ContactStoreError::unavailable(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))
        })?;
        let mut document: ContactsDocumentDto =
            serde_json::from_slice(&raw).map_err(|err| {
                ContactStoreError::unavailable(format!(
                    "failed to decode {}: {err}",
                    self.path.display()
                ))
            })?;
        debug!(
            path = %self.path.display(),
            users = document.users.len(),
            "loaded contacts document"
        );
        let key: &str = user_id.as_ref();
        document
            .users
            .remove(key)
            .ok_or_else(|| ContactStoreError::not_found(user_id.to_string()))
    }
}

#[async_trait]
impl ContactStore for JsonDocumentContactStore {
    async fn find_user(&self, user_id: &UserId) -> Result<UserProfile, ContactStoreError> {
        self.load_record(user_id)
            .await
            .map(|record| record.profile())
    }

    async fn list_contacts(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EmergencyContact>, ContactStoreError> {
        self.load_record(user_id)
            .await
            .map(|record| record.emergency_contacts)
    }

    async fn load_user(&self, user_id: &UserId) -> Result<UserContacts, ContactStoreError> {
        self.load_record(user_id)
            .await
            .map(UserRecord::into_user_contacts)
    }
}
