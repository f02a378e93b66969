//! Serialised form of the contacts document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::ports::UserContacts;
use crate::domain::{EmergencyContact, UserProfile};

/// One user entry of the contacts document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// Emergency contacts in the order the user registered them.
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl UserRecord {
    pub(super) fn profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    pub(super) fn into_user_contacts(self) -> UserContacts {
        UserContacts {
            profile: UserProfile {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            },
            contacts: self.emergency_contacts,
        }
    }
}

/// Top-level document: `{ "users": { "<id>": { ... } } }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ContactsDocumentDto {
    pub(super) users: HashMap<String, UserRecord>,
}
