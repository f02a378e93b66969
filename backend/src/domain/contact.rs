//! Emergency contacts registered by a user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Destination address for a text message.
///
/// ## Invariants
/// - never blank; the value is otherwise kept exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Wrap a stored phone number, returning `None` when it is blank.
    ///
    /// # Examples
    /// ```
    /// use carefever_backend::domain::PhoneNumber;
    ///
    /// assert!(PhoneNumber::parse("+15550100").is_some());
    /// assert!(PhoneNumber::parse("   ").is_none());
    /// ```
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Borrow the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Contact snapshot read from the contact store at alert time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    /// Display name, may be empty.
    pub name: String,
    /// Phone number as entered by the user, may be empty.
    pub phone: String,
    /// Relationship label such as "Sister"; informational only.
    pub relationship: String,
}

impl EmergencyContact {
    /// Phone number to deliver to, if the contact is reachable.
    #[must_use]
    pub fn reachable_phone(&self) -> Option<PhoneNumber> {
        PhoneNumber::parse(self.phone.clone())
    }
}

/// Reachable contact selected for one dispatch.
///
/// `index` is the contact's position in the store's ordering, which lets
/// callers and logs refer to a contact without repeating its phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRef {
    /// Position in the ordered contact list returned by the store.
    pub index: usize,
    /// Contact display name.
    pub name: String,
    /// Destination number.
    pub phone: PhoneNumber,
}

/// Select the reachable contacts, preserving store order and duplicates.
///
/// # Examples
/// ```
/// use carefever_backend::domain::{EmergencyContact, reachable_contacts};
///
/// let contacts = vec![
///     EmergencyContact { phone: "+1555".into(), ..Default::default() },
///     EmergencyContact::default(),
/// ];
/// let reachable = reachable_contacts(&contacts);
/// assert_eq!(reachable.len(), 1);
/// assert_eq!(reachable[0].index, 0);
/// ```
#[must_use]
pub fn reachable_contacts(contacts: &[EmergencyContact]) -> Vec<ContactRef> {
    contacts
        .iter()
        .enumerate()
        .filter_map(|(index, contact)| {
            contact.reachable_phone().map(|phone| ContactRef {
                index,
                name: contact.name.clone(),
                phone,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(phone: &str) -> EmergencyContact {
        EmergencyContact {
            phone: phone.to_owned(),
            ..EmergencyContact::default()
        }
    }

    #[test]
    fn keeps_order_and_duplicate_numbers() {
        let contacts = vec![contact("+1555"), contact(""), contact("+1777"), contact("+1555")];
        let reachable = reachable_contacts(&contacts);

        let indices: Vec<usize> = reachable.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(reachable[2].phone.as_str(), "+1555");
    }

    #[test]
    fn whitespace_only_phone_is_unreachable() {
        assert!(contact(" \t").reachable_phone().is_none());
    }

    #[test]
    fn deserialises_missing_fields_as_empty() {
        let contact: EmergencyContact =
            serde_json::from_str(r#"{"name":"Sam"}"#).expect("decode contact");
        assert_eq!(contact.name, "Sam");
        assert!(contact.phone.is_empty());
        assert!(contact.reachable_phone().is_none());
    }
}
