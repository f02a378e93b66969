//! User identity as seen by the alert dispatcher.
//!
//! Profiles are owned by the profile subsystem; the dispatcher only reads
//! them to derive the name shown in an alert.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned when constructing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty or whitespace only.
    #[error("user id must not be empty")]
    EmptyId,
}

/// Opaque user identifier issued by the identity provider.
///
/// Only blank identifiers are rejected; anything else is kept byte for byte
/// and left to the contact store to resolve.
///
/// # Examples
/// ```
/// use carefever_backend::domain::UserId;
///
/// let id = UserId::new("user_2abc").expect("valid id");
/// assert_eq!(id.as_ref(), "user_2abc");
/// assert!(UserId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    /// Rejects blank identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Read-only snapshot of the user record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Given name, possibly empty.
    pub first_name: Option<String>,
    /// Family name, possibly empty.
    pub last_name: Option<String>,
    /// Account email, used when no name is recorded.
    pub email: Option<String>,
}

impl UserProfile {
    /// Name to show in alerts: first and last name joined by a space, else the
    /// account email, else `None`.
    ///
    /// # Examples
    /// ```
    /// use carefever_backend::domain::UserProfile;
    ///
    /// let profile = UserProfile {
    ///     first_name: Some("Ada".into()),
    ///     last_name: None,
    ///     email: Some("ada@example.com".into()),
    /// };
    /// assert_eq!(profile.display_name().as_deref(), Some("Ada"));
    /// ```
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let full_name = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|part| non_blank(part.as_deref()))
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return Some(full_name);
        }
        non_blank(self.email.as_deref()).map(str::to_owned)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
