//! SOS message composition.
//!
//! The body is a pure function of the sender's name and the optional location
//! text, so identical inputs always produce byte-identical messages.

use std::fmt;

/// Name used in the header when the user has no usable display name.
pub const FALLBACK_DISPLAY_NAME: &str = "CareFever User";
/// Closing call to action appended to every alert.
pub const CLOSING_LINE: &str = "Please reach out immediately.";

const HEADER_PREFIX: &str = "SOS Alert from ";
const LOCATION_PREFIX: &str = "Location: ";

/// Alert body sent to every emergency contact of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    header: String,
    location: Option<String>,
}

impl AlertMessage {
    /// Compose the alert for `display_name`, adding a location line only when
    /// `location_text` is non-empty.
    ///
    /// # Examples
    /// ```
    /// use carefever_backend::domain::AlertMessage;
    ///
    /// let message = AlertMessage::compose(Some("Ada Lovelace"), Some("Ward 4"));
    /// assert_eq!(
    ///     message.body(),
    ///     "SOS Alert from Ada Lovelace\nLocation: Ward 4\nPlease reach out immediately."
    /// );
    ///
    /// let anonymous = AlertMessage::compose(None, None);
    /// assert_eq!(
    ///     anonymous.body(),
    ///     "SOS Alert from CareFever User\nPlease reach out immediately."
    /// );
    /// ```
    #[must_use]
    pub fn compose(display_name: Option<&str>, location_text: Option<&str>) -> Self {
        let name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME);
        Self {
            header: format!("{HEADER_PREFIX}{name}"),
            location: location_text
                .filter(|text| !text.is_empty())
                .map(|text| format!("{LOCATION_PREFIX}{text}")),
        }
    }

    /// Header line naming the sender.
    #[must_use]
    pub fn header(&self) -> &str {
        self.header.as_str()
    }

    /// Location line, when a location was supplied.
    #[must_use]
    pub fn location_line(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Newline-joined message body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        lines.push(self.header.as_str());
        if let Some(location) = self.location.as_deref() {
            lines.push(location);
        }
        lines.push(CLOSING_LINE);
        lines.join("\n")
    }
}

impl fmt::Display for AlertMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body())
    }
}
