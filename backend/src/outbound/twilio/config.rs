//! Connection settings for the Twilio messaging API.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use zeroize::Zeroizing;

/// Public Twilio REST endpoint.
pub const DEFAULT_TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// Sender identity attached to every outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwilioSender {
    /// A Twilio phone number, sent as `From`.
    FromNumber(String),
    /// A messaging service, sent as `MessagingServiceSid`.
    MessagingService(String),
}

impl TwilioSender {
    pub(super) fn form_field(&self) -> (&'static str, &str) {
        match self {
            Self::FromNumber(number) => ("From", number.as_str()),
            Self::MessagingService(sid) => ("MessagingServiceSid", sid.as_str()),
        }
    }
}

/// Account credentials kept out of logs and wiped on drop.
#[derive(Clone)]
pub struct TwilioCredentials {
    account_sid: String,
    auth_token: Zeroizing<String>,
}

impl TwilioCredentials {
    /// Pair an account SID with its auth token.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: Zeroizing::new(auth_token.into()),
        }
    }

    /// Account identifier, also used in the request path.
    #[must_use]
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub(super) fn auth_token(&self) -> &str {
        self.auth_token.as_str()
    }
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Everything the transport needs, resolved before construction.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account credentials.
    pub credentials: TwilioCredentials,
    /// Sender identity.
    pub sender: TwilioSender,
    /// API root, normally [`DEFAULT_TWILIO_API_BASE_URL`].
    pub api_base_url: Url,
    /// Client-side request timeout.
    pub request_timeout: Duration,
}

impl TwilioConfig {
    /// Endpoint for creating messages under the configured account.
    ///
    /// # Errors
    /// Returns an error when the base URL cannot carry a path.
    pub fn messages_url(&self) -> Result<Url, url::ParseError> {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        Url::parse(&format!(
            "{base}/2010-04-01/Accounts/{sid}/Messages.json",
            sid = self.credentials.account_sid()
        ))
    }
}
