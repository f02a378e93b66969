//! Startup settings loaded via OrthoConfig.
//!
//! Values are resolved once in `main` and turned into explicit adapter
//! configuration; nothing below the server layer reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use carefever_backend::domain::DispatchPolicy;
use carefever_backend::outbound::twilio::{
    DEFAULT_TWILIO_API_BASE_URL, TwilioConfig, TwilioCredentials, TwilioSender,
};
use reqwest::Url;

/// Listener and adapter selection.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAREFEVER")]
pub struct ServerSettings {
    /// TCP port bound on all interfaces.
    #[ortho_config(default = 8000)]
    pub port: u16,
    /// JSON document holding users and their emergency contacts.
    pub contacts_path: Option<PathBuf>,
    /// Log messages instead of sending them when Twilio is not configured.
    ///
    /// Optional so an absent CLI flag leaves the environment value in force.
    pub allow_dry_run: Option<bool>,
}

impl ServerSettings {
    /// Whether the logging transport may stand in for Twilio.
    pub fn dry_run_allowed(&self) -> bool {
        self.allow_dry_run.unwrap_or(false)
    }
}

/// Per-dispatch limits.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOS")]
pub struct DispatchSettings {
    /// Upper bound for one send, in milliseconds.
    #[ortho_config(default = 10_000)]
    pub send_timeout_ms: u64,
    /// Maximum sends in flight for one dispatch.
    #[ortho_config(default = 16)]
    pub max_in_flight: usize,
}

impl DispatchSettings {
    /// Per-send timeout as a [`Duration`].
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Policy handed to the dispatcher.
    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            send_timeout: self.send_timeout(),
            max_in_flight: self.max_in_flight.max(1),
        }
    }
}

/// Twilio account and sender identity.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TWILIO")]
pub struct TwilioSettings {
    /// Account SID.
    pub account_sid: Option<String>,
    /// Auth token paired with the account SID.
    pub auth_token: Option<String>,
    /// Sending phone number.
    pub from_number: Option<String>,
    /// Messaging service used when no sending number is configured.
    pub messaging_service_sid: Option<String>,
    /// API root override, mainly for tests against a local stub.
    pub api_base_url: Option<String>,
}

impl std::fmt::Debug for TwilioSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("from_number", &self.from_number)
            .field("messaging_service_sid", &self.messaging_service_sid)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Errors raised while resolving Twilio settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TwilioSettingsError {
    /// Only one of the account SID and auth token was supplied.
    #[error("TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set together")]
    IncompleteCredentials,
    /// Neither a sending number nor a messaging service was supplied.
    #[error("set TWILIO_FROM_NUMBER or TWILIO_MESSAGING_SERVICE_SID")]
    MissingSender,
    /// The API base URL override did not parse.
    #[error("invalid TWILIO_API_BASE_URL: {0}")]
    InvalidBaseUrl(String),
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|text| !text.trim().is_empty())
}

impl TwilioSettings {
    /// Resolve into transport configuration.
    ///
    /// Returns `Ok(None)` when no credentials are configured at all.
    ///
    /// # Errors
    /// Partial credentials, a missing sender, or a malformed base URL.
    pub fn resolve(
        &self,
        request_timeout: Duration,
    ) -> Result<Option<TwilioConfig>, TwilioSettingsError> {
        let (account_sid, auth_token) = match (
            non_blank(self.account_sid.as_ref()),
            non_blank(self.auth_token.as_ref()),
        ) {
            (None, None) => return Ok(None),
            (Some(sid), Some(token)) => (sid, token),
            _ => return Err(TwilioSettingsError::IncompleteCredentials),
        };

        let sender = match (
            non_blank(self.from_number.as_ref()),
            non_blank(self.messaging_service_sid.as_ref()),
        ) {
            (Some(number), _) => TwilioSender::FromNumber(number.to_owned()),
            (None, Some(service)) => TwilioSender::MessagingService(service.to_owned()),
            (None, None) => return Err(TwilioSettingsError::MissingSender),
        };

        let base = non_blank(self.api_base_url.as_ref()).unwrap_or(DEFAULT_TWILIO_API_BASE_URL);
        let api_base_url =
            Url::parse(base).map_err(|err| TwilioSettingsError::InvalidBaseUrl(err.to_string()))?;

        Ok(Some(TwilioConfig {
            credentials: TwilioCredentials::new(account_sid, auth_token),
            sender,
            api_base_url,
            request_timeout,
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and resolution.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const SERVER_VARS: [&str; 3] = [
        "CAREFEVER_PORT",
        "CAREFEVER_CONTACTS_PATH",
        "CAREFEVER_ALLOW_DRY_RUN",
    ];

    fn args() -> [OsString; 1] {
        [OsString::from("carefever-backend")]
    }

    fn twilio(sid: Option<&str>, token: Option<&str>, from: Option<&str>) -> TwilioSettings {
        TwilioSettings {
            account_sid: sid.map(str::to_owned),
            auth_token: token.map(str::to_owned),
            from_number: from.map(str::to_owned),
            messaging_service_sid: None,
            api_base_url: None,
        }
    }

    #[rstest]
    fn server_defaults_apply_when_unset() {
        let _guard = lock_env(SERVER_VARS.map(|name| (name, None::<String>)));

        let settings = ServerSettings::load_from_iter(args()).expect("config should load");
        assert_eq!(settings.port, 8000);
        assert!(settings.contacts_path.is_none());
        assert_eq!(settings.allow_dry_run, None);
        assert!(!settings.dry_run_allowed());
    }

    #[rstest]
    fn server_environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CAREFEVER_PORT", Some("9100".to_owned())),
            ("CAREFEVER_CONTACTS_PATH", Some("/srv/contacts.json".to_owned())),
            ("CAREFEVER_ALLOW_DRY_RUN", Some("true".to_owned())),
        ]);

        let settings = ServerSettings::load_from_iter(args()).expect("config should load");
        assert_eq!(settings.port, 9100);
        assert_eq!(
            settings.contacts_path,
            Some(PathBuf::from("/srv/contacts.json"))
        );
        assert_eq!(settings.allow_dry_run, Some(true));
        assert!(settings.dry_run_allowed());
    }

    #[rstest]
    fn dispatch_settings_map_to_policy() {
        let _guard = lock_env([
            ("SOS_SEND_TIMEOUT_MS", Some("2500".to_owned())),
            ("SOS_MAX_IN_FLIGHT", None::<String>),
        ]);

        let settings = DispatchSettings::load_from_iter(args()).expect("config should load");
        let policy = settings.policy();
        assert_eq!(policy.send_timeout, Duration::from_millis(2500));
        assert_eq!(policy.max_in_flight, 16);
    }

    #[test]
    fn zero_in_flight_is_clamped() {
        let settings = DispatchSettings {
            send_timeout_ms: 10,
            max_in_flight: 0,
        };
        assert_eq!(settings.policy().max_in_flight, 1);
    }

    #[test]
    fn no_credentials_resolve_to_none() {
        let resolved = twilio(None, None, Some("+1555"))
            .resolve(Duration::from_secs(1))
            .expect("resolves");
        assert!(resolved.is_none());
    }

    #[rstest]
    #[case::sid_only(twilio(Some("AC1"), None, Some("+1555")), TwilioSettingsError::IncompleteCredentials)]
    #[case::blank_token(twilio(Some("AC1"), Some(" "), Some("+1555")), TwilioSettingsError::IncompleteCredentials)]
    #[case::no_sender(twilio(Some("AC1"), Some("tok"), None), TwilioSettingsError::MissingSender)]
    fn incomplete_settings_are_rejected(
        #[case] settings: TwilioSettings,
        #[case] expected: TwilioSettingsError,
    ) {
        let err = settings
            .resolve(Duration::from_secs(1))
            .expect_err("should fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn messaging_service_is_used_without_from_number() {
        let mut settings = twilio(Some("AC1"), Some("tok"), None);
        settings.messaging_service_sid = Some("MG9".to_owned());

        let config = settings
            .resolve(Duration::from_secs(3))
            .expect("resolves")
            .expect("configured");
        assert_eq!(config.sender, TwilioSender::MessagingService("MG9".to_owned()));
        assert_eq!(config.api_base_url.as_str(), "https://api.twilio.com/");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut settings = twilio(Some("AC1"), Some("tok"), Some("+1555"));
        settings.api_base_url = Some("not a url".to_owned());

        let err = settings
            .resolve(Duration::from_secs(1))
            .expect_err("bad url");
        assert!(matches!(err, TwilioSettingsError::InvalidBaseUrl(_)));
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", twilio(Some("AC1"), Some("s3cret"), None));
        assert!(!rendered.contains("s3cret"));
    }
}
