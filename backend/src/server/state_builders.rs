//! Builders selecting adapters from settings and assembling HTTP state.

use std::sync::Arc;

use tracing::{info, warn};

use carefever_backend::domain::AlertDispatcher;
use carefever_backend::domain::ports::{ContactStore, MessageTransport};
use carefever_backend::inbound::http::state::HttpState;
use carefever_backend::outbound::contacts::{InMemoryContactStore, JsonDocumentContactStore};
use carefever_backend::outbound::dry_run::LoggingTransport;
use carefever_backend::outbound::twilio::TwilioMessageTransport;

use super::ServerConfig;
use super::settings::{DispatchSettings, ServerSettings, TwilioSettings};

/// Pick the contact store: the JSON document when configured, otherwise an
/// empty in-memory store that reports every user as unknown.
pub(crate) fn build_contact_store(settings: &ServerSettings) -> Arc<dyn ContactStore> {
    match &settings.contacts_path {
        Some(path) => {
            info!(path = %path.display(), "using JSON contact store");
            Arc::new(JsonDocumentContactStore::new(path.clone()))
        }
        None => {
            warn!("CAREFEVER_CONTACTS_PATH not set; contact store is empty");
            Arc::new(InMemoryContactStore::default())
        }
    }
}

/// Pick the message transport.
///
/// Twilio is used whenever credentials are present. Without credentials the
/// logging transport is used if dry runs are allowed or in debug builds.
///
/// # Errors
/// Returns [`std::io::Error`] for invalid Twilio settings, or when no
/// credentials are configured and dry runs are not permitted.
pub(crate) fn build_transport(
    server: &ServerSettings,
    dispatch: &DispatchSettings,
    twilio: &TwilioSettings,
) -> std::io::Result<Arc<dyn MessageTransport>> {
    let resolved = twilio
        .resolve(dispatch.send_timeout())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    match resolved {
        Some(config) => {
            let transport = TwilioMessageTransport::new(config)
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            info!("using Twilio message transport");
            Ok(Arc::new(transport))
        }
        None if server.dry_run_allowed() || cfg!(debug_assertions) => {
            warn!("Twilio credentials not configured; messages will only be logged (dev only)");
            Ok(Arc::new(LoggingTransport::new()))
        }
        None => Err(std::io::Error::other(
            "Twilio credentials are not configured; set TWILIO_ACCOUNT_SID and \
             TWILIO_AUTH_TOKEN or enable CAREFEVER_ALLOW_DRY_RUN",
        )),
    }
}

/// Wire the dispatcher behind the HTTP state.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let dispatcher = AlertDispatcher::new(
        config.contacts.clone(),
        config.transport.clone(),
        config.policy,
    );
    HttpState::new(Arc::new(dispatcher))
}
