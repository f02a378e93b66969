//! Reqwest-backed Twilio message transport.
//!
//! This adapter owns transport details only: form encoding, basic auth, and
//! mapping HTTP outcomes onto [`TransportError`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::config::{TwilioConfig, TwilioCredentials, TwilioSender};
use super::dto::{ApiErrorDto, MessageResourceDto};
use crate::domain::PhoneNumber;
use crate::domain::ports::{MessageReceipt, MessageTransport, TransportError};

/// Sends one SMS per call through the Twilio Messages API.
pub struct TwilioMessageTransport {
    client: Client,
    messages_url: Url,
    credentials: TwilioCredentials,
    sender: TwilioSender,
}

impl TwilioMessageTransport {
    /// Build a transport from resolved configuration.
    /// ```rust,ignore
    /// let transport = TwilioMessageTransport::new(config)?;
    /// ```
    /// # Errors
    ///
    /// Returns [`TransportError::Configuration`] when the endpoint cannot be
    /// derived from the base URL or the reqwest client cannot be built.
    pub fn new(config: TwilioConfig) -> Result<Self, TransportError> {
        let messages_url = config.messages_url().map_err(|err| {
            TransportError::configuration(format!("invalid Twilio base URL: {err}"))
        })?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| TransportError::configuration(err.to_string()))?;
        Ok(Self {
            client,
            messages_url,
            credentials: config.credentials,
            sender: config.sender,
        })
    }
}

#[async_trait]
impl MessageTransport for TwilioMessageTransport {
    async fn send_text(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageReceipt, TransportError> {
        let (sender_field, sender_value) = self.sender.form_field();
        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(
                self.credentials.account_sid(),
                Some(self.credentials.auth_token()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("To", to.as_str()), ("Body", body), (sender_field, sender_value)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let payload = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, payload.as_ref()));
        }
        parse_receipt(payload.as_ref())
    }
}

fn parse_receipt(body: &[u8]) -> Result<MessageReceipt, TransportError> {
    let decoded: MessageResourceDto = serde_json::from_slice(body).map_err(|error| {
        TransportError::transport(format!("invalid Twilio message payload: {error}"))
    })?;
    Ok(MessageReceipt::new(decoded.sid))
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransportError {
    let detail = serde_json::from_slice::<ApiErrorDto>(body)
        .ok()
        .and_then(|dto| match (dto.code, dto.message) {
            (Some(code), Some(message)) => Some(format!("{message} (code {code})")),
            (None, Some(message)) => Some(message),
            _ => None,
        })
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => TransportError::rate_limited(message),
        _ if status.is_client_error() => TransportError::rejected(status.as_u16(), message),
        _ => TransportError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
