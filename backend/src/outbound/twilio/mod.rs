//! Twilio outbound adapter.
//!
//! Thin HTTP implementation of the `MessageTransport` port.

mod config;
mod dto;
mod http_client;

pub use config::{DEFAULT_TWILIO_API_BASE_URL, TwilioConfig, TwilioCredentials, TwilioSender};
pub use http_client::TwilioMessageTransport;
