//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports ([`ContactStore`], [`MessageTransport`]) describe what the
//! dispatcher needs from infrastructure; the driving port
//! ([`SosAlertCommand`]) is what inbound adapters call. Port errors are
//! strongly typed so adapters map their failures into predictable variants.

mod macros;

mod contact_store;
mod message_transport;
mod sos_alert_command;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use contact_store::MockContactStore;
pub use contact_store::{ContactStore, ContactStoreError, UserContacts};
#[cfg(test)]
pub use message_transport::MockMessageTransport;
pub use message_transport::{MessageReceipt, MessageTransport, TransportError};
#[cfg(test)]
pub use sos_alert_command::MockSosAlertCommand;
pub use sos_alert_command::{
    DEFAULT_DIRECT_SOS_MESSAGE, DirectSosRequest, SosAlertCommand, SosAlertRequest,
};
