//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **contacts**: in-memory and JSON-document implementations of
//!   `ContactStore`
//! - **twilio**: reqwest-backed `MessageTransport`
//! - **dry_run**: `MessageTransport` that only logs
//!
//! Adapters are thin translators between domain types and wire or storage
//! representations. They contain no alerting rules.

pub mod contacts;
pub mod dry_run;
pub mod twilio;
