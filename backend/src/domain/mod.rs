//! Domain primitives, services, and ports for SOS alerting.
//!
//! Purpose: keep the alert rules (who is reachable, what the message says,
//! how delivery results aggregate) independent of HTTP, the document store,
//! and the SMS provider. Adapters depend on this module, never the reverse.
//!
//! Public surface:
//! - `AlertDispatcher`: concurrent fan-out of one alert to all contacts.
//! - `AlertMessage`: deterministic alert body.
//! - `DispatchOutcome` / `DispatchError`: aggregate result and call-level
//!   failures.
//! - `Error` / `ErrorCode`: transport-agnostic error payload.

pub mod alert_dispatcher;
pub mod alert_message;
pub mod contact;
pub mod dispatch_outcome;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::alert_dispatcher::{AlertDispatcher, DispatchPolicy};
pub use self::alert_message::AlertMessage;
pub use self::contact::{ContactRef, EmergencyContact, PhoneNumber, reachable_contacts};
pub use self::dispatch_outcome::{
    DeliveryFailure, DeliveryResult, DeliveryStatus, DirectSendError, DispatchError,
    DispatchOutcome, DispatchVerdict,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserProfile, UserValidationError};

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
