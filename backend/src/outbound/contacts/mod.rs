//! Contact store adapters.
//!
//! Both adapters serve the same record shape: a user's profile fields plus
//! the ordered `emergencyContacts` list, keyed by user id, mirroring the
//! document-store layout the profile subsystem writes.

mod dto;
mod in_memory;
mod json_document;

pub use dto::UserRecord;
pub use in_memory::InMemoryContactStore;
pub use json_document::JsonDocumentContactStore;
