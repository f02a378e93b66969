//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::SosAlertCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub alerts: Arc<dyn SosAlertCommand>,
}

impl HttpState {
    /// Construct state from the alert use-case.
    pub fn new(alerts: Arc<dyn SosAlertCommand>) -> Self {
        Self { alerts }
    }
}
