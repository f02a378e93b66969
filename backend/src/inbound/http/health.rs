//! Probe endpoints for the SOS service.
//!
//! Readiness flips once the alert dispatcher and its adapters are wired into
//! the listener; liveness only reports that the process still answers HTTP.
//! Both responses are uncacheable so a proxy never masks a restart.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Readiness of the alert pipeline.
#[derive(Debug, Default)]
pub struct HealthState {
    alerts_wired: AtomicBool,
}

impl HealthState {
    /// Create a state that reports not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the dispatcher is wired and alerts can be accepted.
    pub fn mark_ready(&self) {
        self.alerts_wired.store(true, Ordering::Release);
    }

    /// Whether alerts can be accepted.
    pub fn is_ready(&self) -> bool {
        self.alerts_wired.load(Ordering::Acquire)
    }
}

fn probe_response(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 once alerts can be dispatched, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Alert pipeline is wired"),
        (status = 503, description = "Alert pipeline is not wired yet")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready())
}

/// Liveness probe: 200 whenever the process answers.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses((status = 200, description = "Process is answering requests"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    probe_response(true)
}
