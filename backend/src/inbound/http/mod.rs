//! HTTP inbound adapter exposing REST endpoints.

pub mod alerts;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` scope with the alert endpoints.
///
/// Callers supply [`state::HttpState`] as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(alerts::json_config())
            .service(alerts::send_sos_alert)
            .service(alerts::send_direct_sos),
    );
}
