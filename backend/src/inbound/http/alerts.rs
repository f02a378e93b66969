//! SOS alert HTTP handlers.
//!
//! ```text
//! POST /api/alerts/sos
//! POST /api/sos/send
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{DirectSosRequest, SosAlertRequest, TransportError};
use crate::domain::{DirectSendError, DispatchError, DispatchOutcome, DispatchVerdict, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_phone, parse_user_id};

const USER_ID_FIELD: FieldName = FieldName::new("userId");
const PHONE_FIELD: FieldName = FieldName::new("phone");

/// Request payload for alerting a user's emergency contacts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SosAlertRequestBody {
    /// User in distress.
    #[schema(example = "user_2abc")]
    pub user_id: Option<String>,
    /// Free-form location, forwarded verbatim into the alert.
    #[schema(example = "https://maps.google.com/?q=51.5,-0.12")]
    pub location_text: Option<String>,
}

/// Aggregate delivery counts for an accepted alert.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SosAlertResponse {
    /// Always `true`; failures use the error envelope.
    pub success: bool,
    /// Messages accepted by the provider.
    pub sent: usize,
    /// Messages that failed or timed out.
    pub failed: usize,
}

/// Request payload for a single direct SOS message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectSosRequestBody {
    /// Recipient phone number.
    #[schema(example = "+15550100")]
    pub phone: Option<String>,
    /// Message body; a default SOS text is used when omitted.
    pub message: Option<String>,
}

/// Provider acknowledgement for a direct SOS message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectSosResponse {
    /// Always `true`; failures use the error envelope.
    pub success: bool,
    /// Provider message identifier.
    pub sid: String,
}

/// JSON extractor configuration rejecting malformed bodies with the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

fn map_dispatch_error(error: DispatchError) -> Error {
    match error {
        DispatchError::UserNotFound { user_id } => {
            Error::not_found("User not found").with_details(json!({ "userId": user_id }))
        }
        DispatchError::StoreUnavailable { message } => {
            tracing::error!(%message, "contact store unavailable during dispatch");
            Error::store_unavailable("Failed to load emergency contacts")
        }
    }
}

fn outcome_response(outcome: &DispatchOutcome) -> ApiResult<SosAlertResponse> {
    match outcome.verdict() {
        DispatchVerdict::NoReachableContacts => {
            Err(Error::no_reachable_contacts("No emergency contacts found"))
        }
        DispatchVerdict::AllFailed => Err(Error::delivery_failed(
            "Failed to send SOS to all contacts",
        )
        .with_details(json!({
            "attempted": outcome.attempted(),
            "failed": outcome.failed(),
            "timedOut": outcome.timed_out(),
        }))),
        DispatchVerdict::PartialSuccess | DispatchVerdict::AllSucceeded => Ok(SosAlertResponse {
            success: true,
            sent: outcome.sent(),
            failed: outcome.failed(),
        }),
    }
}

fn map_direct_error(error: DirectSendError) -> Error {
    match error {
        DirectSendError::Timeout | DirectSendError::Provider(TransportError::Timeout { .. }) => {
            Error::delivery_timeout("SOS message timed out")
        }
        DirectSendError::Provider(other) => {
            Error::delivery_failed("Failed to send SOS").with_details(json!({
                "reason": other.to_string(),
            }))
        }
    }
}

/// Alert every emergency contact of a user.
#[utoipa::path(
    post,
    path = "/api/alerts/sos",
    description = "Send an SOS text to each emergency contact with a phone number.",
    request_body = SosAlertRequestBody,
    responses(
        (status = 200, description = "At least one contact was reached", body = SosAlertResponse),
        (status = 400, description = "Missing userId or no reachable contacts", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Store failure or every send failed", body = ErrorSchema)
    ),
    tags = ["alerts"],
    operation_id = "sendSosAlert"
)]
#[post("/alerts/sos")]
pub async fn send_sos_alert(
    state: web::Data<HttpState>,
    payload: web::Json<SosAlertRequestBody>,
) -> ApiResult<HttpResponse> {
    let SosAlertRequestBody {
        user_id,
        location_text,
    } = payload.into_inner();
    let user_id = parse_user_id(user_id, USER_ID_FIELD)?;

    let outcome = state
        .alerts
        .dispatch(SosAlertRequest {
            user_id,
            location_text,
        })
        .await
        .map_err(map_dispatch_error)?;

    Ok(HttpResponse::Ok().json(outcome_response(&outcome)?))
}

/// Send one SOS message to an explicit number.
#[utoipa::path(
    post,
    path = "/api/sos/send",
    request_body = DirectSosRequestBody,
    responses(
        (status = 200, description = "Message accepted", body = DirectSosResponse),
        (status = 400, description = "Missing phone", body = ErrorSchema),
        (status = 500, description = "Provider failure", body = ErrorSchema),
        (status = 504, description = "Provider timed out", body = ErrorSchema)
    ),
    tags = ["alerts"],
    operation_id = "sendDirectSos"
)]
#[post("/sos/send")]
pub async fn send_direct_sos(
    state: web::Data<HttpState>,
    payload: web::Json<DirectSosRequestBody>,
) -> ApiResult<HttpResponse> {
    let DirectSosRequestBody { phone, message } = payload.into_inner();
    let phone = parse_phone(phone, PHONE_FIELD)?;

    let receipt = state
        .alerts
        .send_direct(DirectSosRequest { phone, message })
        .await
        .map_err(map_direct_error)?;

    Ok(HttpResponse::Ok().json(DirectSosResponse {
        success: true,
        sid: receipt.provider_id,
    }))
}

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod tests;
