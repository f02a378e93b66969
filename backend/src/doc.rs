//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the alert and health endpoints together with the
//! request/response payloads and the error envelope schemas
//! ([`ErrorSchema`], [`ErrorCodeSchema`]). The document is served at
//! `/api-docs/openapi.json`; Swagger UI is mounted in debug builds only.

use crate::inbound::http::alerts::{
    DirectSosRequestBody, DirectSosResponse, SosAlertRequestBody, SosAlertResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CareFever SOS API",
        description = "Emergency alert fan-out to a user's registered contacts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::alerts::send_sos_alert,
        crate::inbound::http::alerts::send_direct_sos,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SosAlertRequestBody,
        SosAlertResponse,
        DirectSosRequestBody,
        DirectSosResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "alerts", description = "SOS alert delivery"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        for field in ["success", "code", "message"] {
            assert_object_schema_has_field(error_schema, field);
        }
    }

    #[test]
    fn openapi_registers_alert_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/alerts/sos", "/api/sos/send", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_alert_request_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let request = schemas.get("SosAlertRequestBody").expect("request schema");

        assert_object_schema_has_field(request, "userId");
        assert_object_schema_has_field(request, "locationText");
    }
}
