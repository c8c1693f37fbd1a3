//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer token security scheme.
//! Swagger UI serves it in debug builds; `openapi-dump` prints it.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::metrics::RecordMetricRequest;
use crate::inbound::http::schemas::{
    AirQualitySchema, BuzzerActivationSchema, BuzzerStateSchema, ErrorCodeSchema, ErrorSchema,
    MetricSchema, TelemetrySnapshotSchema,
};

/// Security scheme name referenced by authenticated paths.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("HS256 token carrying a userId claim."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ecoband backend API",
        description = "Per-user metric storage, scored live telemetry and buzzer control for the green band."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::metrics::latest_metric,
        crate::inbound::http::metrics::record_metric,
        crate::inbound::http::metrics::metric_history,
        crate::inbound::http::telemetry::latest_telemetry,
        crate::inbound::http::telemetry::telemetry_history,
        crate::inbound::http::telemetry::find_band,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MetricSchema,
        AirQualitySchema,
        RecordMetricRequest,
        TelemetrySnapshotSchema,
        BuzzerStateSchema,
        BuzzerActivationSchema,
    )),
    tags(
        (name = "metrics", description = "Stored per-user sensor snapshots"),
        (name = "telemetry", description = "Live vendor readings and the buzzer"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
