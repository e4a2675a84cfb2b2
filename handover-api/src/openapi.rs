//! OpenAPI Specification for HANDOVER API

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{change_duty, health};
use handover_core::{ChangeDutyResponse, Role};

/// OpenAPI document for HANDOVER API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HANDOVER API",
        version = "0.1.0",
        description = "Caregiver shift handovers with resolved client, caregiver and user names",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Change Duties", description = "Caregiver shift handover listing"),
        (name = "Health", description = "Liveness and readiness checks"),
    ),
    paths(
        change_duty::list_change_duties,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        ChangeDutyResponse,
        Role,
        ApiError,
        ErrorCode,
        health::HealthResponse,
        health::HealthStatus,
        health::HealthDetails,
        health::ComponentHealth,
    ))
)]
pub struct ApiDoc;
