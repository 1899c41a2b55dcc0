use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::error::ErrorResponse;
use super::api::pointing::{PointingRequest, ReloadResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::pointing::compute,
        super::api::pointing::current,
        super::api::pointing::reload_feed,
    ),
    components(
        schemas(
            PointingRequest,
            ReloadResponse,
            ErrorResponse,
            crate::report::PointingReport,
            crate::pointing::PointingResult,
            crate::pointing::AnnotatedObject,
            crate::pointing::ObjectPosition,
            crate::pointing::ObjectRecord,
            crate::pointing::BinCount,
            crate::pointing::DirectionBin,
            crate::pointing::GeoPoint,
            crate::pointing::Observer,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sat-Pointer API",
        description = "Antenna pointing toward the densest cluster of nearby satellites",
        version = "0.1.0"
    ),
    tags(
        (name = "pointing", description = "Pointing computation")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
