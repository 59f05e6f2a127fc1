use crate::error::ErrorResponse;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API Documentation
///
/// Paths are collected from the routers in [`crate::routes`].
#[derive(OpenApi)]
#[openapi(
    components(schemas(ErrorResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Catalog", description = "Units and their semester offerings"),
        (name = "Courses", description = "Courses and the units students in them may take"),
        (name = "Enrollments", description = "Enrollment requests, approvals and results"),
        (name = "Transcripts", description = "Academic records and GPA"),
        (name = "Notifications", description = "In-app notifications"),
    ),
    info(
        title = "Enrollment API",
        version = "1.0.0",
        description = "University unit enrollment API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
