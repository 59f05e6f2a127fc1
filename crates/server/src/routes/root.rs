use axum::http::StatusCode;

const BANNER: &str = concat!("enrollment-server ", env!("CARGO_PKG_VERSION"));

/// Names the running service and its version
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (StatusCode::OK, BANNER)
}
