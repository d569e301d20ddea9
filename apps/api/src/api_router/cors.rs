use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use baixas_core::AppError;
use tower_http::cors::{Any, CorsLayer};

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

pub(super) fn build_cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer, AppError> {
    let Some(frontend_url) = frontend_url else {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers([CONTENT_TYPE]));
    };

    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE]))
}
