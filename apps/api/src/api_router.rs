use axum::Router;
use axum::routing::{delete, get, post};
use baixas_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Result<Router, AppError> {
    let company_history_routes = Router::new()
        .route(
            "/api/v1/empresa/{company_id}/historico_baixas",
            post(handlers::write_off_history::create_write_off_record_handler),
        )
        .route(
            "/api/v1/empresa/{company_id}/historico_baixas/config",
            get(handlers::write_off_history::retention_config_handler)
                .post(handlers::write_off_history::save_retention_config_handler),
        )
        .route(
            "/api/v1/empresa/{company_id}/historico_baixas/leitura",
            post(handlers::write_off_history::query_write_off_records_handler),
        )
        .route(
            "/api/v1/empresa/{company_id}/historico_baixas/{record_id}",
            get(handlers::write_off_history::get_write_off_record_handler)
                .delete(handlers::write_off_history::delete_write_off_record_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/v1/historico_baixas",
            delete(handlers::write_off_history::delete_all_write_off_records_handler),
        )
        .merge(company_history_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
