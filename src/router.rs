use crate::handlers::{
    actions::dispatch_action,
    files::{close_file, create_file, get_file, get_file_schedule, get_files, reconcile_file},
    health::health_check,
    portfolio::get_portfolio,
    transactions::{add_transaction, delete_transaction, get_file_transactions, update_transaction},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Loan files
        .route("/api/v1/files", get(get_files).post(create_file))
        .route("/api/v1/files/:file_id", get(get_file))
        .route("/api/v1/files/:file_id/close", post(close_file))
        .route("/api/v1/files/:file_id/schedule", get(get_file_schedule))
        .route("/api/v1/files/:file_id/reconcile", post(reconcile_file))
        // Repayments
        .route(
            "/api/v1/files/:file_id/transactions",
            get(get_file_transactions).post(add_transaction),
        )
        .route(
            "/api/v1/transactions/:transaction_id",
            put(update_transaction).delete(delete_transaction),
        )
        // Dashboard and action dispatch
        .route("/api/v1/portfolio", get(get_portfolio))
        .route("/api/v1/actions", post(dispatch_action))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
