//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Maximum accepted upload size (50 MB).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Datasets
        .route("/datasets/upload", post(handlers::upload_dataset))
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets/:id", get(handlers::get_dataset))
        .route("/datasets/:id", delete(handlers::delete_dataset))
        .route("/datasets/:id/stats", get(handlers::get_dataset_stats))
        // Charts
        .route("/charts/:id", get(handlers::get_chart))
        .route("/charts/:id/types", get(handlers::get_chart_types))
        .route("/charts/:id/dashboard", get(handlers::get_dashboard))
        .route("/charts/:id/export", get(handlers::export_chart))
        // Insights
        .route("/insights/:id", get(handlers::get_insights))
        .route("/insights/:id/generate", post(handlers::generate_insights))
        .route("/insights/:id/summary", get(handlers::get_insight_summary))
        .route("/insights/:id/:insight_id", put(handlers::update_insight))
        .route(
            "/insights/:id/:insight_id",
            delete(handlers::delete_insight),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the API server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
