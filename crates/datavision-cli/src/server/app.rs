//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Ingestion
        .route("/upload", post(handlers::upload))
        // Registry
        .route("/datasets", get(handlers::list_datasets))
        .route(
            "/datasets/:id",
            get(handlers::get_dataset).delete(handlers::delete_dataset),
        )
        // Queries
        .route("/calculate", post(handlers::calculate))
        .route("/aggregate", post(handlers::aggregate))
        .route("/compare-datasets", post(handlers::compare_datasets));

    Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::banner)
        .layer(DefaultBodyLimit::max(state.upload_limit))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(
    state: AppState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    log::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
