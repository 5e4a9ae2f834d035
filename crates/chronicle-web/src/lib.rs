//! Chronicle web server.
//!
//! Axum server exposing the submission API the recording userscript posts
//! to, plus a read API over the recorded world.

pub mod auth;
pub mod images;
pub mod routes;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chronicle_db::DbPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use images::HttpImageCache;
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Submission endpoints, one per userscript capture point
        .route("/submit/possessions", post(routes::submit::possessions))
        .route("/submit/location", post(routes::submit::location))
        .route("/submit/setting", post(routes::submit::setting))
        .route("/submit/opportunities", post(routes::submit::opportunities))
        .route("/submit/event/list", post(routes::submit::event_list))
        .route("/submit/event/view", post(routes::submit::event_view))
        .route("/submit/event/outcome", post(routes::submit::event_outcome))
        // Read side
        .route("/locations/{id}", get(routes::locations::get_location))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the web server.
pub async fn run_server(
    db: Arc<DbPool>,
    port: u16,
    image_base_url: String,
    image_cache_dir: PathBuf,
) -> anyhow::Result<()> {
    let images = Arc::new(HttpImageCache::new(image_base_url, image_cache_dir));
    let state = AppState::new(db, images);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Submission API listening on http://127.0.0.1:{}/api", port);

    axum::serve(listener, app).await?;
    Ok(())
}
