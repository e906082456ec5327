use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod blog;
pub mod bookings;
pub mod cars;
pub mod documents;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod state;

pub use state::AppState;

use middleware::{actor_middleware, admin_area_middleware, rate_limit_middleware};

// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .route("/health", get(health))
        .merge(cars::routes())
        .merge(blog::routes());

    let authenticated = Router::new()
        .merge(profile::routes())
        .merge(bookings::routes())
        .merge(documents::routes())
        .route_layer(from_fn_with_state(state.clone(), actor_middleware));

    // Layers run bottom-up: actor resolution first, then the admin-area gate
    let admin = admin::routes()
        .route_layer(from_fn(admin_area_middleware))
        .route_layer(from_fn_with_state(state.clone(), actor_middleware));

    // Stored documents, at the path their public URLs point to
    let uploads = ServeDir::new(&state.storage.root);
    let public = match state.storage.mount_path() {
        Some(path) => public.nest_service(&path, uploads),
        None => public.fallback_service(uploads),
    };

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .layer(DefaultBodyLimit::max(state.storage.max_upload_bytes + MULTIPART_OVERHEAD))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
