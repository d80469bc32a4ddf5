//! Application setup and server configuration.

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::bearer_auth_middleware;
use crate::server::routes::{health_handler, search_handler};

/// Build the Axum application router
///
/// `/search_bills` requires the bearer token; `/health` is public.
pub fn build_app(deps: ServerDeps) -> Router {
    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let api_key = deps.api_key.clone();

    let protected = Router::new()
        .route("/search_bills", post(search_handler))
        .layer(middleware::from_fn(move |req, next| {
            bearer_auth_middleware(api_key.clone(), req, next)
        }));

    Router::new()
        .merge(protected)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(deps))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
