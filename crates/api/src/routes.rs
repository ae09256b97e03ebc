use axum::{
    handler::HandlerWithoutStateExt,
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{handlers, rate_limit, security, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    // `/` resolves to index.html; unknown paths get the JSON 404
    let static_files = ServeDir::new(&state.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/balance/:wallet", get(handlers::get_balance))
        .route("/healthcheck", get(handlers::healthcheck))
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn(security::balance_no_cache_middleware))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
