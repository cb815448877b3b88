use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::{concerts, handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Concerts
        .route(
            "/concerts",
            post(concerts::create_concert).get(concerts::list_concerts),
        )
        .route("/concerts/search", get(concerts::search_concerts))
        .route(
            "/concerts/{id}",
            get(concerts::get_concert)
                .put(concerts::update_concert)
                .delete(concerts::delete_concert),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                )),
        )
        .with_state(state)
}
