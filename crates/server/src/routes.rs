//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        // Exercises and their sets
        .route(
            "/api/exercises",
            get(handlers::list_exercises).post(handlers::create_exercise),
        )
        .route(
            "/api/exercises/{id}",
            get(handlers::get_exercise)
                .put(handlers::update_exercise)
                .delete(handlers::delete_exercise),
        )
        .route(
            "/api/exercises/{id}/sets",
            get(handlers::list_sets).post(handlers::add_set),
        )
        // Routines and membership
        .route(
            "/api/routines",
            get(handlers::list_routines).post(handlers::create_routine),
        )
        .route(
            "/api/routines/{id}",
            get(handlers::get_routine)
                .put(handlers::update_routine)
                .delete(handlers::delete_routine),
        )
        .route(
            "/api/routines/{id}/exercises",
            get(handlers::list_routine_exercises).post(handlers::add_routine_exercise),
        )
        .route(
            "/api/routines/{id}/exercises/{exercise_id}",
            delete(handlers::remove_routine_exercise),
        )
        // Series log
        .route(
            "/api/series",
            get(handlers::list_series).post(handlers::create_series),
        )
        .route(
            "/api/series/{id}",
            get(handlers::get_series)
                .put(handlers::update_series)
                .delete(handlers::delete_series),
        );

    let mut router = Router::new().merge(api_routes);

    // When enabled, restrict /metrics to the Prometheus scraper at the network level.
    if state.config.server.metrics_enabled {
        let metrics_routes = Router::new().route("/metrics", get(metrics_handler));
        router = router.merge(metrics_routes);
    }

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origins. An empty list allows none.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
