//! Prometheus metrics for the liftsheet server.
//!
//! Cache figures are owned by the table cache and copied into gauges on each
//! scrape. Request-side counters are incremented by the handlers and the
//! error responder.
//!
//! The `/metrics` endpoint is unauthenticated; restrict it at the network
//! level or disable it with `server.metrics_enabled = false`.

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Cache metrics
pub static CACHE_HITS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "liftsheet_cache_hits",
        "Table reads served from the cache since startup",
    )
    .expect("metric creation failed")
});

pub static CACHE_MISSES: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "liftsheet_cache_misses",
        "Table reads that went to the backing store since startup",
    )
    .expect("metric creation failed")
});

pub static CACHE_INVALIDATIONS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "liftsheet_cache_invalidations",
        "Whole-table cache invalidations since startup",
    )
    .expect("metric creation failed")
});

pub static CACHE_ENTRIES: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "liftsheet_cache_entries",
        "Number of table snapshots currently cached",
    )
    .expect("metric creation failed")
});

// Write metrics
pub static ENTITY_WRITES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "liftsheet_entity_writes_total",
            "Successful entity mutations by entity and operation",
        ),
        &["entity", "operation"],
    )
    .expect("metric creation failed")
});

// Error metrics
pub static API_ERRORS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("liftsheet_api_errors_total", "API error responses by code"),
        &["code"],
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(CACHE_HITS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_MISSES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_INVALIDATIONS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_ENTRIES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(ENTITY_WRITES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(API_ERRORS.clone()))
            .expect("metric registration failed");
    });
}

/// Copy the current cache statistics into the cache gauges.
fn refresh_cache_gauges(state: &AppState) {
    let stats = state.tables.cache().stats();
    CACHE_HITS.set(i64::try_from(stats.hits).unwrap_or(i64::MAX));
    CACHE_MISSES.set(i64::try_from(stats.misses).unwrap_or(i64::MAX));
    CACHE_INVALIDATIONS.set(i64::try_from(stats.invalidations).unwrap_or(i64::MAX));
    CACHE_ENTRIES.set(i64::try_from(stats.entries).unwrap_or(i64::MAX));
}

/// Handler for the `/metrics` endpoint.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    register_metrics();
    refresh_cache_gauges(&state);

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Helper to record an error response by code.
pub fn record_api_error(code: &str) {
    API_ERRORS.with_label_values(&[code]).inc();
}

/// Helper to record a successful mutation.
pub fn record_write(entity: &str, operation: &str) {
    ENTITY_WRITES.with_label_values(&[entity, operation]).inc();
}
