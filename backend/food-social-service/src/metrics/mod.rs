//! Prometheus metrics for food-social-service.
//!
//! Document and request collectors plus the handler behind `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Documents written, by collection.
    pub static ref DOCUMENTS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "documents_created_total",
        "Documents inserted into the store segmented by collection",
        &["collection"]
    )
    .expect("failed to register documents_created_total");

    /// Payloads rejected by schema validation, by collection.
    pub static ref VALIDATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "validation_failures_total",
        "Payloads rejected before reaching the store segmented by collection",
        &["collection"]
    )
    .expect("failed to register validation_failures_total");

    /// Store calls that failed, by operation (create/list).
    pub static ref STORE_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "store_errors_total",
        "Failed document store calls segmented by operation and collection",
        &["operation", "collection"]
    )
    .expect("failed to register store_errors_total");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method, route and status",
        &["method", "route", "status"]
    )
    .expect("failed to register http_request_duration_seconds");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
