//! Prometheus metrics for ses-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

/// Counter for rejected edits and submissions by error kind.
pub static VALIDATION_REJECTIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ses_validation_rejections_total",
        "Total number of rejected edits and submissions",
        &["kind"]
    )
    .expect("Failed to register VALIDATION_REJECTIONS")
});

/// Counter for submissions by action and outcome.
pub static SUBMISSIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ses_submissions_total",
        "Total number of sheet submissions",
        &["action", "outcome"]
    )
    .expect("Failed to register SUBMISSIONS")
});

/// Counter for attachment operations.
pub static ATTACHMENT_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ses_attachment_operations_total",
        "Total number of attachment operations",
        &["operation", "status"]
    )
    .expect("Failed to register ATTACHMENT_OPERATIONS")
});

/// Histogram for submission round-trip duration by action.
pub static SUBMISSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ses_submission_duration_seconds",
        "Submission round-trip duration in seconds",
        &["action"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register SUBMISSION_DURATION")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&VALIDATION_REJECTIONS);
    Lazy::force(&SUBMISSIONS);
    Lazy::force(&ATTACHMENT_OPERATIONS);
    Lazy::force(&SUBMISSION_DURATION);
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a rejected edit or submission.
pub fn record_validation_rejection(kind: &str) {
    VALIDATION_REJECTIONS.with_label_values(&[kind]).inc();
}

/// Record a submission outcome.
pub fn record_submission(action: &str, outcome: &str) {
    SUBMISSIONS.with_label_values(&[action, outcome]).inc();
}

/// Record submission duration.
pub fn record_submission_duration(action: &str, duration_secs: f64) {
    SUBMISSION_DURATION
        .with_label_values(&[action])
        .observe(duration_secs);
}

/// Record an attachment operation.
pub fn record_attachment_operation(operation: &str, status: &str) {
    ATTACHMENT_OPERATIONS
        .with_label_values(&[operation, status])
        .inc();
}
