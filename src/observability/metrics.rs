//! Metrics for sent spans.
//!
//! # Metrics
//! - `beeline_spans_sent_total` (counter): spans handed to a transmission, by dataset
//! - `beeline_span_duration_ms` (histogram): span durations, by dataset

pub fn record_span_sent(dataset: &str, duration_ms: f64) {
    metrics::counter!("beeline_spans_sent_total", "dataset" => dataset.to_string()).increment(1);
    metrics::histogram!("beeline_span_duration_ms", "dataset" => dataset.to_string())
        .record(duration_ms);
}
