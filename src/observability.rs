use std::net::SocketAddr;

use crate::model::BookingStatus;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "frontdesk_bookings_created_total";

/// Counter: booking attempts rejected for a date conflict.
pub const BOOKING_CONFLICTS_TOTAL: &str = "frontdesk_booking_conflicts_total";

/// Counter: lifecycle transitions applied.
pub const TRANSITIONS_TOTAL: &str = "frontdesk_transitions_total";

/// Counter: lifecycle transitions rejected by a guard.
pub const TRANSITION_REJECTIONS_TOTAL: &str = "frontdesk_transition_rejections_total";

/// Histogram: availability query latency in seconds.
pub const AVAILABILITY_DURATION_SECONDS: &str = "frontdesk_availability_duration_seconds";

// ── USE metrics (derived work) ──────────────────────────────────

/// Counter: invoices issued at check-out.
pub const INVOICES_ISSUED_TOTAL: &str = "frontdesk_invoices_issued_total";

/// Counter: document jobs handed to the sink.
pub const DOCUMENTS_ENQUEUED_TOTAL: &str = "frontdesk_documents_enqueued_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a booking status to a short label for metrics.
pub fn status_label(status: BookingStatus) -> &'static str {
    status.label()
}
