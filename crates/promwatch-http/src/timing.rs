//! DependencyTimer: manual latency recording for work that never passes
//! through the HTTP middleware (outbound calls, queue consumers, RPC).
//!
//! Callers capture `Instant::now()` before the operation and pass it in once
//! the outcome is known. Unlike the middleware, `isError` here is "an error
//! message was given"; the status code is recorded but not classified.

use std::time::Instant;

use promwatch_core::labels::error_from_message;
use promwatch_core::{DependencyLabels, RequestLabels};

use crate::monitor::Monitor;

/// Labels of one finished dependency call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyCall<'a> {
    /// Dependency name, e.g. `"Google"` or `"orders-db"`.
    pub name: &'a str,
    /// Protocol or client tag, e.g. `"http"`, `"grpc"`, `"amqp"`.
    pub kind: &'a str,
    pub status: u16,
    pub method: &'a str,
    pub addr: &'a str,
    /// Empty when the call succeeded.
    pub error_message: &'a str,
}

impl Monitor {
    /// Record one `dependency_request_seconds` observation for `call`,
    /// timed from `start` until now.
    pub fn collect_dependency_time(&self, call: &DependencyCall<'_>, start: Instant) {
        let elapsed = start.elapsed().as_secs_f64();
        let Some(tracker) = self.tracker() else {
            tracing::warn!(dependency = %call.name, "collect_dependency_time before init; observation dropped");
            return;
        };
        let labels = DependencyLabels::new(
            call.name,
            RequestLabels::new(
                call.kind,
                call.status,
                call.method,
                call.addr,
                error_from_message(call.error_message),
                call.error_message,
            ),
        );
        tracker.instruments().observe_dependency(&labels, elapsed);
    }

    /// Record one `request_seconds` observation for a request handled outside
    /// the HTTP middleware. The `method` label is left empty.
    pub fn collect_request_time(
        &self,
        kind: &str,
        status: u16,
        addr: &str,
        start: Instant,
        error_message: Option<&str>,
    ) {
        let elapsed = start.elapsed().as_secs_f64();
        let Some(tracker) = self.tracker() else {
            tracing::warn!(%kind, %addr, "collect_request_time before init; observation dropped");
            return;
        };
        let msg = error_message.unwrap_or_default();
        let labels = RequestLabels::new(kind, status, "", addr, error_from_message(msg), msg);
        tracker.instruments().observe_request(&labels, elapsed);
    }
}
