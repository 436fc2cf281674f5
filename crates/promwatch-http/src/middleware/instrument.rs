//! RequestInstrumentor.
//!
//! Per request: start a timer, hand the request downstream, resolve labels
//! from the response head, then wrap the body so the latency and size
//! observations are recorded once the response has finished.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use promwatch_core::labels::HTTP_TYPE;
use promwatch_core::{ErrorClassifier, RequestLabels};

use super::address::PendingAddress;
use super::annotation::error_message;
use super::body::ObservedBody;
use crate::obs::Instruments;

/// Shared state of the request middleware. Cheap to clone.
#[derive(Clone)]
pub struct RequestTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    instruments: Instruments,
    classifier: Arc<dyn ErrorClassifier>,
    metrics_path: String,
}

impl RequestTracker {
    pub(crate) fn new(
        instruments: Instruments,
        classifier: Arc<dyn ErrorClassifier>,
        metrics_path: String,
    ) -> Self {
        Self {
            inner: Arc::new(TrackerInner { instruments, classifier, metrics_path }),
        }
    }

    pub fn instruments(&self) -> &Instruments {
        &self.inner.instruments
    }

    /// Path of the exposition endpoint, which is never instrumented.
    pub fn metrics_path(&self) -> &str {
        &self.inner.metrics_path
    }

    pub fn is_error(&self, status: u16) -> bool {
        self.inner.classifier.is_error(status)
    }
}

/// One in-flight request. Owned by the response body and consumed on finish.
pub(crate) struct RequestContext {
    tracker: RequestTracker,
    labels: RequestLabels,
    start: Instant,
}

impl RequestContext {
    pub(crate) fn finish(self, body_bytes: u64) {
        let elapsed = self.start.elapsed().as_secs_f64();
        let instruments = self.tracker.instruments();
        instruments.observe_request(&self.labels, elapsed);
        instruments.add_response_size(&self.labels, body_bytes);
    }
}

/// axum middleware recording `request_seconds` and `response_size_bytes`.
pub async fn track_request(
    State(tracker): State<RequestTracker>,
    req: Request,
    next: Next,
) -> Response {
    if req.uri().path() == tracker.metrics_path() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let (parts, body) = req.into_parts();
    let method = parts.method.to_string();
    let address = PendingAddress::capture(&parts);

    let res = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = res.into_parts();
    let status = parts.status.as_u16();
    let labels = RequestLabels::new(
        HTTP_TYPE,
        status,
        method,
        address.complete(&parts),
        tracker.is_error(status),
        error_message(&parts),
    );

    let ctx = RequestContext { tracker, labels, start };
    let body = ObservedBody::new(body, &parts.headers, ctx);
    Response::from_parts(parts, Body::new(body))
}
