use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

use promwatch_core::error::{PromwatchError, Result};
use promwatch_core::labels::{
    APPLICATION_INFO, APPLICATION_INFO_HELP, APPLICATION_INFO_LABEL_NAMES,
    DEPENDENCY_LABEL_NAMES, DEPENDENCY_REQUEST_SECONDS, DEPENDENCY_REQUEST_SECONDS_HELP,
    DEPENDENCY_UP, DEPENDENCY_UP_HELP, DEPENDENCY_UP_LABEL_NAMES, REQUEST_LABEL_NAMES,
    REQUEST_SECONDS, REQUEST_SECONDS_HELP, RESPONSE_SIZE_BYTES, RESPONSE_SIZE_BYTES_HELP,
};
use promwatch_core::{DependencyLabels, RequestLabels};

fn registry_err(what: &str, e: prometheus::Error) -> PromwatchError {
    PromwatchError::Registry(format!("{what}: {e}"))
}

/// Gauges that exist for the whole life of a `Monitor`, before and after init.
#[derive(Clone)]
pub struct StaticGauges {
    pub dependency_up: IntGaugeVec,
    pub application_info: IntGaugeVec,
}

impl StaticGauges {
    pub fn register(registry: &Registry) -> Result<Self> {
        let dependency_up = IntGaugeVec::new(
            Opts::new(DEPENDENCY_UP, DEPENDENCY_UP_HELP),
            &DEPENDENCY_UP_LABEL_NAMES,
        )
        .map_err(|e| registry_err(DEPENDENCY_UP, e))?;
        let application_info = IntGaugeVec::new(
            Opts::new(APPLICATION_INFO, APPLICATION_INFO_HELP),
            &APPLICATION_INFO_LABEL_NAMES,
        )
        .map_err(|e| registry_err(APPLICATION_INFO, e))?;

        registry
            .register(Box::new(dependency_up.clone()))
            .map_err(|e| registry_err(DEPENDENCY_UP, e))?;
        registry
            .register(Box::new(application_info.clone()))
            .map_err(|e| registry_err(APPLICATION_INFO, e))?;

        Ok(Self { dependency_up, application_info })
    }

    /// Set the liveness flag for one dependency.
    pub fn set_dependency(&self, name: &str, value: i64) {
        match self.dependency_up.get_metric_with_label_values(&[name]) {
            Ok(g) => g.set(value),
            Err(e) => tracing::warn!(error = %e, dependency = %name, "dependency_up update failed"),
        }
    }

    /// Record the running version as a constant `1` series.
    pub fn set_version(&self, version: &str) {
        match self.application_info.get_metric_with_label_values(&[version]) {
            Ok(g) => g.set(1),
            Err(e) => tracing::warn!(error = %e, %version, "application_info update failed"),
        }
    }
}

/// Request-path instruments, created and registered once by `Monitor::init`.
pub struct Instruments {
    request_seconds: HistogramVec,
    response_size: IntCounterVec,
    dependency_seconds: HistogramVec,
}

impl Instruments {
    /// Build the request-path instruments with the given latency buckets.
    pub fn new(buckets: &[f64]) -> Result<Self> {
        let request_seconds = HistogramVec::new(
            HistogramOpts::new(REQUEST_SECONDS, REQUEST_SECONDS_HELP).buckets(buckets.to_vec()),
            &REQUEST_LABEL_NAMES,
        )
        .map_err(|e| registry_err(REQUEST_SECONDS, e))?;
        let response_size = IntCounterVec::new(
            Opts::new(RESPONSE_SIZE_BYTES, RESPONSE_SIZE_BYTES_HELP),
            &REQUEST_LABEL_NAMES,
        )
        .map_err(|e| registry_err(RESPONSE_SIZE_BYTES, e))?;
        let dependency_seconds = HistogramVec::new(
            HistogramOpts::new(DEPENDENCY_REQUEST_SECONDS, DEPENDENCY_REQUEST_SECONDS_HELP)
                .buckets(buckets.to_vec()),
            &DEPENDENCY_LABEL_NAMES,
        )
        .map_err(|e| registry_err(DEPENDENCY_REQUEST_SECONDS, e))?;

        Ok(Self { request_seconds, response_size, dependency_seconds })
    }

    /// Register every instrument. A name the application already took is
    /// logged and skipped; observations still land in the local instrument.
    pub fn register(&self, registry: &Registry) {
        let all: [(&str, Box<dyn prometheus::core::Collector>); 3] = [
            (REQUEST_SECONDS, Box::new(self.request_seconds.clone())),
            (RESPONSE_SIZE_BYTES, Box::new(self.response_size.clone())),
            (DEPENDENCY_REQUEST_SECONDS, Box::new(self.dependency_seconds.clone())),
        ];
        for (name, collector) in all {
            if let Err(e) = registry.register(collector) {
                tracing::warn!(error = %e, instrument = %name, "instrument registration failed");
            }
        }
    }

    /// One latency observation into `request_seconds`.
    pub fn observe_request(&self, labels: &RequestLabels, seconds: f64) {
        match self.request_seconds.get_metric_with_label_values(&labels.values()) {
            Ok(h) => h.observe(seconds),
            Err(e) => tracing::warn!(error = %e, addr = %labels.addr(), "request_seconds observe failed"),
        }
    }

    /// Add `bytes` to `response_size_bytes`.
    pub fn add_response_size(&self, labels: &RequestLabels, bytes: u64) {
        match self.response_size.get_metric_with_label_values(&labels.values()) {
            Ok(c) => c.inc_by(bytes),
            Err(e) => tracing::warn!(error = %e, addr = %labels.addr(), "response_size_bytes update failed"),
        }
    }

    /// One latency observation into `dependency_request_seconds`.
    pub fn observe_dependency(&self, labels: &DependencyLabels, seconds: f64) {
        match self.dependency_seconds.get_metric_with_label_values(&labels.values()) {
            Ok(h) => h.observe(seconds),
            Err(e) => tracing::warn!(error = %e, "dependency_request_seconds observe failed"),
        }
    }
}

/// Render every instrument in `registry` in the Prometheus text format.
///
/// Returns the body and its content type.
pub fn render(registry: &Registry) -> Result<(String, String)> {
    let encoder = TextEncoder::new();
    let families = registry.gather();
    let mut buf = Vec::new();
    encoder
        .encode(&families, &mut buf)
        .map_err(|e| registry_err("encode", e))?;
    let body = String::from_utf8(buf)
        .map_err(|e| PromwatchError::Internal(format!("exposition is not utf-8: {e}")))?;
    Ok((body, encoder.format_type().to_string()))
}
