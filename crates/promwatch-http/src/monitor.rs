//! The metrics core: one owned registry, its instruments, and the init gate.
//!
//! `Monitor` replaces process-wide monitor state with an explicit handle.
//! Clone it freely; clones share the registry and the gate.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use prometheus::Registry;

use promwatch_core::buckets;
use promwatch_core::error::Result;
use promwatch_core::{DefaultClassifier, ErrorClassifier};

use crate::config::MonitorSection;
use crate::middleware::instrument::{track_request, RequestTracker};
use crate::obs::{Instruments, StaticGauges};
use crate::ops;

/// Default exposition path.
pub const DEFAULT_METRICS_ENDPOINT: &str = "/metrics";

/// Default dependency health polling period.
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(15);

/// Options for [`Monitor::init`]. Anything left unset takes its default.
#[derive(Clone, Default)]
pub struct MonitorOptions {
    collect_default_metrics: bool,
    buckets: Option<Vec<f64>>,
    version: Option<String>,
    classifier: Option<Arc<dyn ErrorClassifier>>,
    metrics_endpoint: Option<String>,
}

impl MonitorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also export process-level metrics (CPU, memory, fds).
    pub fn collect_default_metrics(mut self, enabled: bool) -> Self {
        self.collect_default_metrics = enabled;
        self
    }

    /// Latency bucket upper bounds in seconds.
    pub fn buckets(mut self, buckets: impl Into<Vec<f64>>) -> Self {
        self.buckets = Some(buckets.into());
        self
    }

    /// Application version recorded in `application_info`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn classifier(mut self, classifier: impl ErrorClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    pub fn metrics_endpoint(mut self, path: impl Into<String>) -> Self {
        self.metrics_endpoint = Some(path.into());
        self
    }

    pub fn from_config(cfg: &MonitorSection) -> Self {
        let mut opts = Self::new()
            .collect_default_metrics(cfg.collect_default_metrics)
            .buckets(cfg.buckets.clone())
            .metrics_endpoint(cfg.metrics_endpoint.clone());
        if let Some(v) = &cfg.app_version {
            opts = opts.version(v.clone());
        }
        opts
    }

    fn resolved_endpoint(&self) -> String {
        match self.metrics_endpoint.as_deref() {
            None | Some("") => DEFAULT_METRICS_ENDPOINT.to_string(),
            Some(p) if p.starts_with('/') => p.to_string(),
            Some(p) => {
                tracing::warn!(endpoint = %p, "metrics endpoint must start with '/', using default");
                DEFAULT_METRICS_ENDPOINT.to_string()
            }
        }
    }
}

#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    registry: Registry,
    gauges: StaticGauges,
    // Init gate: set at most once, concurrent callers block until it is.
    gate: OnceLock<Installed>,
}

struct Installed {
    tracker: Option<RequestTracker>,
    endpoint: String,
}

impl Monitor {
    /// Create a monitor with its own registry.
    ///
    /// `dependency_up` and `application_info` exist from here on, so health
    /// watching can start before the router is instrumented.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let gauges = StaticGauges::register(&registry)?;
        Ok(Self {
            inner: Arc::new(MonitorInner {
                registry,
                gauges,
                gate: OnceLock::new(),
            }),
        })
    }

    /// The underlying registry, for application-defined instruments.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.gate.get().is_some()
    }

    pub(crate) fn gauges(&self) -> &StaticGauges {
        &self.inner.gauges
    }

    pub(crate) fn tracker(&self) -> Option<&RequestTracker> {
        self.inner.gate.get().and_then(|g| g.tracker.as_ref())
    }

    /// Instrument `router` and mount the exposition endpoint.
    ///
    /// Only the first call has an effect; later calls return `router`
    /// untouched. Call it after every route is registered: routes added
    /// afterwards are not instrumented. If `router` already serves GET on
    /// the metrics endpoint, that handler is kept and no exposition route
    /// is added.
    pub fn init<S>(&self, router: Router<S>, options: MonitorOptions) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut first = false;
        let installed = self.inner.gate.get_or_init(|| {
            first = true;
            self.install(&options)
        });
        if !first {
            tracing::debug!("monitor already initialized; init is a no-op");
            return router;
        }

        let router = match &installed.tracker {
            Some(tracker) => router.layer(middleware::from_fn_with_state(
                tracker.clone(),
                track_request,
            )),
            None => router,
        };
        // axum panics when the endpoint already has a GET handler; the
        // host's own route wins and the exposition stays unmounted.
        let unmounted = router.clone();
        let exposition = get(ops::metrics).with_state(self.inner.registry.clone());
        let endpoint = installed.endpoint.as_str();
        match panic::catch_unwind(AssertUnwindSafe(move || router.route(endpoint, exposition))) {
            Ok(router) => router,
            Err(_) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    "metrics endpoint is already routed; exposition not mounted"
                );
                unmounted
            }
        }
    }

    fn install(&self, options: &MonitorOptions) -> Installed {
        let buckets = buckets::normalize(options.buckets.as_deref());
        let classifier = options
            .classifier
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultClassifier));
        let endpoint = options.resolved_endpoint();

        if options.collect_default_metrics {
            self.register_process_metrics();
        }
        if let Some(version) = options.version.as_deref().filter(|v| !v.is_empty()) {
            self.inner.gauges.set_version(version);
        }

        let tracker = match Instruments::new(&buckets) {
            Ok(instruments) => {
                instruments.register(&self.inner.registry);
                tracing::info!(endpoint = %endpoint, ?buckets, "prometheus monitoring initialized");
                Some(RequestTracker::new(instruments, classifier, endpoint.clone()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "request instruments unavailable; serving exposition only");
                None
            }
        };
        Installed { tracker, endpoint }
    }

    #[cfg(target_os = "linux")]
    fn register_process_metrics(&self) {
        let collector = prometheus::process_collector::ProcessCollector::for_self();
        if let Err(e) = self.inner.registry.register(Box::new(collector)) {
            tracing::warn!(error = %e, "process metrics registration failed");
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn register_process_metrics(&self) {
        tracing::warn!("process metrics are only available on linux");
    }
}
