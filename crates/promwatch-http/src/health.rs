//! HealthWatcher: periodic dependency liveness polling.
//!
//! A [`HealthCheck`] is handed a [`DependencyRegistrar`] on every tick and
//! reports any number of [`HealthCheckResult`]s through it. Each report sets
//! `dependency_up{name}` to 1 or 0.
//!
//! The poller runs on its own tokio task, away from request handling. Checks
//! that block should move their blocking part to `spawn_blocking`. There is no
//! timeout: a hung check stalls only its own poller.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use promwatch_core::HealthCheckResult;

use crate::monitor::{Monitor, DEFAULT_HEALTH_INTERVAL};
use crate::obs::StaticGauges;

/// Callback handed to health checks for reporting results.
#[derive(Clone)]
pub struct DependencyRegistrar {
    gauges: StaticGauges,
}

impl DependencyRegistrar {
    pub fn register(&self, result: HealthCheckResult) {
        self.gauges.set_dependency(&result.name, result.gauge_value());
    }
}

/// A dependency health check.
///
/// Implemented for async closures taking the registrar:
///
/// ```no_run
/// # use promwatch_core::HealthCheckResult;
/// # use promwatch_http::health::DependencyRegistrar;
/// # fn demo(monitor: promwatch_http::Monitor) {
/// monitor.watch_dependencies(|register: DependencyRegistrar| async move {
///     register.register(HealthCheckResult::up("cache"));
/// });
/// # }
/// ```
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    async fn check(&self, register: DependencyRegistrar);
}

#[async_trait]
impl<F, Fut> HealthCheck for F
where
    F: Fn(DependencyRegistrar) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn check(&self, register: DependencyRegistrar) {
        self(register).await
    }
}

impl Monitor {
    fn registrar(&self) -> DependencyRegistrar {
        DependencyRegistrar { gauges: self.gauges().clone() }
    }

    /// Poll `check` every 15 seconds.
    pub fn watch_dependencies<H: HealthCheck>(&self, check: H) -> Option<JoinHandle<()>> {
        self.watch_dependencies_every(DEFAULT_HEALTH_INTERVAL, check)
    }

    /// Poll `check` every `period`, first run one period from now.
    ///
    /// Returns `None` when called outside a tokio runtime.
    pub fn watch_dependencies_every<H: HealthCheck>(
        &self,
        period: Duration,
        check: H,
    ) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "watch_dependencies needs a tokio runtime; not watching");
                return None;
            }
        };
        if period.is_zero() {
            tracing::warn!("watch_dependencies period must be non-zero; not watching");
            return None;
        }

        let registrar = self.registrar();
        Some(handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                run_check(&check, registrar.clone()).await;
            }
        }))
    }

    /// Run `check` once, for callers that schedule polling themselves.
    pub async fn watch_dependencies_once<H: HealthCheck>(&self, check: &H) {
        run_check(check, self.registrar()).await;
    }
}

async fn run_check<H: HealthCheck>(check: &H, registrar: DependencyRegistrar) {
    if AssertUnwindSafe(check.check(registrar))
        .catch_unwind()
        .await
        .is_err()
    {
        tracing::warn!("health check panicked; keeping previous dependency state");
    }
}
