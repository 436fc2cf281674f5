#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use promwatch_core::HealthCheckResult;
use promwatch_http::{DependencyRegistrar, HealthCheck, Monitor};

use common::{exposition, sample};

fn up_value(monitor: &Monitor, name: &str) -> Option<f64> {
    sample(monitor, "dependency_up", &[("name", name)])
}

/// Reports `db` down on the first tick and up afterwards.
struct FlappingDb {
    ticks: Arc<AtomicUsize>,
}

#[async_trait]
impl HealthCheck for FlappingDb {
    async fn check(&self, register: DependencyRegistrar) {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        register.register(HealthCheckResult::new("db", n > 0));
    }
}

#[tokio::test(start_paused = true)]
async fn watcher_updates_gauge_on_each_tick() {
    let monitor = Monitor::new().unwrap();
    let ticks = Arc::new(AtomicUsize::new(0));

    let handle = monitor
        .watch_dependencies(FlappingDb { ticks: Arc::clone(&ticks) })
        .unwrap();

    // Nothing before the first period elapses.
    tokio::time::sleep(Duration::from_secs(14)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
    assert_eq!(up_value(&monitor, "db"), None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
    assert_eq!(up_value(&monitor, "db"), Some(0.0));

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);
    assert_eq!(up_value(&monitor, "db"), Some(1.0));

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn closures_register_many_dependencies() {
    let monitor = Monitor::new().unwrap();

    let handle = monitor
        .watch_dependencies_every(Duration::from_secs(5), |register: DependencyRegistrar| async move {
            register.register(HealthCheckResult::up("Fake dependency 1"));
            register.register(HealthCheckResult::down("Fake dependency 2"));
        })
        .unwrap();

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(up_value(&monitor, "Fake dependency 1"), Some(1.0));
    assert_eq!(up_value(&monitor, "Fake dependency 2"), Some(0.0));

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn panicking_check_does_not_stop_the_poller() {
    let monitor = Monitor::new().unwrap();
    let ticks = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&ticks);

    let handle = monitor
        .watch_dependencies_every(Duration::from_secs(1), move |register: DependencyRegistrar| {
            let seen = Arc::clone(&seen);
            async move {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("check blew up");
                }
                register.register(HealthCheckResult::up("cache"));
            }
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(ticks.load(Ordering::SeqCst) >= 2);
    assert_eq!(up_value(&monitor, "cache"), Some(1.0));
    assert!(!handle.is_finished());

    handle.abort();
}

#[tokio::test]
async fn watch_once_runs_inline() {
    let monitor = Monitor::new().unwrap();

    let check = |register: DependencyRegistrar| async move {
        register.register(HealthCheckResult::down("queue"));
    };
    monitor.watch_dependencies_once(&check).await;
    assert_eq!(up_value(&monitor, "queue"), Some(0.0));

    let check = |register: DependencyRegistrar| async move {
        register.register(HealthCheckResult::up("queue"));
    };
    monitor.watch_dependencies_once(&check).await;
    assert_eq!(up_value(&monitor, "queue"), Some(1.0));
}

#[test]
fn watch_outside_runtime_is_a_noop() {
    let monitor = Monitor::new().unwrap();
    let handle = monitor.watch_dependencies(|_register: DependencyRegistrar| async {});
    assert!(handle.is_none());
}

#[tokio::test]
async fn watchers_share_one_gauge() {
    let monitor = Monitor::new().unwrap();

    let a = |register: DependencyRegistrar| async move {
        register.register(HealthCheckResult::up("a"));
    };
    let b = |register: DependencyRegistrar| async move {
        register.register(HealthCheckResult::up("b"));
    };
    monitor.watch_dependencies_once(&a).await;
    monitor.watch_dependencies_once(&b).await;

    let text = exposition(&monitor);
    assert_eq!(text.matches("# TYPE dependency_up gauge").count(), 1);
    assert_eq!(sample(&monitor, "dependency_up", &[("name", "a")]), Some(1.0));
    assert_eq!(sample(&monitor, "dependency_up", &[("name", "b")]), Some(1.0));
}
