//! promwatch HTTP integration.
//!
//! This crate wires the core metric schema into axum: request instrumentation
//! middleware, the exposition endpoint, manual dependency timing, and the
//! dependency health poller, all writing into one owned `prometheus`
//! registry. It is consumed by the demo binary (`main.rs`) and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod health;
pub mod middleware;
pub mod monitor;
pub mod obs;
pub mod ops;
pub mod timing;

pub use health::{DependencyRegistrar, HealthCheck};
pub use middleware::{resolve_address, ErrorMessage, OperationPath};
pub use monitor::{Monitor, MonitorOptions, DEFAULT_HEALTH_INTERVAL, DEFAULT_METRICS_ENDPOINT};
pub use timing::DependencyCall;
