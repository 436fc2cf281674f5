//! promwatch core: runtime-free metric schema, label tuples, classifiers and errors.
//!
//! This crate defines the instrument names and label schemas that dashboards
//! depend on, plus the small pure pieces of the request-labeling pipeline
//! (status classification, bucket normalization, path canonicalization).
//! It carries no HTTP or async runtime dependencies so the same contracts can
//! back other integrations.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Instrumentation must
//! never take the host service down, so every fallible path returns
//! `PromwatchError` or degrades to a documented default.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod address;
pub mod buckets;
pub mod classify;
pub mod error;
pub mod health;
pub mod labels;

/// Shared result type.
pub use error::{PromwatchError, Result};

pub use classify::{DefaultClassifier, ErrorClassifier};
pub use health::HealthCheckResult;
pub use labels::{DependencyLabels, RequestLabels};
