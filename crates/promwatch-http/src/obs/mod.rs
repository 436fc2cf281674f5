//! Instrument definitions on top of the `prometheus` registry.
//!
//! The registry owns storage, bucket math and text encoding. This module only
//! declares instruments (names, help, label schemas, buckets) and renders the
//! exposition.

pub mod instruments;

pub use instruments::{render, Instruments, StaticGauges};
