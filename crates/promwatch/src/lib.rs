//! Top-level facade crate for promwatch.
//!
//! Re-exports the core schema and the axum integration so users can depend on
//! a single crate.

pub mod core {
    pub use promwatch_core::*;
}

pub mod http {
    pub use promwatch_http::*;
}

pub use promwatch_http::{Monitor, MonitorOptions};
