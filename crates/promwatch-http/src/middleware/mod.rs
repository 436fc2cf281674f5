//! Request instrumentation for axum routers.
//!
//! - `address`: canonical `addr` label resolution
//! - `annotation`: handler-set error message carried on the response
//! - `body`: response body wrapper that signals completion
//! - `instrument`: the middleware itself

pub mod address;
pub mod annotation;
pub mod body;
pub mod instrument;

pub use address::{resolve_address, OperationPath};
pub use annotation::ErrorMessage;
pub use instrument::RequestTracker;
