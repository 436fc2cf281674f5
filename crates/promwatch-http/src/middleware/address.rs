//! AddressResolver.
//!
//! Resolution order:
//! 1. `OperationPath` set on the response (contract routers, handlers)
//! 2. `OperationPath` set on the request by an outer layer
//! 3. axum `MatchedPath` (route template, already carrying any nest prefix)
//! 4. literal path of the original URI, query removed

use axum::extract::{MatchedPath, OriginalUri};
use axum::http::{request, response};

use promwatch_core::address::{join_route, literal_path};

/// Declared operation path of a schema/contract router.
///
/// Takes precedence over the framework route pattern when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPath(String);

impl OperationPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Operation path declared under a mount prefix.
    pub fn mounted(prefix: &str, path: &str) -> Self {
        Self(join_route(prefix, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl axum::response::IntoResponseParts for OperationPath {
    type Error = std::convert::Infallible;

    fn into_response_parts(
        self,
        mut res: axum::response::ResponseParts,
    ) -> Result<axum::response::ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

/// Route-side address captured before the request is handed downstream.
///
/// Only the request half is known at that point; the response half is
/// consulted once the request completes.
#[derive(Debug, Clone)]
pub(crate) struct PendingAddress {
    routed: Option<String>,
    literal: String,
}

impl PendingAddress {
    pub(crate) fn capture(req: &request::Parts) -> Self {
        let routed = req
            .extensions
            .get::<OperationPath>()
            .map(|op| op.as_str().to_string())
            .or_else(|| req.extensions.get::<MatchedPath>().map(|m| m.as_str().to_string()));

        let uri = req
            .extensions
            .get::<OriginalUri>()
            .map(|o| &o.0)
            .unwrap_or(&req.uri);
        let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

        Self {
            routed,
            literal: literal_path(target).to_string(),
        }
    }

    pub(crate) fn complete(self, res: &response::Parts) -> String {
        if let Some(op) = res.extensions.get::<OperationPath>() {
            return op.as_str().to_string();
        }
        self.routed.unwrap_or(self.literal)
    }
}

/// Resolve the `addr` label for a completed request.
pub fn resolve_address(req: &request::Parts, res: &response::Parts) -> String {
    PendingAddress::capture(req).complete(res)
}
