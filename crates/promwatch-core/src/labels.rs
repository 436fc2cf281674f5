//! Instrument names, help texts and label schemas.
//!
//! Names and label orders are a compatibility surface: existing dashboards
//! query them verbatim.

/// Request latency histogram (seconds).
pub const REQUEST_SECONDS: &str = "request_seconds";
pub const REQUEST_SECONDS_HELP: &str =
    "records in a histogram the number of http requests and their duration in seconds";

/// Response size counter (bytes).
pub const RESPONSE_SIZE_BYTES: &str = "response_size_bytes";
pub const RESPONSE_SIZE_BYTES_HELP: &str = "counts the size of each http response";

/// Dependency latency histogram (seconds).
pub const DEPENDENCY_REQUEST_SECONDS: &str = "dependency_request_seconds";
pub const DEPENDENCY_REQUEST_SECONDS_HELP: &str =
    "records in a histogram the number of requests of a dependency and their duration in seconds";

/// Dependency liveness gauge.
pub const DEPENDENCY_UP: &str = "dependency_up";
pub const DEPENDENCY_UP_HELP: &str =
    "records if a dependency is up or down. 1 for up, 0 for down";

/// Static application info gauge.
pub const APPLICATION_INFO: &str = "application_info";
pub const APPLICATION_INFO_HELP: &str =
    "records static application info such as it's semantic version number";

pub const REQUEST_LABEL_NAMES: [&str; 6] =
    ["type", "status", "method", "addr", "isError", "errorMessage"];
pub const DEPENDENCY_LABEL_NAMES: [&str; 7] = [
    "name",
    "type",
    "status",
    "method",
    "addr",
    "isError",
    "errorMessage",
];
pub const DEPENDENCY_UP_LABEL_NAMES: [&str; 1] = ["name"];
pub const APPLICATION_INFO_LABEL_NAMES: [&str; 1] = ["version"];

/// Protocol tag recorded for requests seen by the HTTP middleware.
pub const HTTP_TYPE: &str = "http";

/// One label assignment for the request histogram and size counter.
///
/// Values are stringified at construction so `values()` can hand out
/// borrowed slices in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabels {
    kind: String,
    status: String,
    method: String,
    addr: String,
    is_error: bool,
    error_message: String,
}

impl RequestLabels {
    pub fn new(
        kind: impl Into<String>,
        status: u16,
        method: impl Into<String>,
        addr: impl Into<String>,
        is_error: bool,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            status: status.to_string(),
            method: method.into(),
            addr: addr.into(),
            is_error,
            error_message: error_message.into(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Label values in [`REQUEST_LABEL_NAMES`] order.
    pub fn values(&self) -> [&str; 6] {
        [
            self.kind.as_str(),
            self.status.as_str(),
            self.method.as_str(),
            self.addr.as_str(),
            bool_label(self.is_error),
            self.error_message.as_str(),
        ]
    }
}

/// Label assignment for the dependency histogram: a dependency name plus the
/// request label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLabels {
    name: String,
    request: RequestLabels,
}

impl DependencyLabels {
    pub fn new(name: impl Into<String>, request: RequestLabels) -> Self {
        Self { name: name.into(), request }
    }

    /// Label values in [`DEPENDENCY_LABEL_NAMES`] order.
    pub fn values(&self) -> [&str; 7] {
        let [kind, status, method, addr, is_error, msg] = self.request.values();
        [self.name.as_str(), kind, status, method, addr, is_error, msg]
    }
}

/// `isError` for manually timed operations: any error text marks a failure.
pub fn error_from_message(error_message: &str) -> bool {
    !error_message.is_empty()
}

fn bool_label(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}
