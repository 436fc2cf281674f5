//! Response-side error annotation.
//!
//! Handlers describe a failure by returning [`ErrorMessage`] as a response
//! part, or by setting the `Error-Message` header. The middleware only reads
//! it; the annotation is independent of the status code.

use axum::http::{response, HeaderName};
use axum::response::{IntoResponseParts, ResponseParts};

/// Header consulted when no [`ErrorMessage`] extension is present.
pub const ERROR_MESSAGE_HEADER: HeaderName = HeaderName::from_static("error-message");

/// Free-text error annotation for the `errorMessage` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage(String);

impl ErrorMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IntoResponseParts for ErrorMessage {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

/// Read the annotation of a finished response; empty when absent.
pub(crate) fn error_message(res: &response::Parts) -> String {
    if let Some(m) = res.extensions.get::<ErrorMessage>() {
        return m.0.clone();
    }
    res.headers
        .get(&ERROR_MESSAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default()
}
