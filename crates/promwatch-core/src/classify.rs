//! Status-code error classification.
//!
//! The classifier only decides the `isError` label. It never turns a response
//! into a Rust error.

/// Decides whether a status code counts as an error for labeling purposes.
///
/// Implemented for any `Fn(u16) -> bool`, so a closure can be passed wherever
/// a classifier is expected:
///
/// ```
/// use promwatch_core::ErrorClassifier;
///
/// let redirects_too = |status: u16| status >= 300;
/// assert!(redirects_too.is_error(302));
/// ```
pub trait ErrorClassifier: Send + Sync {
    fn is_error(&self, status: u16) -> bool;
}

impl<F> ErrorClassifier for F
where
    F: Fn(u16) -> bool + Send + Sync,
{
    fn is_error(&self, status: u16) -> bool {
        self(status)
    }
}

/// Treats every 4xx and 5xx family code as an error.
///
/// The check works on the decimal form: at least two characters, leading `4`
/// or `5`. Non-standard codes such as `40` or `5001` are therefore errors too.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ErrorClassifier for DefaultClassifier {
    fn is_error(&self, status: u16) -> bool {
        let s = status.to_string();
        s.len() >= 2 && matches!(s.as_bytes().first(), Some(b'4') | Some(b'5'))
    }
}
