//! Histogram bucket validation.
//!
//! Latency histograms share one bucket layout. Bounds are in seconds, strictly
//! ascending and positive; the `+Inf` overflow bucket is implicit and added
//! by the registry.

use crate::error::{PromwatchError, Result};

/// Default latency buckets in seconds.
pub const DEFAULT_BUCKETS: [f64; 4] = [0.1, 0.3, 1.5, 10.5];

/// Check that `buckets` is non-empty, finite, positive and strictly ascending.
pub fn validate(buckets: &[f64]) -> Result<()> {
    if buckets.is_empty() {
        return Err(PromwatchError::InvalidBuckets("bucket list is empty".into()));
    }
    for (i, b) in buckets.iter().enumerate() {
        if !b.is_finite() || *b <= 0.0 {
            return Err(PromwatchError::InvalidBuckets(format!(
                "bucket #{i} must be a positive finite number (got {b})"
            )));
        }
    }
    if let Some(w) = buckets.windows(2).find(|w| w[0] >= w[1]) {
        return Err(PromwatchError::InvalidBuckets(format!(
            "buckets must be strictly ascending ({} >= {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

/// Resolve the bucket layout used at init.
///
/// Absent or empty input yields [`DEFAULT_BUCKETS`]. Invalid input is logged
/// and also falls back to the defaults.
pub fn normalize(buckets: Option<&[f64]>) -> Vec<f64> {
    match buckets {
        None | Some([]) => DEFAULT_BUCKETS.to_vec(),
        Some(b) => match validate(b) {
            Ok(()) => b.to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default histogram buckets");
                DEFAULT_BUCKETS.to_vec()
            }
        },
    }
}
