//! Route address canonicalization helpers.
//!
//! The `addr` label must stay low-cardinality: matched requests are labeled
//! with their route template, unmatched ones with the bare path. Query
//! strings never reach a label.

/// Strip the query string (and any fragment) from a request target.
pub fn literal_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// Join a mount prefix and a registered route pattern into one template.
///
/// Handles the slash at the seam so `"/api/"` + `"/users/:id"` and
/// `"/api"` + `"users/:id"` both become `"/api/users/:id"`. A root pattern
/// under a prefix resolves to the prefix itself.
pub fn join_route(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let pattern = pattern.trim_start_matches('/');
    match (prefix.is_empty(), pattern.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => prefix.to_string(),
        (true, false) => format!("/{pattern}"),
        (false, false) => format!("{prefix}/{pattern}"),
    }
}
