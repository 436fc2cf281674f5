//! Dependency health results.

/// Outcome of probing one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckResult {
    /// Dependency identifier, used as the `name` label.
    pub name: String,
    /// Whether the dependency answered.
    pub up: bool,
}

impl HealthCheckResult {
    pub fn new(name: impl Into<String>, up: bool) -> Self {
        Self { name: name.into(), up }
    }

    pub fn up(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn down(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Gauge value: 1 for up, 0 for down.
    pub fn gauge_value(&self) -> i64 {
        i64::from(self.up)
    }
}
