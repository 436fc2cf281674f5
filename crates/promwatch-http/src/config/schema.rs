use std::time::Duration;

use serde::Deserialize;

use promwatch_core::buckets::{self, DEFAULT_BUCKETS};
use promwatch_core::error::{PromwatchError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub monitor: MonitorSection,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromwatchError::UnsupportedVersion);
        }
        self.monitor.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    #[serde(default = "default_metrics_endpoint")]
    pub metrics_endpoint: String,

    #[serde(default)]
    pub collect_default_metrics: bool,

    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,

    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default = "default_health_interval_ms")]
    pub health_interval_ms: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            metrics_endpoint: default_metrics_endpoint(),
            collect_default_metrics: false,
            buckets: default_buckets(),
            app_version: None,
            health_interval_ms: default_health_interval_ms(),
        }
    }
}

impl MonitorSection {
    pub fn validate(&self) -> Result<()> {
        if !self.metrics_endpoint.starts_with('/') {
            return Err(PromwatchError::BadConfig(
                "monitor.metrics_endpoint must start with '/'".into(),
            ));
        }
        buckets::validate(&self.buckets)
            .map_err(|e| PromwatchError::BadConfig(format!("monitor.buckets: {e}")))?;
        if !(1_000..=3_600_000).contains(&self.health_interval_ms) {
            return Err(PromwatchError::BadConfig(
                "monitor.health_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_metrics_endpoint() -> String {
    "/metrics".into()
}
fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
fn default_health_interval_ms() -> u64 {
    15_000
}
