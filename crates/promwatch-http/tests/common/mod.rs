//! Registry readers shared by integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use prometheus::proto::{Metric, MetricFamily, MetricType};
use tower::ServiceExt;

use promwatch_http::obs;
use promwatch_http::Monitor;

/// Send one request through `app`, drain the body, and return the status
/// plus the body text.
pub async fn send(app: &Router, uri: &str) -> (u16, String) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status().as_u16();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn exposition(monitor: &Monitor) -> String {
    obs::render(monitor.registry()).unwrap().0
}

/// Which number of a family a sample name refers to. Histograms expose
/// `_count`, `_sum` and `_bucket` series; everything else exposes its value.
enum Part {
    Value,
    Count,
    Sum,
    Bucket,
}

fn lookup(monitor: &Monitor, name: &str) -> Option<(MetricFamily, Part)> {
    let families = monitor.registry().gather();
    let find = |family: &str| families.iter().find(|mf| mf.name() == family).cloned();
    if let Some(mf) = find(name) {
        return Some((mf, Part::Value));
    }
    [("_count", Part::Count), ("_sum", Part::Sum), ("_bucket", Part::Bucket)]
        .into_iter()
        .find_map(|(suffix, part)| {
            let family = name.strip_suffix(suffix)?;
            find(family).map(|mf| (mf, part))
        })
}

fn has_labels(metric: &Metric, labels: &[(&str, &str)]) -> bool {
    labels.iter().filter(|(k, _)| *k != "le").all(|(k, v)| {
        metric
            .get_label()
            .iter()
            .any(|pair| pair.name() == *k && pair.value() == *v)
    })
}

fn read(mf: &MetricFamily, part: &Part, metric: &Metric, le: Option<&str>) -> Option<f64> {
    let histogram = metric.get_histogram();
    match (mf.get_field_type(), part) {
        (MetricType::COUNTER, Part::Value) => Some(metric.get_counter().value()),
        (MetricType::GAUGE, Part::Value) => Some(metric.get_gauge().value()),
        (MetricType::HISTOGRAM, Part::Count) => Some(histogram.sample_count() as f64),
        (MetricType::HISTOGRAM, Part::Sum) => Some(histogram.sample_sum()),
        (MetricType::HISTOGRAM, Part::Bucket) => match le? {
            "+Inf" => Some(histogram.sample_count() as f64),
            bound => {
                let bound: f64 = bound.parse().ok()?;
                histogram
                    .get_bucket()
                    .iter()
                    .find(|b| b.upper_bound() == bound)
                    .map(|b| b.cumulative_count() as f64)
            }
        },
        _ => None,
    }
}

/// Value of the first series `name` whose labels include every pair in
/// `labels`, read straight from the registry. Histogram parts use the
/// exposition suffixes; a `_bucket` lookup takes its bound from `le`.
pub fn sample(monitor: &Monitor, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    let (mf, part) = lookup(monitor, name)?;
    let le = labels.iter().find(|(k, _)| *k == "le").map(|(_, v)| *v);
    mf.get_metric()
        .iter()
        .filter(|m| has_labels(m, labels))
        .find_map(|m| read(&mf, &part, m, le))
}

/// Number of distinct series `name` would show in the exposition.
pub fn series_count(monitor: &Monitor, name: &str) -> usize {
    match lookup(monitor, name) {
        None => 0,
        Some((mf, Part::Bucket)) => mf
            .get_metric()
            .iter()
            .map(|m| m.get_histogram().get_bucket().len() + 1)
            .sum(),
        Some((mf, _)) => mf.get_metric().len(),
    }
}

pub fn http_labels<'a>(
    status: &'a str,
    method: &'a str,
    addr: &'a str,
    is_error: &'a str,
    error_message: &'a str,
) -> Vec<(&'a str, &'a str)> {
    vec![
        ("type", "http"),
        ("status", status),
        ("method", method),
        ("addr", addr),
        ("isError", is_error),
        ("errorMessage", error_message),
    ]
}
