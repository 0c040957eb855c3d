//! Rendering of collected families into Prometheus text exposition.

use crate::error::{MeterError, Result};
use crate::metrics::collector::MetricFamily;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Content type of the rendered exposition body.
pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct DeviceLabels {
    hostname: String,
}

/// Encode the collected families as OpenMetrics text.
///
/// A fresh registry is assembled per call, so the exposition reflects the
/// current scrape only. Families without samples still get their HELP and
/// TYPE lines.
pub fn encode_families(families: &[MetricFamily]) -> Result<String> {
    let mut registry = Registry::default();

    for family in families {
        let gauges = Family::<DeviceLabels, Gauge>::default();
        registry.register(family.kind.name(), family.kind.help(), gauges.clone());

        for sample in &family.samples {
            gauges
                .get_or_create(&DeviceLabels {
                    hostname: sample.hostname.clone(),
                })
                .set(sample.value);
        }
    }

    let mut body = String::new();
    encode(&mut body, &registry)
        .map_err(|err| MeterError::exposition_error(err.to_string()))?;

    Ok(body)
}
