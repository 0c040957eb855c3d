//! Per-scrape collection across the configured devices.

use crate::meter::DeviceClient;
use crate::metrics::catalog::MetricKind;
use tracing::debug;

/// One labeled gauge sample collected during the current scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Address of the device that reported the value
    pub hostname: String,
    /// Latest observed value
    pub value: i64,
}

/// A gauge family for one [`MetricKind`], holding the samples of the current
/// scrape only.
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub kind: MetricKind,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            samples: Vec::new(),
        }
    }
}

/// Scrape-driven collector over a set of meter devices.
///
/// Devices are polled sequentially; a device that yields no data simply
/// contributes no samples, it never fails the scrape.
pub struct MeterCollector {
    devices: Vec<String>,
    client: DeviceClient,
}

impl MeterCollector {
    /// Create a collector for the given device addresses.
    pub fn new(devices: Vec<String>) -> Self {
        Self::with_client(devices, DeviceClient::new())
    }

    /// Create a collector with a custom device client.
    pub fn with_client(devices: Vec<String>, client: DeviceClient) -> Self {
        Self { devices, client }
    }

    /// Run one collection cycle.
    ///
    /// Always yields every declared family, in [`MetricKind::ALL`] order,
    /// whether or not it received samples. Families are built fresh per
    /// invocation; nothing carries over between scrapes.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let mut families: Vec<MetricFamily> =
            MetricKind::ALL.into_iter().map(MetricFamily::new).collect();

        for device in &self.devices {
            let Some(samples) = self.client.fetch_latest_data(device).await else {
                continue;
            };

            debug!(
                device,
                timestamp = samples.timestamp,
                serial = %samples.meter_serial,
                "merging device samples"
            );

            for family in &mut families {
                if let Some(&value) = samples.metrics.get(&family.kind) {
                    family.samples.push(Sample {
                        hostname: device.clone(),
                        value,
                    });
                }
            }
        }

        families
    }
}
