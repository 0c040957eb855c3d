//! Mapping of raw measurement entries onto catalog metrics.

use crate::meter::payload::MeasurementEntry;
use crate::metrics::catalog::{self, MetricKind};
use std::collections::HashMap;
use tracing::warn;

/// The per-device result of one successful poll.
#[derive(Debug, Clone)]
pub struct SampleSet {
    /// Unix timestamp reported by the device
    pub timestamp: i64,
    /// Meter serial number reported by the device
    pub meter_serial: String,
    /// Catalog metrics present in this poll
    pub metrics: HashMap<MetricKind, i64>,
}

/// Map measurement entries through the code catalog.
///
/// Entries with an unknown code or a value that does not parse as an integer
/// are logged and dropped; neither aborts the poll. If the same code occurs
/// more than once, the last value wins.
pub fn map_entries<'a>(
    entries: impl IntoIterator<Item = &'a MeasurementEntry>,
) -> HashMap<MetricKind, i64> {
    let mut metrics = HashMap::new();

    for entry in entries {
        let Some(kind) = catalog::lookup(&entry.code) else {
            warn!(code = %entry.code, "unknown OBIS code");
            continue;
        };
        match entry.value.parse::<i64>() {
            Ok(value) => {
                metrics.insert(kind, value);
            }
            Err(_) => {
                warn!(code = %entry.code, value = %entry.value, "non-integer measurement value");
            }
        }
    }

    metrics
}
