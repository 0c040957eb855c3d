//! Metric catalog, mapping and per-scrape collection.
//!
//! This module turns decoded device records into exposed gauge families:
//! [`catalog`] fixes the known measurement codes, [`mapper`] resolves raw
//! entries against it, [`collector`] assembles the per-scrape families and
//! [`exposition`] renders them as Prometheus text.

pub mod catalog;
pub mod collector;
pub mod exposition;
pub mod mapper;

// Re-export commonly used items
pub use catalog::MetricKind;
pub use collector::{MeterCollector, MetricFamily, Sample};
pub use mapper::SampleSet;
