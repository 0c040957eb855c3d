//! # powerfox-exporter
//!
//! A Prometheus exporter for powerfox smart-meter devices. On every scrape
//! it queries the configured devices over their JSON-RPC protocol, unwraps
//! the base64-encoded record payload, maps OBIS measurement codes to named
//! gauges and exposes the latest values labeled by device hostname.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use powerfox_exporter::{start_web_server, MeterCollector, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = MeterCollector::new(vec!["192.168.1.23".to_string()]);
//!     let config = WebConfig::default().with_port(8080);
//!     start_web_server(config, collector).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod meter;
pub mod metrics;
pub mod web;

// Re-export public API
pub use error::{MeterError, Result};
pub use meter::{DeviceClient, HttpMeterRpc, MeterRpc, RetryPolicy};
pub use metrics::{
    catalog::MetricKind,
    collector::{MeterCollector, MetricFamily, Sample},
    mapper::SampleSet,
};
pub use web::{start_web_server, WebConfig};

/// The default metrics server port
pub const DEFAULT_LISTEN_PORT: u16 = 8080;
