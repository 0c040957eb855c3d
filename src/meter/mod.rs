//! Device-side protocol handling.
//!
//! This module speaks the powerfox JSON-RPC protocol: [`client`] drives the
//! retrying query against one device, [`payload`] unwraps the nested
//! base64/JSON payload into structured records.

pub mod client;
pub mod payload;

// Re-export commonly used items
pub use client::{DeviceClient, HttpMeterRpc, MeterRpc, RetryPolicy};
pub use payload::{decode_records, MeasurementEntry, RawResponse, Record};
