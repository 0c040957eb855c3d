//! Decoding of the nested device payload.
//!
//! A powerfox reply wraps its data twice: the HTTP body is a JSON-RPC
//! envelope whose `result` field is a base64-encoded UTF-8 JSON array of
//! records. [`decode_records`] peels both layers and nothing more; checking
//! that the array has the expected two records is the caller's job.

use crate::error::{MeterError, Result};
use base64::prelude::{Engine, BASE64_STANDARD};
use serde::Deserialize;

/// The transport-level reply from one RPC attempt: HTTP status plus the raw
/// body text, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code of the reply
    pub status: u16,
    /// Raw JSON body text
    pub body: String,
}

/// JSON-RPC envelope carried in the HTTP body.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    /// Base64-encoded UTF-8 JSON array of records
    result: String,
}

/// One record of the decoded array.
///
/// The first record of a well-formed reply carries the timestamp and meter
/// serial; any record may carry a list of measurements.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Unix timestamp of the reading
    #[serde(rename = "t")]
    pub timestamp: Option<i64>,
    /// Meter serial number
    #[serde(rename = "m")]
    pub meter_serial: Option<String>,
    /// Measurement entries, if this record carries any
    #[serde(rename = "d")]
    pub measurements: Option<Vec<MeasurementEntry>>,
}

/// A single (code, value) measurement as reported by the device.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementEntry {
    /// OBIS measurement code, a 6-byte hex identifier
    #[serde(rename = "o")]
    pub code: String,
    /// Measured value as a numeric string
    #[serde(rename = "v")]
    pub value: String,
}

/// Decode a raw device reply into its record set.
///
/// Fails with [`MeterError::Transport`] on a non-200 status and with
/// [`MeterError::Decode`] if either decoding layer is malformed. Both are
/// hard failures that the device client must not retry.
pub fn decode_records(raw: &RawResponse) -> Result<Vec<Record>> {
    if raw.status != 200 {
        return Err(MeterError::transport_error(format!(
            "device returned HTTP {}",
            raw.status
        )));
    }

    let envelope: RpcEnvelope = serde_json::from_str(&raw.body)?;
    let decoded = BASE64_STANDARD.decode(envelope.result.as_bytes())?;
    let records: Vec<Record> = serde_json::from_slice(&decoded)?;

    Ok(records)
}
