//! Retrying device query client.

use crate::error::{MeterError, Result};
use crate::meter::payload::{self, RawResponse};
use crate::metrics::mapper::{self, SampleSet};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration key requested from the device on every poll.
pub const LATEST_DATA_KEY: &str = "latest_data";

/// Transport seam for the device RPC.
///
/// Production uses [`HttpMeterRpc`]; tests inject scripted transports to
/// exercise the retry policy without a real device.
#[async_trait]
pub trait MeterRpc: Send + Sync {
    /// Request one configuration key from the device, returning the raw
    /// transport reply without decoding it.
    async fn get_config(&self, device: &str, key: &str) -> Result<RawResponse>;
}

/// HTTP JSON-RPC transport against `http://<device>/rpc`.
pub struct HttpMeterRpc {
    http: reqwest::Client,
}

impl HttpMeterRpc {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpMeterRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeterRpc for HttpMeterRpc {
    async fn get_config(&self, device: &str, key: &str) -> Result<RawResponse> {
        let request = json!({
            "id": 1,
            "jsonrpc": "2.0",
            "method": "getConfig",
            "params": { "key": key },
        });

        let response = self
            .http
            .post(format!("http://{}/rpc", device))
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Bounded-retry policy for one device poll.
///
/// Only shape mismatches (see [`MeterError::is_retryable`]) consume retry
/// attempts; hard failures abort the poll on the spot.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total request attempts per poll
    pub max_attempts: u32,
    /// Wait between attempts
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            wait: Duration::from_secs(1),
        }
    }
}

/// Client for polling meter devices.
pub struct DeviceClient {
    rpc: Box<dyn MeterRpc>,
    policy: RetryPolicy,
}

impl DeviceClient {
    /// Create a client using the HTTP transport and the default retry policy.
    pub fn new() -> Self {
        Self::with_rpc(Box::new(HttpMeterRpc::new()), RetryPolicy::default())
    }

    /// Create a client with a custom transport and retry policy.
    pub fn with_rpc(rpc: Box<dyn MeterRpc>, policy: RetryPolicy) -> Self {
        Self { rpc, policy }
    }

    /// Fetch the latest data from one device.
    ///
    /// Returns `None` on any failure: immediately for transport and decode
    /// errors, after the retry budget is exhausted for shape mismatches.
    /// Waits occur between attempts only, so a full poll blocks for at most
    /// `max_attempts - 1` wait intervals.
    pub async fn fetch_latest_data(&self, device: &str) -> Option<SampleSet> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.query_once(device).await {
                Ok(samples) => return Some(samples),
                Err(err) if err.is_retryable() && attempt < self.policy.max_attempts => {
                    warn!(device, attempt, %err, "retrying device query");
                    sleep(self.policy.wait).await;
                }
                Err(err) => {
                    warn!(device, attempt, %err, "device query failed, no data this cycle");
                    return None;
                }
            }
        }
    }

    async fn query_once(&self, device: &str) -> Result<SampleSet> {
        let raw = self.rpc.get_config(device, LATEST_DATA_KEY).await?;
        let records = payload::decode_records(&raw)?;

        if records.len() != 2 {
            return Err(MeterError::Shape(records.len()));
        }

        let header = &records[0];
        let timestamp = header
            .timestamp
            .ok_or_else(|| MeterError::decode_error("first record is missing the timestamp field"))?;
        let meter_serial = header
            .meter_serial
            .clone()
            .ok_or_else(|| MeterError::decode_error("first record is missing the meter serial field"))?;

        // Any record may carry measurements; flatten them in record order.
        let metrics = mapper::map_entries(
            records
                .iter()
                .filter_map(|record| record.measurements.as_deref())
                .flatten(),
        );

        debug!(
            device,
            timestamp,
            serial = %meter_serial,
            metric_count = metrics.len(),
            "device poll complete"
        );

        Ok(SampleSet {
            timestamp,
            meter_serial,
            metrics,
        })
    }
}

impl Default for DeviceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::catalog::MetricKind;
    use base64::prelude::{Engine, BASE64_STANDARD};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Transport stub that replays one canned reply and counts attempts.
    struct FixedRpc {
        reply: std::result::Result<RawResponse, String>,
        attempts: Arc<AtomicU32>,
    }

    #[async_trait]
    impl MeterRpc for FixedRpc {
        async fn get_config(&self, _device: &str, _key: &str) -> Result<RawResponse> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(raw) => Ok(raw.clone()),
                Err(msg) => Err(MeterError::transport_error(msg.clone())),
            }
        }
    }

    fn scripted_client(
        reply: std::result::Result<RawResponse, String>,
    ) -> (DeviceClient, Arc<AtomicU32>) {
        let attempts = Arc::new(AtomicU32::new(0));
        let rpc = FixedRpc {
            reply,
            attempts: attempts.clone(),
        };
        (
            DeviceClient::with_rpc(Box::new(rpc), RetryPolicy::default()),
            attempts,
        )
    }

    fn encoded_response(records_json: &str) -> RawResponse {
        RawResponse {
            status: 200,
            body: format!(
                r#"{{"id":1,"jsonrpc":"2.0","result":"{}"}}"#,
                BASE64_STANDARD.encode(records_json)
            ),
        }
    }

    #[tokio::test]
    async fn test_fetch_latest_data_success() {
        let raw = encoded_response(
            r#"[{"t":1000,"m":"SN1"},{"d":[{"o":"0100100700ff","v":"1234"}]}]"#,
        );
        let (client, attempts) = scripted_client(Ok(raw));

        let samples = client.fetch_latest_data("meter.local").await.unwrap();
        assert_eq!(samples.timestamp, 1000);
        assert_eq!(samples.meter_serial, "SN1");
        assert_eq!(
            samples.metrics.get(&MetricKind::WirkleistungAktuell),
            Some(&1234)
        );
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_measurements_flattened_across_both_records() {
        let raw = encoded_response(
            r#"[{"t":1,"m":"SN1","d":[{"o":"0100010800ff","v":"10"}]},{"d":[{"o":"0100020800ff","v":"20"}]}]"#,
        );
        let (client, _) = scripted_client(Ok(raw));

        let samples = client.fetch_latest_data("meter.local").await.unwrap();
        assert_eq!(
            samples.metrics.get(&MetricKind::ZaehlerstandAplus),
            Some(&10)
        );
        assert_eq!(
            samples.metrics.get(&MetricKind::ZaehlerstandAminus),
            Some(&20)
        );
    }

    #[tokio::test]
    async fn test_unknown_code_does_not_abort_the_poll() {
        let raw = encoded_response(
            r#"[{"t":1,"m":"SN1"},{"d":[{"o":"9999990000ff","v":"7"},{"o":"0100100700ff","v":"42"}]}]"#,
        );
        let (client, _) = scripted_client(Ok(raw));

        let samples = client.fetch_latest_data("meter.local").await.unwrap();
        assert_eq!(samples.metrics.len(), 1);
        assert_eq!(
            samples.metrics.get(&MetricKind::WirkleistungAktuell),
            Some(&42)
        );
    }

    #[tokio::test]
    async fn test_non_200_fails_after_one_attempt() {
        let raw = RawResponse {
            status: 503,
            body: String::new(),
        };
        let (client, attempts) = scripted_client(Ok(raw));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_error_fails_after_one_attempt() {
        let (client, attempts) = scripted_client(Err("connection refused".to_string()));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_fails_after_one_attempt() {
        let raw = RawResponse {
            status: 200,
            body: "not json".to_string(),
        };
        let (client, attempts) = scripted_client(Ok(raw));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_header_fields_fail_after_one_attempt() {
        let raw = encoded_response(r#"[{"m":"SN1"},{"d":[]}]"#);
        let (client, attempts) = scripted_client(Ok(raw));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_record_set_exhausts_retry_budget() {
        let raw = encoded_response(r#"[{"t":1,"m":"SN1"}]"#);
        let (client, attempts) = scripted_client(Ok(raw));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_record_set_exhausts_retry_budget() {
        let raw = encoded_response(r#"[{"t":1,"m":"SN1"},{},{}]"#);
        let (client, attempts) = scripted_client(Ok(raw));

        assert!(client.fetch_latest_data("meter.local").await.is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 10);
    }
}
