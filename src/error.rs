//! Error handling for the powerfox exporter.

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, MeterError>;

/// The main error type for device-query and exposition operations.
///
/// Only [`MeterError::Shape`] is retryable: a response that decoded cleanly
/// but does not contain exactly two records may simply be a device that has
/// not finished assembling its latest data. Everything else aborts the
/// current poll immediately.
#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    /// Device request failed at the transport level
    #[error("transport error: {0}")]
    Transport(String),

    /// Response payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Decoded record set does not contain exactly two records
    #[error("unexpected record set shape: expected 2 records, got {0}")]
    Shape(usize),

    /// Metrics text exposition failed
    #[error("exposition error: {0}")]
    Exposition(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("web server error: {0}")]
    WebServer(String),
}

impl MeterError {
    /// Create a new transport error
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new decode error
    pub fn decode_error(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new exposition error
    pub fn exposition_error(msg: impl Into<String>) -> Self {
        Self::Exposition(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Whether the device query that produced this error may be retried.
    ///
    /// The retry policy is deliberately asymmetric: transport and decode
    /// failures give up immediately, only a well-formed response with the
    /// wrong record count is worth asking again for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Shape(_))
    }
}

impl From<reqwest::Error> for MeterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for MeterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for MeterError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}
