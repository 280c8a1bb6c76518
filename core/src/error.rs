//! Connection-level error types

/// Errors while serving one HTTP connection
///
/// Sensor faults and missing addresses never appear here; they are part of
/// a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServeError {
    /// Transport read or write failed
    Io,
    /// Peer closed before sending a complete request head
    ConnectionClosed,
    /// Request line could not be parsed
    MalformedRequest,
    /// Request head does not fit the request buffer
    RequestTooLarge,
    /// Response head or body does not fit its buffer
    ResponseTooLarge,
}

impl core::fmt::Display for ServeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "Connection I/O error"),
            Self::ConnectionClosed => write!(f, "Connection closed by peer"),
            Self::MalformedRequest => write!(f, "Malformed request"),
            Self::RequestTooLarge => write!(f, "Request head too large"),
            Self::ResponseTooLarge => write!(f, "Response too large"),
        }
    }
}

impl core::error::Error for ServeError {}
