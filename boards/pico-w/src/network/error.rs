#![deny(unsafe_code)]
#![deny(warnings)]
//! Network error types

use defmt::Format;

/// Network operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum NetworkError {
    /// Wi-Fi association failed on every attempt
    JoinFailed,
    /// Socket accept/read/write error
    SocketError,
    /// Peer closed the connection
    ConnectionClosed,
    /// Request timeout
    Timeout,
}

impl core::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::JoinFailed => write!(f, "Wi-Fi join failed"),
            Self::SocketError => write!(f, "Socket error"),
            Self::ConnectionClosed => write!(f, "Connection closed"),
            Self::Timeout => write!(f, "Request timeout"),
        }
    }
}

// Implement core::error::Error for no_std compatibility
impl core::error::Error for NetworkError {}

impl embedded_io_async::Error for NetworkError {
    fn kind(&self) -> embedded_io_async::ErrorKind {
        match self {
            Self::SocketError | Self::ConnectionClosed => embedded_io_async::ErrorKind::BrokenPipe,
            Self::Timeout => embedded_io_async::ErrorKind::TimedOut,
            Self::JoinFailed => embedded_io_async::ErrorKind::NotConnected,
        }
    }
}
