#![deny(unsafe_code)]
#![deny(warnings)]
//! Async TCP connection wrapper for the HTTP server
//!
//! This module provides a wrapper around `embassy_net::tcp::TcpSocket`
//! that implements the `embedded-io-async` traits `thermo_core::Service`
//! reads requests from and writes responses to.

use embassy_net::tcp::TcpSocket;
use embassy_net::{IpEndpoint, Stack};
use embassy_time::Duration;
use embedded_io_async::{ErrorType, Read, Write};

use super::error::NetworkError;

/// One accepted HTTP connection
///
/// # Example
///
/// ```no_run
/// let mut conn = HttpConnection::new(stack, &mut rx_buffer, &mut tx_buffer);
/// conn.accept(80).await?;
/// service.serve(&mut conn).await?;
/// conn.close().await;
/// ```
pub struct HttpConnection<'a> {
    socket: TcpSocket<'a>,
}

impl<'a> HttpConnection<'a> {
    /// Create a new connection around fresh socket buffers
    ///
    /// # Arguments
    ///
    /// * `stack` - Embassy network stack
    /// * `rx_buffer` - Buffer for receiving data (a request head fits in 1 KB)
    /// * `tx_buffer` - Buffer for transmitting data
    pub fn new(stack: Stack<'a>, rx_buffer: &'a mut [u8], tx_buffer: &'a mut [u8]) -> Self {
        Self {
            socket: TcpSocket::new(stack, rx_buffer, tx_buffer),
        }
    }

    /// Abort the connection if the peer is silent for `timeout`
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.socket.set_timeout(timeout);
    }

    /// Wait for a client on `port`
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::SocketError` if the socket cannot listen
    pub async fn accept(&mut self, port: u16) -> Result<(), NetworkError> {
        self.socket
            .accept(port)
            .await
            .map_err(|_| NetworkError::SocketError)
    }

    /// Remote endpoint of the accepted client
    pub fn remote_endpoint(&self) -> Option<IpEndpoint> {
        self.socket.remote_endpoint()
    }

    /// Close our side and wait for queued data to drain
    pub async fn close(&mut self) {
        self.socket.close();
        if self.socket.flush().await.is_err() {
            self.socket.abort();
        }
    }
}

/// Error type for embedded-io-async traits
///
/// We use NetworkError as our error type to maintain consistency
/// with the rest of the network module.
impl ErrorType for HttpConnection<'_> {
    type Error = NetworkError;
}

impl Read for HttpConnection<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.socket
            .read(buf)
            .await
            .map_err(|_| NetworkError::ConnectionClosed)
    }
}

impl Write for HttpConnection<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.socket
            .write(buf)
            .await
            .map_err(|_| NetworkError::SocketError)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.socket
            .flush()
            .await
            .map_err(|_| NetworkError::SocketError)
    }
}
