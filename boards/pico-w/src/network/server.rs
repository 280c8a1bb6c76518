#![deny(unsafe_code)]
#![deny(warnings)]
//! HTTP accept loop
//!
//! One socket, one connection at a time: accept, serve a single request
//! under a deadline, close, repeat.

use defmt::{debug, info, warn};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use hal_abstractions::{AddressSource, AnalogBank, UptimeClock};
use thermo_core::http::Status;
use thermo_core::{ServeError, Service};

use super::error::NetworkError;
use super::socket::HttpConnection;
use crate::config::HttpConfig;

const RX_BUFFER_LEN: usize = 1536;
const TX_BUFFER_LEN: usize = 2048;

/// Serve HTTP forever
pub async fn run<B, N, C>(
    stack: Stack<'static>,
    service: &mut Service<'_, B, N, C>,
    config: &HttpConfig,
) -> !
where
    B: AnalogBank,
    N: AddressSource,
    C: UptimeClock,
{
    let mut rx_buffer = [0u8; RX_BUFFER_LEN];
    let mut tx_buffer = [0u8; TX_BUFFER_LEN];

    info!(
        "HTTP server listening on port {} ({} routes)",
        config.port,
        service.router().routes().len()
    );

    loop {
        let mut conn = HttpConnection::new(stack, &mut rx_buffer, &mut tx_buffer);
        conn.set_timeout(Some(Duration::from_secs(config.socket_timeout_secs)));

        if let Err(e) = conn.accept(config.port).await {
            warn!("Accept failed: {:?}", e);
            continue;
        }
        debug!("Connection from {:?}", conn.remote_endpoint());

        match serve_one(service, &mut conn, config).await {
            Ok(status) => debug!("Responded {}", status.code()),
            Err(NetworkError::ConnectionClosed) => debug!("Client closed without a request"),
            Err(e) => warn!("Connection dropped: {}", e),
        }

        conn.close().await;
    }
}

/// Serve one request, bounded by the request timeout
async fn serve_one<B, N, C>(
    service: &mut Service<'_, B, N, C>,
    conn: &mut HttpConnection<'_>,
    config: &HttpConfig,
) -> Result<Status, NetworkError>
where
    B: AnalogBank,
    N: AddressSource,
    C: UptimeClock,
{
    let deadline = Duration::from_secs(config.request_timeout_secs);
    match with_timeout(deadline, service.serve(conn)).await {
        Ok(Ok(status)) => Ok(status),
        Ok(Err(ServeError::ConnectionClosed)) => Err(NetworkError::ConnectionClosed),
        Ok(Err(e)) => {
            warn!("Request failed: {}", e);
            Err(NetworkError::SocketError)
        }
        Err(_) => Err(NetworkError::Timeout),
    }
}
