//! Connection service
//!
//! Serves exactly one request per connection: read the head, route it, run
//! the handler, write the response. Socket lifecycle, accept loops and
//! timeouts belong to the caller.

use embedded_io_async::{Read, Write};
use hal_abstractions::{AddressSource, AnalogBank, UptimeClock};
use serde::Serialize;

use crate::assets::{self, StaticAsset};
use crate::error::ServeError;
use crate::handlers::{HealthContext, SensorContext};
use crate::http::{self, ContentType, Request, Status, REQUEST_BUFFER_LEN};
use crate::report::ErrorBody;
use crate::router::{Endpoint, Resolution, Router};

/// Bytes reserved for a JSON body
pub const JSON_BUFFER_LEN: usize = 256;

/// Everything needed to answer requests
pub struct Service<'a, B: AnalogBank, N: AddressSource, C: UptimeClock> {
    router: Router,
    sensors: SensorContext<'a, B>,
    health: HealthContext<'a, N, C>,
    assets: &'a [StaticAsset],
}

impl<'a, B, N, C> Service<'a, B, N, C>
where
    B: AnalogBank,
    N: AddressSource,
    C: UptimeClock,
{
    pub fn new(
        router: Router,
        sensors: SensorContext<'a, B>,
        health: HealthContext<'a, N, C>,
        assets: &'a [StaticAsset],
    ) -> Self {
        Self {
            router,
            sensors,
            health,
            assets,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Serve one request on `conn`
    ///
    /// Returns the status sent. Errors mean the connection should be dropped;
    /// request-level problems that can still be answered are answered first.
    pub async fn serve<T: Read + Write>(&mut self, conn: &mut T) -> Result<Status, ServeError> {
        let mut buf = [0u8; REQUEST_BUFFER_LEN];
        let head = match http::read_head(conn, &mut buf).await {
            Ok(head) => head,
            Err(ServeError::RequestTooLarge) => {
                warn!("request head exceeds {} bytes", REQUEST_BUFFER_LEN);
                return self
                    .respond_error(conn, Status::HeaderFieldsTooLarge, true)
                    .await;
            }
            Err(ServeError::MalformedRequest) => {
                return self.respond_error(conn, Status::BadRequest, true).await;
            }
            Err(e) => return Err(e),
        };

        let request = match Request::parse(head) {
            Ok(request) => request,
            Err(_) => {
                warn!("malformed request line");
                return self.respond_error(conn, Status::BadRequest, true).await;
            }
        };

        let status = self.dispatch(conn, &request).await?;
        info!(
            "{} {} -> {}",
            request.method.as_str(),
            request.path,
            status.code()
        );
        Ok(status)
    }

    async fn dispatch<T: Write>(
        &mut self,
        conn: &mut T,
        request: &Request<'_>,
    ) -> Result<Status, ServeError> {
        match self.router.resolve(request.method, request.path) {
            Resolution::Found {
                endpoint,
                include_body,
            } => self.respond_endpoint(conn, endpoint, include_body).await,
            Resolution::Preflight => {
                http::write_response(conn, Status::NoContent, None, &[], false).await?;
                Ok(Status::NoContent)
            }
            Resolution::MethodNotAllowed => {
                self.respond_error(conn, Status::MethodNotAllowed, true)
                    .await
            }
            Resolution::NotFound => self.respond_error(conn, Status::NotFound, true).await,
        }
    }

    async fn respond_endpoint<T: Write>(
        &mut self,
        conn: &mut T,
        endpoint: Endpoint,
        include_body: bool,
    ) -> Result<Status, ServeError> {
        match endpoint {
            Endpoint::Telemetry => {
                let report = self.sensors.telemetry().await;
                respond_json(conn, Status::Ok, &report, include_body).await
            }
            Endpoint::Health => {
                let report = self.health.report();
                respond_json(conn, Status::Ok, &report, include_body).await
            }
            Endpoint::Asset(path) => match assets::find(self.assets, path) {
                Some(asset) => {
                    http::write_response(
                        conn,
                        Status::Ok,
                        Some(asset.content_type()),
                        asset.body,
                        include_body,
                    )
                    .await?;
                    Ok(Status::Ok)
                }
                None => {
                    warn!("route points at missing asset {}", path);
                    self.respond_error(conn, Status::NotFound, include_body)
                        .await
                }
            },
        }
    }

    async fn respond_error<T: Write>(
        &self,
        conn: &mut T,
        status: Status,
        include_body: bool,
    ) -> Result<Status, ServeError> {
        let body = ErrorBody {
            error: status.message(),
        };
        respond_json(conn, status, &body, include_body).await
    }
}

/// Serialize `value` and send it; an oversized body becomes a 500
async fn respond_json<T: Write, V: Serialize>(
    conn: &mut T,
    status: Status,
    value: &V,
    include_body: bool,
) -> Result<Status, ServeError> {
    let mut body = [0u8; JSON_BUFFER_LEN];
    let (status, len) = match serde_json_core::to_slice(value, &mut body) {
        Ok(len) => (status, len),
        Err(_) => {
            error!("JSON body exceeds {} bytes", JSON_BUFFER_LEN);
            let fallback = ErrorBody {
                error: Status::InternalError.message(),
            };
            let len =
                serde_json_core::to_slice(&fallback, &mut body).map_err(|_| ServeError::ResponseTooLarge)?;
            (Status::InternalError, len)
        }
    };

    http::write_response(
        conn,
        status,
        Some(ContentType::Json),
        &body[..len],
        include_body,
    )
    .await?;
    Ok(status)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calibration::CalibrationParameters;
    use crate::handlers::mocks::{FixedAddress, FixedBank, SteppingClock};
    use core::net::Ipv4Addr;
    use embassy_futures::block_on;
    use embedded_io_async::ErrorType;

    /// In-memory connection: scripted reads, captured writes
    pub struct MockConnection<'a> {
        chunks: &'a [&'a [u8]],
        offset: usize,
        pub written: heapless::Vec<u8, 2048>,
    }

    impl<'a> MockConnection<'a> {
        pub fn chunked(chunks: &'a [&'a [u8]]) -> Self {
            Self {
                chunks,
                offset: 0,
                written: heapless::Vec::new(),
            }
        }
    }

    impl ErrorType for MockConnection<'_> {
        type Error = embedded_io_async::ErrorKind;
    }

    impl Read for MockConnection<'_> {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let Some((chunk, rest)) = self.chunks.split_first() else {
                return Ok(0);
            };
            let remaining = &chunk[self.offset..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.offset += n;
            if self.offset == chunk.len() {
                self.chunks = rest;
                self.offset = 0;
            }
            Ok(n)
        }
    }

    impl Write for MockConnection<'_> {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.written
                .extend_from_slice(buf)
                .map_err(|_| embedded_io_async::ErrorKind::OutOfMemory)?;
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    const ASSETS: &[StaticAsset] = &[StaticAsset::new("/index.html", b"<h1>pico</h1>")];

    type Captured = heapless::Vec<u8, 2048>;

    fn text(written: &Captured) -> &str {
        core::str::from_utf8(written).unwrap()
    }

    /// Body after the blank line
    fn body(written: &Captured) -> &str {
        text(written)
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or("")
    }

    fn run(request: &[u8], t1: u16, t2: u16, address: Option<Ipv4Addr>) -> (Status, Captured) {
        let mut bank = FixedBank::new(Ok(t1), Ok(t2));
        let network = FixedAddress(address);
        let clock = SteppingClock::starting_at(3_250_000);
        let mut service = Service::new(
            Router::standard(),
            SensorContext::new(CalibrationParameters::default(), &mut bank),
            HealthContext::new(&network, &clock),
            ASSETS,
        );
        let chunks: [&[u8]; 1] = [request];
        let mut conn = MockConnection::chunked(&chunks);
        let status = block_on(service.serve(&mut conn)).unwrap();
        (status, conn.written)
    }

    #[test]
    fn test_temps_end_to_end() {
        let (status, conn) = run(b"GET /api/temps HTTP/1.1\r\nHost: pico\r\n\r\n", 32768, 0, None);
        assert_eq!(status, Status::Ok);
        assert!(text(&conn).starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text(&conn).contains("Content-Type: application/json\r\n"));
        assert_eq!(
            body(&conn),
            r#"{"sensors":[{"name":"T1","temperature_celsius":25.0},{"name":"T2","temperature_celsius":null}]}"#
        );
    }

    #[test]
    fn test_temps_both_faulted() {
        let (_, conn) = run(b"GET /api/temps HTTP/1.1\r\n\r\n", 0, u16::MAX, None);
        assert_eq!(
            body(&conn),
            r#"{"sensors":[{"name":"T1","temperature_celsius":null},{"name":"T2","temperature_celsius":null}]}"#
        );
    }

    #[test]
    fn test_health_end_to_end() {
        let (status, conn) = run(
            b"GET /api/health HTTP/1.1\r\n\r\n",
            0,
            0,
            Some(Ipv4Addr::new(192, 168, 1, 50)),
        );
        assert_eq!(status, Status::Ok);
        assert_eq!(
            body(&conn),
            r#"{"status":"ok","platform":"rp2040","ip":"192.168.1.50","uptime":3.25}"#
        );
    }

    #[test]
    fn test_health_unknown_address() {
        let (status, conn) = run(b"GET /api/health HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::Ok);
        assert!(body(&conn).contains(r#""status":"ok""#));
        assert!(body(&conn).contains(r#""ip":"unknown""#));
    }

    #[test]
    fn test_index_served() {
        let (status, conn) = run(b"GET / HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::Ok);
        assert!(text(&conn).contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(text(&conn).contains("Content-Length: 13\r\n"));
        assert_eq!(body(&conn), "<h1>pico</h1>");
    }

    #[test]
    fn test_head_omits_body() {
        let (status, conn) = run(b"HEAD / HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::Ok);
        assert!(text(&conn).contains("Content-Length: 13\r\n"));
        assert_eq!(body(&conn), "");
    }

    #[test]
    fn test_not_found() {
        let (status, conn) = run(b"GET /api/cpu HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::NotFound);
        assert!(text(&conn).starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(body(&conn), r#"{"error":"not found"}"#);
    }

    #[test]
    fn test_method_not_allowed() {
        let (status, conn) = run(b"POST /api/temps HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::MethodNotAllowed);
        assert!(text(&conn).contains("Allow: GET, HEAD, OPTIONS\r\n"));
        assert_eq!(body(&conn), r#"{"error":"method not allowed"}"#);
    }

    #[test]
    fn test_preflight() {
        let (status, conn) = run(b"OPTIONS /api/temps HTTP/1.1\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::NoContent);
        assert!(text(&conn).starts_with("HTTP/1.1 204 No Content\r\n"));
        assert!(text(&conn).contains("Access-Control-Allow-Origin: *\r\n"));
        assert_eq!(body(&conn), "");
    }

    #[test]
    fn test_bad_request() {
        let (status, conn) = run(b"NONSENSE\r\n\r\n", 0, 0, None);
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body(&conn), r#"{"error":"bad request"}"#);
    }

    #[test]
    fn test_oversized_head() {
        let mut huge = [b'a'; REQUEST_BUFFER_LEN + 16];
        huge[..4].copy_from_slice(b"GET ");
        let (status, conn) = run(&huge, 0, 0, None);
        assert_eq!(status, Status::HeaderFieldsTooLarge);
        assert!(text(&conn).starts_with("HTTP/1.1 431 "));
    }

    #[test]
    fn test_closed_connection_is_error() {
        let mut bank = FixedBank::new(Ok(0), Ok(0));
        let network = FixedAddress(None);
        let clock = SteppingClock::starting_at(0);
        let mut service = Service::new(
            Router::standard(),
            SensorContext::new(CalibrationParameters::default(), &mut bank),
            HealthContext::new(&network, &clock),
            ASSETS,
        );
        let mut conn = MockConnection::chunked(&[]);
        assert_eq!(
            block_on(service.serve(&mut conn)),
            Err(ServeError::ConnectionClosed)
        );
        assert!(conn.written.is_empty());
    }
}
