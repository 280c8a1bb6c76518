//! Request head parsing

use embedded_io_async::Read;

use crate::error::ServeError;

/// Bytes reserved for a request head
pub const REQUEST_BUFFER_LEN: usize = 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request method
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Delete,
    Patch,
    Other,
}

impl Method {
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            _ => Self::Other,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Other => "OTHER",
        }
    }
}

/// Parsed request line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    /// Path without the query string
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Parse the request line at the start of a request head
    ///
    /// Headers are ignored; the API takes no input besides the path.
    pub fn parse(head: &'a [u8]) -> Result<Self, ServeError> {
        let line_end = head
            .windows(2)
            .position(|w| w == b"\r\n")
            .unwrap_or(head.len());
        let line =
            core::str::from_utf8(&head[..line_end]).map_err(|_| ServeError::MalformedRequest)?;

        let mut parts = line.split(' ');
        let method = parts.next().filter(|m| !m.is_empty());
        let target = parts.next();
        let version = parts.next();
        if parts.next().is_some() {
            return Err(ServeError::MalformedRequest);
        }

        let (method, target) = match (method, target, version) {
            (Some(m), Some(t), Some(v)) if v.starts_with("HTTP/1.") && t.starts_with('/') => {
                (Method::parse(m), t)
            }
            _ => return Err(ServeError::MalformedRequest),
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Ok(Self {
            method,
            path,
            query,
        })
    }
}

/// Read from `conn` until a full request head is buffered
///
/// Returns the head including its terminating blank line. Any bytes of a
/// body that arrived in the same read are left in `buf` past the head.
pub async fn read_head<'b, R: Read>(
    conn: &mut R,
    buf: &'b mut [u8],
) -> Result<&'b [u8], ServeError> {
    let mut len = 0;
    loop {
        if let Some(end) = find_terminator(&buf[..len]) {
            return Ok(&buf[..end]);
        }
        if len == buf.len() {
            return Err(ServeError::RequestTooLarge);
        }

        let n = conn.read(&mut buf[len..]).await.map_err(|_| ServeError::Io)?;
        if n == 0 {
            return Err(if len == 0 {
                ServeError::ConnectionClosed
            } else {
                ServeError::MalformedRequest
            });
        }
        len += n;
    }
}

fn find_terminator(data: &[u8]) -> Option<usize> {
    data.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|pos| pos + HEAD_TERMINATOR.len())
}
