//! Response status, content types, and response writing

use core::fmt::Write as _;

use embedded_io_async::Write;
use heapless::String;

use crate::error::ServeError;

/// Bytes reserved for a response head
const RESPONSE_HEAD_LEN: usize = 384;

/// Methods advertised in `Allow` and CORS preflight responses
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Response status codes used by the server
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    HeaderFieldsTooLarge,
    InternalError,
}

impl Status {
    pub const fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::HeaderFieldsTooLarge => 431,
            Self::InternalError => 500,
        }
    }

    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::HeaderFieldsTooLarge => "Request Header Fields Too Large",
            Self::InternalError => "Internal Server Error",
        }
    }

    /// Short lowercase description used in JSON error bodies
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoContent => "no content",
            Self::BadRequest => "bad request",
            Self::NotFound => "not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::HeaderFieldsTooLarge => "request header fields too large",
            Self::InternalError => "internal error",
        }
    }
}

/// Response content types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentType {
    Html,
    Css,
    JavaScript,
    Json,
    Svg,
    Icon,
    Text,
    OctetStream,
}

impl ContentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Css => "text/css; charset=utf-8",
            Self::JavaScript => "text/javascript; charset=utf-8",
            Self::Json => "application/json",
            Self::Svg => "image/svg+xml",
            Self::Icon => "image/x-icon",
            Self::Text => "text/plain; charset=utf-8",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// Infer a content type from a file path's extension
pub fn content_type_for(path: &str) -> ContentType {
    let file = path.rsplit('/').next().unwrap_or(path);
    let extension = match file.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return ContentType::OctetStream,
    };

    match extension.as_bytes() {
        b"html" | b"htm" => ContentType::Html,
        b"css" => ContentType::Css,
        b"js" | b"mjs" => ContentType::JavaScript,
        b"json" => ContentType::Json,
        b"svg" => ContentType::Svg,
        b"ico" => ContentType::Icon,
        b"txt" => ContentType::Text,
        _ => ContentType::OctetStream,
    }
}

/// Render the status line and headers of a response
///
/// Every response closes the connection and allows any origin.
pub fn render_head(
    status: Status,
    content_type: Option<ContentType>,
    content_length: usize,
) -> Result<String<RESPONSE_HEAD_LEN>, ServeError> {
    let mut head = String::new();
    render_into(&mut head, status, content_type, content_length)
        .map_err(|_| ServeError::ResponseTooLarge)?;
    Ok(head)
}

fn render_into(
    head: &mut String<RESPONSE_HEAD_LEN>,
    status: Status,
    content_type: Option<ContentType>,
    content_length: usize,
) -> core::fmt::Result {
    write!(head, "HTTP/1.1 {} {}\r\n", status.code(), status.reason())?;
    if let Some(content_type) = content_type {
        write!(head, "Content-Type: {}\r\n", content_type.as_str())?;
    }
    write!(head, "Content-Length: {}\r\n", content_length)?;
    head.push_str("Connection: close\r\n")
        .map_err(|_| core::fmt::Error)?;
    head.push_str("Access-Control-Allow-Origin: *\r\n")
        .map_err(|_| core::fmt::Error)?;
    match status {
        Status::NoContent => {
            write!(head, "Access-Control-Allow-Methods: {}\r\n", ALLOWED_METHODS)?;
            head.push_str("Access-Control-Allow-Headers: *\r\n")
                .map_err(|_| core::fmt::Error)?;
            head.push_str("Access-Control-Max-Age: 86400\r\n")
                .map_err(|_| core::fmt::Error)?;
        }
        Status::MethodNotAllowed => {
            write!(head, "Allow: {}\r\n", ALLOWED_METHODS)?;
        }
        _ => {}
    }
    head.push_str("\r\n").map_err(|_| core::fmt::Error)
}

/// Write a complete response
///
/// `Content-Length` always describes `body`; with `include_body` false (HEAD)
/// the body bytes are not sent.
pub async fn write_response<W: Write>(
    conn: &mut W,
    status: Status,
    content_type: Option<ContentType>,
    body: &[u8],
    include_body: bool,
) -> Result<(), ServeError> {
    let head = render_head(status, content_type, body.len())?;
    conn.write_all(head.as_bytes())
        .await
        .map_err(|_| ServeError::Io)?;
    if include_body && !body.is_empty() {
        conn.write_all(body).await.map_err(|_| ServeError::Io)?;
    }
    conn.flush().await.map_err(|_| ServeError::Io)
}
