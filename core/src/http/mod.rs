//! Minimal HTTP/1.1 codec
//!
//! Just enough of the protocol for a one-request-per-connection JSON API:
//! - **`request`**: read and parse a request head
//! - **`response`**: status codes, content types, and response writing

pub mod request;
pub mod response;

pub use request::{read_head, Method, Request, REQUEST_BUFFER_LEN};
pub use response::{content_type_for, write_response, ContentType, Status};
