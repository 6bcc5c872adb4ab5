use crate::http::status::Status;
use bytes::{BufMut, Bytes, BytesMut};

pub const FALLBACK_BODY: &str = "Hello, World!";

/// The two response shapes the server ever writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Bare status line with no headers or body. Only used when the request could not be parsed.
    Minimal,
    Text(String),
}

impl Response {
    pub fn minimal() -> Response {
        Response::Minimal
    }

    pub fn text(body: impl Into<String>) -> Response {
        Response::Text(body.into())
    }

    pub fn fallback() -> Response {
        Response::text(FALLBACK_BODY)
    }

    pub fn status(&self) -> Status {
        Status::OK
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Response::Minimal => None,
            Response::Text(body) => Some(body.as_str()),
        }
    }

    /// Wire form. No `Content-Length`: the body ends where the connection does.
    pub fn to_bytes(&self) -> Bytes {
        let status = self.status();
        let status_line = format!("HTTP/1.1 {} {}", status.code_num, status.message);

        match self {
            Response::Minimal => Bytes::from(status_line),
            Response::Text(body) => {
                let mut buf = BytesMut::with_capacity(status_line.len() + body.len() + 32);
                buf.put_slice(status_line.as_bytes());
                buf.put_slice(b"\r\nContent-Type: text/plain\r\n\r\n");
                buf.put_slice(body.as_bytes());
                buf.freeze()
            }
        }
    }
}
