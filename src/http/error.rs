use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed before a request line was received")]
    Closed,
    #[error("empty request line")]
    EmptyRequestLine,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("unknown HTTP method: {0:?}")]
    UnknownMethod(String),
    #[error("failed to read request")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("fail to create socket on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("fail to accept connection")]
    Accept(#[source] io::Error),
    #[error("worker pool unavailable: {0}")]
    Pool(String),
}
