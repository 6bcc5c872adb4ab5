//! A minimal HTTP/1.1 server on blocking sockets: one request per connection,
//! exact-path routing per method, and a fixed `200 OK` text envelope.

pub mod error;
pub mod handler;
pub mod method;
pub mod raw;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod status;
pub mod wire;

pub use error::{ParseError, ServerError};
pub use handler::HandlerFunc;
pub use method::HttpMethod;
pub use raw::RawRequest;
pub use request::Request;
pub use response::{FALLBACK_BODY, Response};
pub use router::{RouteTable, Router};
pub use server::{Listener, Server};
pub use status::Status;

pub(crate) const BUFFER_SIZE: usize = 1024;
