//! Line-oriented request reader.
//!
//! Framing is deliberately naive: the request line and header block are read
//! line by line up to the first blank line, and the body is whatever the
//! transport already holds once the headers are consumed. `Content-Length` and
//! chunked encoding are never consulted, so a client that sends its body in a
//! later burst than its headers is seen with an empty body.

use crate::http::BUFFER_SIZE;
use crate::http::error::ParseError;
use crate::http::raw::RawRequest;
use bytes::{BufMut, BytesMut};
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::net::TcpStream;
use std::time::Duration;

/// A source that can report the bytes it has on hand without waiting for more.
pub trait PendingRead: Read {
    /// Reads bytes that are already available, blocking for at most `wait`.
    /// `Ok(0)` means nothing is available right now or the stream ended.
    fn read_pending(&mut self, buf: &mut [u8], wait: Duration) -> io::Result<usize>;
}

impl PendingRead for TcpStream {
    fn read_pending(&mut self, buf: &mut [u8], wait: Duration) -> io::Result<usize> {
        // A zero read timeout is rejected by the OS, so "no wait" is non-blocking mode.
        if wait.is_zero() {
            self.set_nonblocking(true)?;
        } else {
            self.set_read_timeout(Some(wait))?;
        }

        let result = match self.read(buf) {
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            other => other,
        };

        if wait.is_zero() {
            self.set_nonblocking(false)?;
        } else {
            self.set_read_timeout(None)?;
        }

        result
    }
}

impl PendingRead for &[u8] {
    fn read_pending(&mut self, buf: &mut [u8], _wait: Duration) -> io::Result<usize> {
        self.read(buf)
    }
}

/// Reads one request off `source`.
///
/// Fails with [`ParseError::Closed`] if the stream ends before a request line.
/// A stream that ends inside the header block yields the headers read so far.
pub fn read_raw_request<S: PendingRead>(
    source: &mut S,
    wait: Duration,
) -> Result<RawRequest, ParseError> {
    let mut rdr = BufReader::with_capacity(BUFFER_SIZE, source);

    let method_line = read_line(&mut rdr)?.ok_or(ParseError::Closed)?;

    let mut header_lines = Vec::new();
    while let Some(line) = read_line(&mut rdr)? {
        if line.trim().is_empty() {
            break;
        }
        header_lines.push(line);
    }

    let body = read_available(&mut rdr, wait)?;

    Ok(RawRequest::new(method_line, header_lines.join("\n"), body))
}

fn read_line(rdr: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    if rdr.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

// Body = what the line reader already buffered + what the transport holds right now.
// Bytes arriving after this point belong to nobody; the connection is closed unread.
fn read_available<S: PendingRead>(
    rdr: &mut BufReader<&mut S>,
    wait: Duration,
) -> io::Result<String> {
    let mut body = BytesMut::new();

    let buffered = rdr.buffer().len();
    body.put_slice(rdr.buffer());
    rdr.consume(buffered);

    let mut chunk = [0u8; BUFFER_SIZE];
    loop {
        let n = rdr.get_mut().read_pending(&mut chunk, wait)?;
        if n == 0 {
            break;
        }
        body.put_slice(&chunk[..n]);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
