use std::collections::HashMap;

use bytes::{BufMut, Bytes, BytesMut};
use http::StatusCode;

/// A response under construction: built by a route handler, mutated at
/// most once more by the encoding step, then serialized and discarded.
///
/// The serializer injects no headers on its own. In particular, setting
/// `Content-Length` for a non-empty body is the handler's obligation.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: HashMap::new(), body: Bytes::new() }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// Used by the encoding step to rewrite `Content-Encoding` and
    /// `Content-Length` after swapping in a compressed body.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn replace_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Serializes to wire bytes: status line, one line per header entry
    /// (order unspecified), a blank line, the body verbatim, a trailing
    /// `\r\n`.
    pub fn to_bytes(&self) -> Bytes {
        let reason = self.status.canonical_reason().unwrap_or("");

        let mut buf = BytesMut::with_capacity(64 + self.body.len());
        buf.put_slice(format!("HTTP/1.1 {} {}\r\n", self.status.as_u16(), reason).as_bytes());

        for (name, value) in &self.headers {
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"\r\n");
        buf.put_slice(&self.body);
        buf.put_slice(b"\r\n");

        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_headerless_response() {
        let response = Response::new(StatusCode::NOT_FOUND);

        assert_eq!(&response.to_bytes()[..], b"HTTP/1.1 404 Not Found\r\n\r\n\r\n");
    }

    #[test]
    fn serialize_with_headers_and_body() {
        let response = Response::new(StatusCode::OK)
            .header("Content-Type", "text/plain")
            .body("abc");

        let bytes = response.to_bytes();
        assert_eq!(&bytes[..], b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nabc\r\n");
    }

    #[test]
    fn every_header_entry_is_written_once() {
        let response = Response::new(StatusCode::OK)
            .header("Content-Type", "text/plain")
            .header("Content-Length", "3")
            .body("abc");

        let bytes = response.to_bytes();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(text.matches("Content-Type: text/plain\r\n").count(), 1);
        assert_eq!(text.matches("Content-Length: 3\r\n").count(), 1);
        assert!(text.ends_with("\r\n\r\nabc\r\n"));
    }

    #[test]
    fn body_bytes_are_written_verbatim() {
        let body: &[u8] = &[0x1f, 0x8b, 0x00, 0xff];
        let response = Response::new(StatusCode::OK).body(Bytes::copy_from_slice(body));

        let bytes = response.to_bytes();
        assert!(bytes.windows(body.len()).any(|window| window == body));
    }
}
