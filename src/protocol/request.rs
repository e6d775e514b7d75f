use std::collections::HashMap;

use crate::protocol::ParseError;

/// The first line of a request: exactly three space-separated tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A parsed request. Constructed once per read buffer, immutable
/// afterward, owned exclusively by the worker that parsed it.
#[derive(Debug)]
pub struct Request {
    request_line: RequestLine,
    headers: HashMap<String, String>,
    body: String,
}

impl Request {
    /// Parses a raw read buffer into a request.
    ///
    /// The buffer is split on `\r\n`; segment 0 must be a three-token
    /// request line, headers run until the first blank segment, and the
    /// body is the single segment immediately after that boundary. The
    /// codec does not validate method names, target syntax, or header
    /// value semantics.
    pub fn parse(buf: &[u8]) -> Result<Request, ParseError> {
        let text = String::from_utf8_lossy(buf);
        let segments: Vec<&str> = text.split("\r\n").collect();
        if segments.len() < 3 {
            return Err(ParseError::InvalidFormat);
        }

        let request_line = parse_request_line(segments[0])?;
        let headers = extract_headers(&segments);
        let body = extract_body(&segments);

        Ok(Request { request_line, headers, body })
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    /// Looks up a header by its name exactly as the client sent it.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

fn parse_request_line(segment: &str) -> Result<RequestLine, ParseError> {
    // exactly three space-separated fields; the codec does not judge
    // what the fields contain
    let mut tokens = segment.split(' ');
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(target), Some(version), None) => Ok(RequestLine {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        }),
        _ => Err(ParseError::InvalidRequestLine),
    }
}

fn extract_headers(segments: &[&str]) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for segment in &segments[1..] {
        if segment.is_empty() {
            break;
        }
        let (key, value) = match segment.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        // duplicate keys: last wins, deliberately
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    headers
}

fn extract_body(segments: &[&str]) -> String {
    let boundary = segments.iter().position(|segment| segment.is_empty());

    match boundary.and_then(|idx| segments.get(idx + 1)) {
        Some(segment) => sanitize_body(segment),
        None => String::new(),
    }
}

/// Truncates at the first NUL byte, which a fixed-size read can leave
/// behind as buffer padding.
fn sanitize_body(segment: &str) -> String {
    match segment.find('\0') {
        Some(idx) => segment[..idx].to_string(),
        None => segment.to_string(),
    }
}
