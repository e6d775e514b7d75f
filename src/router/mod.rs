//! Route dispatch over a small closed set of path shapes.
//!
//! Routes are tried in a fixed priority order, first match wins:
//! echo, user-agent, file read, file write, then the default route.
//! Matching is explicit prefix/equality inspection, never patterns
//! compiled at run time.

mod handlers;

use std::path::PathBuf;

use crate::protocol::{Request, Response};

/// The outcome of dispatching one request. Only the echo route produces
/// a compression-eligible response.
pub struct Routed {
    pub response: Response,
    pub compressible: bool,
}

impl Routed {
    fn plain(response: Response) -> Self {
        Self { response, compressible: false }
    }

    fn compressible(response: Response) -> Self {
        Self { response, compressible: true }
    }
}

/// Maps (method, target, parsed request) to a response. Not
/// concurrency-aware; the file routes use the injected base directory.
pub struct Router {
    base_dir: PathBuf,
}

impl Router {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub async fn dispatch(&self, request: &Request) -> Routed {
        let target = request.target();

        if let Some(data) = non_empty_suffix(target, "/echo/") {
            return Routed::compressible(handlers::echo(data));
        }

        if target == "/user-agent" {
            return Routed::plain(handlers::user_agent(request));
        }

        if let Some(name) = non_empty_suffix(target, "/files/") {
            if request.method() == "GET" {
                return Routed::plain(handlers::read_file(&self.base_dir, name).await);
            }
            if request.method() == "POST" {
                return Routed::plain(handlers::write_file(&self.base_dir, name, request.body()).await);
            }
        }

        Routed::plain(handlers::default(target))
    }
}

/// The remainder after a literal prefix, taken verbatim including any
/// further slashes; an empty remainder does not match.
fn non_empty_suffix<'a>(target: &'a str, prefix: &str) -> Option<&'a str> {
    match target.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => Some(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::path::PathBuf;

    fn parse(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    fn test_router() -> Router {
        Router::new(PathBuf::from("/nonexistent"))
    }

    fn temp_base_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nano-http-router-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn echo_reflects_path_remainder() {
        let routed = test_router().dispatch(&parse(b"GET /echo/abc HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert!(routed.compressible);
        assert_eq!(routed.response.status(), StatusCode::OK);
        assert_eq!(routed.response.header_value("Content-Type"), Some("text/plain"));
        assert_eq!(routed.response.header_value("Content-Length"), Some("3"));
        assert_eq!(&routed.response.body_bytes()[..], b"abc");
    }

    #[tokio::test]
    async fn echo_keeps_embedded_slashes() {
        let routed = test_router().dispatch(&parse(b"GET /echo/a/b/c HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::OK);
        assert_eq!(&routed.response.body_bytes()[..], b"a/b/c");
    }

    #[tokio::test]
    async fn echo_without_data_falls_through_to_default() {
        let routed = test_router().dispatch(&parse(b"GET /echo/ HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert!(!routed.compressible);
        assert_eq!(routed.response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn user_agent_reflects_header() {
        let routed =
            test_router().dispatch(&parse(b"GET /user-agent HTTP/1.1\r\nUser-Agent: test-client\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::OK);
        assert_eq!(&routed.response.body_bytes()[..], b"test-client");
        assert_eq!(routed.response.header_value("Content-Length"), Some("11"));
    }

    #[tokio::test]
    async fn user_agent_missing_header_is_bad_request() {
        let routed = test_router().dispatch(&parse(b"GET /user-agent HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::BAD_REQUEST);
        assert!(routed.response.body_bytes().is_empty());
    }

    #[tokio::test]
    async fn root_target_is_ok_and_empty() {
        let routed = test_router().dispatch(&parse(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::OK);
        assert!(routed.response.body_bytes().is_empty());
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let routed = test_router().dispatch(&parse(b"GET /nope HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::NOT_FOUND);
        assert!(routed.response.body_bytes().is_empty());
    }

    #[tokio::test]
    async fn file_write_then_read_round_trips() {
        let base_dir = temp_base_dir("rw");
        let router = Router::new(base_dir);

        let written =
            router.dispatch(&parse(b"POST /files/note.txt HTTP/1.1\r\nHost: x\r\n\r\nhello files")).await;
        assert_eq!(written.response.status(), StatusCode::CREATED);

        let read = router.dispatch(&parse(b"GET /files/note.txt HTTP/1.1\r\nHost: x\r\n\r\n")).await;
        assert_eq!(read.response.status(), StatusCode::OK);
        assert_eq!(read.response.header_value("Content-Type"), Some("application/octet-stream"));
        assert_eq!(&read.response.body_bytes()[..], b"hello files");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let routed = test_router().dispatch(&parse(b"GET /files/ghost HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn files_with_other_method_falls_through_to_default() {
        let routed = test_router().dispatch(&parse(b"DELETE /files/note HTTP/1.1\r\nHost: x\r\n\r\n")).await;

        assert_eq!(routed.response.status(), StatusCode::NOT_FOUND);
    }
}
