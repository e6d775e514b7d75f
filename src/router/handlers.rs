use std::path::Path;

use http::StatusCode;
use tracing::warn;

use crate::protocol::{Request, Response};

/// `GET /echo/<data>`: reflects the remainder of the path verbatim.
/// `Content-Length` here is the pre-compression length; the encoding
/// step rewrites it if the body ends up compressed.
pub(crate) fn echo(data: &str) -> Response {
    Response::new(StatusCode::OK)
        .header("Content-Type", mime::TEXT_PLAIN.as_ref())
        .header("Content-Length", data.len().to_string())
        .body(data.to_string())
}

/// `GET /user-agent`: reflects the `User-Agent` header, 400 when absent.
pub(crate) fn user_agent(request: &Request) -> Response {
    match request.header("User-Agent") {
        Some(value) => Response::new(StatusCode::OK)
            .header("Content-Type", mime::TEXT_PLAIN.as_ref())
            .header("Content-Length", value.len().to_string())
            .body(value.to_string()),
        None => Response::new(StatusCode::BAD_REQUEST),
    }
}

/// `GET /files/<name>`: serves a file from the configured base
/// directory, 404 when it cannot be read.
pub(crate) async fn read_file(base_dir: &Path, name: &str) -> Response {
    match tokio::fs::read(base_dir.join(name)).await {
        Ok(data) => Response::new(StatusCode::OK)
            .header("Content-Type", mime::APPLICATION_OCTET_STREAM.as_ref())
            .header("Content-Length", data.len().to_string())
            .body(data),
        Err(e) => {
            warn!(file = name, cause = %e, "error reading file");
            Response::new(StatusCode::NOT_FOUND)
        }
    }
}

/// `POST /files/<name>`: writes the request body under the base
/// directory, 201 on success, 404 when the write fails.
pub(crate) async fn write_file(base_dir: &Path, name: &str, body: &str) -> Response {
    match tokio::fs::write(base_dir.join(name), body.as_bytes()).await {
        Ok(()) => Response::new(StatusCode::CREATED),
        Err(e) => {
            warn!(file = name, cause = %e, "error writing file");
            Response::new(StatusCode::NOT_FOUND)
        }
    }
}

/// Fallback route: 200 for the bare root target, 404 for everything else.
pub(crate) fn default(target: &str) -> Response {
    if target == "/" {
        Response::new(StatusCode::OK)
    } else {
        Response::new(StatusCode::NOT_FOUND)
    }
}
