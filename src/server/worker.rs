use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::encoding::{negotiate, CompressorRegistry};
use crate::pool::{ConnId, ReclaimSignal};
use crate::protocol::{HttpError, Request, Response};
use crate::router::{Routed, Router};

/// One read per connection; requests larger than this are never
/// reassembled across reads.
const READ_BUF_SIZE: usize = 1024;

/// Runs the pipeline for one admitted connection, then hands the socket
/// to the reclaimer. The reclaim signal is sent on every path, exactly
/// once, whether the pipeline succeeded or aborted partway.
pub(crate) async fn serve(
    mut stream: TcpStream,
    id: ConnId,
    router: Arc<Router>,
    registry: Arc<CompressorRegistry>,
    reclaim_tx: mpsc::Sender<ReclaimSignal>,
) {
    if let Err(e) = process(&mut stream, &router, &registry).await {
        warn!(cause = %e, "closing connection without response");
    }

    // ownership of the socket moves to the reclaimer here
    if reclaim_tx.send(ReclaimSignal { id, stream }).await.is_err() {
        error!("reclaim channel closed, connection dropped untracked");
    }
}

async fn process(
    stream: &mut TcpStream,
    router: &Router,
    registry: &CompressorRegistry,
) -> Result<(), HttpError> {
    let mut buf = [0u8; READ_BUF_SIZE];
    let read = stream.read(&mut buf).await?;
    if read == 0 {
        debug!("connection closed before sending a request");
        return Ok(());
    }

    let request = Request::parse(&buf[..read])?;
    debug!(method = request.method(), target = request.target(), "dispatching request");

    let Routed { mut response, compressible } = router.dispatch(&request).await;

    if compressible {
        apply_encoding(&request, &mut response, registry);
    }

    stream.write_all(&response.to_bytes()).await?;
    Ok(())
}

/// Compresses the response body when the client and the registry agree
/// on an encoding. A failed transform degrades to a 500 rather than
/// sending corrupt or partially compressed bytes.
fn apply_encoding(request: &Request, response: &mut Response, registry: &CompressorRegistry) {
    let encoding = match negotiate(request.header("Accept-Encoding"), registry) {
        Some(encoding) => encoding,
        None => return,
    };

    // negotiate only returns names the registry holds
    let compress = match registry.get(encoding) {
        Some(compress) => compress,
        None => return,
    };

    match compress(response.body_bytes()) {
        Ok(compressed) => {
            response.set_header("Content-Encoding", encoding);
            response.set_header("Content-Length", compressed.len().to_string());
            response.replace_body(compressed);
        }
        Err(e) => {
            error!(encoding, cause = %e, "error compressing response body");
            *response = Response::new(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
