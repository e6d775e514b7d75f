//! The accept loop, worker supervision, and connection reclamation.
//!
//! One long-lived accept loop admits connections into the bounded pool
//! and spawns one worker task per admitted connection. A single
//! dedicated consumer drains the reclaim channel, closing sockets and
//! releasing pool slots. Workers share no state with each other.

mod worker;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use crate::encoding::CompressorRegistry;
use crate::pool::{ConnectionPool, ReclaimSignal};
use crate::router::Router;

const DEFAULT_MAX_CONNECTIONS: usize = 5;
const DEFAULT_ACCEPT_DELAY: Duration = Duration::from_millis(200);

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("address must be set")]
    MissingAddress,

    #[error("files directory must be set")]
    MissingFilesDir,

    #[error("bind error: {source}")]
    Bind {
        #[source]
        source: std::io::Error,
    },
}

pub struct ServerBuilder {
    address: Option<SocketAddr>,
    files_dir: Option<PathBuf>,
    max_connections: usize,
    accept_delay: Duration,
}

impl ServerBuilder {
    fn new() -> Self {
        Self {
            address: None,
            files_dir: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            accept_delay: DEFAULT_ACCEPT_DELAY,
        }
    }

    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    /// Base directory the file routes read from and write to.
    pub fn files_dir(mut self, files_dir: impl Into<PathBuf>) -> Self {
        self.files_dir = Some(files_dir.into());
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Fixed pause between accept iterations. This throttles the
    /// admission attempt rate on top of the capacity check.
    pub fn accept_delay(mut self, accept_delay: Duration) -> Self {
        self.accept_delay = accept_delay;
        self
    }

    /// Binds the listening socket. Bind failure is the only fatal
    /// startup condition; callers surface it and exit non-zero.
    pub async fn bind(self) -> Result<Server, ServerError> {
        let address = self.address.ok_or(ServerError::MissingAddress)?;
        let files_dir = self.files_dir.ok_or(ServerError::MissingFilesDir)?;

        let listener = TcpListener::bind(address).await.map_err(|source| ServerError::Bind { source })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { source })?;

        Ok(Server {
            listener,
            local_addr,
            accept_delay: self.accept_delay,
            pool: Arc::new(ConnectionPool::new(self.max_connections)),
            router: Arc::new(Router::new(files_dir)),
            registry: Arc::new(CompressorRegistry::new()),
        })
    }
}

pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    accept_delay: Duration,
    pool: Arc<ConnectionPool>,
    router: Arc<Router>,
    registry: Arc<CompressorRegistry>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop forever.
    ///
    /// Accept errors are logged and skipped. A connection the pool
    /// rejects is closed on the spot: no worker is spawned for it and no
    /// reclaim signal is ever sent on its behalf.
    pub async fn run(self) {
        let (reclaim_tx, reclaim_rx) = mpsc::channel(self.pool.capacity());
        tokio::spawn(reclaim_loop(Arc::clone(&self.pool), reclaim_rx));

        loop {
            let (stream, remote_addr) = match self.listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            match self.pool.admit() {
                Some(id) => {
                    debug!(%remote_addr, live = self.pool.len(), "connection admitted");
                    tokio::spawn(worker::serve(
                        stream,
                        id,
                        Arc::clone(&self.router),
                        Arc::clone(&self.registry),
                        reclaim_tx.clone(),
                    ));
                }
                None => {
                    warn!(%remote_addr, capacity = self.pool.capacity(), "connection pool is full, rejecting connection");
                    drop(stream);
                }
            }

            time::sleep(self.accept_delay).await;
        }
    }
}

/// Single consumer of the reclaim channel: closes the socket, then
/// releases the pool slot. Running removals through one loop keeps them
/// serialized with respect to each other.
async fn reclaim_loop(pool: Arc<ConnectionPool>, mut reclaim_rx: mpsc::Receiver<ReclaimSignal>) {
    while let Some(signal) = reclaim_rx.recv().await {
        drop(signal.stream);
        if pool.remove(signal.id) {
            info!(live = pool.len(), "connection reclaimed");
        } else {
            warn!(id = ?signal.id, "reclaim signal for an untracked connection");
        }
    }
}
