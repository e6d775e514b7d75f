//! A minimal asynchronous HTTP/1.1 server with bounded concurrency
//!
//! This crate implements a restricted subset of HTTP/1.1 on top of tokio:
//! a capacity-limited connection pool admits incoming TCP connections, each
//! admitted connection is served by its own task, and a line-oriented codec
//! parses one request and serializes one response per connection.
//!
//! # Architecture
//!
//! - [`protocol`]: request/response types and the wire codec
//! - [`encoding`]: content-encoding negotiation and the compressor registry
//! - [`router`]: first-match-wins dispatch over a fixed route table
//! - [`pool`]: the bounded set of live connections and reclaim signaling
//! - [`server`]: accept loop, per-connection workers, reclaim consumer
//!
//! # Example
//!
//! ```no_run
//! use std::net::SocketAddr;
//! use nano_http::server::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let addr = SocketAddr::from(([0, 0, 0, 0], 4221));
//!     let server = Server::builder()
//!         .address(addr)
//!         .files_dir("/tmp")
//!         .bind()
//!         .await
//!         .expect("bind server error");
//!     server.run().await;
//! }
//! ```
//!
//! # Limitations
//!
//! - One request per connection; no keep-alive or pipelining
//! - A single fixed-size read per request; larger messages are never
//!   reassembled
//! - No read or write timeouts
//! - HTTP/1.1 text framing only; no chunked encoding, no TLS

pub mod encoding;
pub mod pool;
pub mod protocol;
pub mod router;
pub mod server;
