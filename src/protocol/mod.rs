//! Request/response data model and the line-oriented wire codec.
//!
//! The codec is intentionally small: it splits a single read buffer on
//! `\r\n`, never reassembles messages across reads, and leaves all
//! semantic validation to the routes.

mod error;
mod request;
mod response;

pub use error::{HttpError, ParseError};
pub use request::{Request, RequestLine};
pub use response::Response;
