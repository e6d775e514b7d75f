use std::io;
use thiserror::Error;

/// Top-level error for the per-connection pipeline.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Errors produced while parsing a raw request buffer.
///
/// These are the only two failure modes of the codec; anything that
/// clears both checks is a successfully parsed (possibly semantically
/// odd) request.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid request format")]
    InvalidFormat,

    #[error("request line could not be parsed")]
    InvalidRequestLine,
}
