//! Content-encoding negotiation and the compressor registry.
//!
//! Negotiation is a pure function over the client's `Accept-Encoding`
//! value; the registry maps an agreed encoding name to a typed transform
//! over a byte buffer.

use std::collections::HashMap;
use std::io;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("compressing response body failed: {source}")]
    CompressionFailure {
        #[from]
        source: io::Error,
    },
}

/// A body transform for one encoding. Every registered compressor has
/// this exact signature; no run-time type recovery is involved.
pub type Compressor = fn(&[u8]) -> Result<Vec<u8>, EncodingError>;

pub struct CompressorRegistry {
    compressors: HashMap<&'static str, Compressor>,
}

impl CompressorRegistry {
    /// Builds the registry with the one built-in encoding, gzip.
    pub fn new() -> Self {
        let mut compressors: HashMap<&'static str, Compressor> = HashMap::new();
        compressors.insert("gzip", gzip);
        Self { compressors }
    }

    pub fn supports(&self, name: &str) -> bool {
        self.compressors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Compressor> {
        self.compressors.get(name).copied()
    }
}

impl Default for CompressorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the encoding to apply, if any.
///
/// Walks the client's comma-separated list in the order the client gave
/// it and returns the first name the registry supports. The client's
/// preference order decides, never the registry's iteration order.
pub fn negotiate<'a>(accept_encoding: Option<&'a str>, registry: &CompressorRegistry) -> Option<&'a str> {
    let value = accept_encoding?;
    if value.is_empty() {
        return None;
    }

    value.split(',').map(str::trim).find(|token| registry.supports(token))
}

fn gzip(data: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn negotiate_prefers_client_order() {
        let registry = CompressorRegistry::new();

        assert_eq!(negotiate(Some("gzip, br"), &registry), Some("gzip"));
        assert_eq!(negotiate(Some("br, gzip"), &registry), Some("gzip"));
        assert_eq!(negotiate(Some(" br ,  gzip "), &registry), Some("gzip"));
    }

    #[test]
    fn negotiate_without_match_is_none() {
        let registry = CompressorRegistry::new();

        assert_eq!(negotiate(Some("br"), &registry), None);
        assert_eq!(negotiate(Some("deflate, zstd"), &registry), None);
    }

    #[test]
    fn negotiate_absent_or_empty_is_none() {
        let registry = CompressorRegistry::new();

        assert_eq!(negotiate(None, &registry), None);
        assert_eq!(negotiate(Some(""), &registry), None);
    }

    #[test]
    fn registry_rejects_unknown_names() {
        let registry = CompressorRegistry::new();

        assert!(registry.supports("gzip"));
        assert!(!registry.supports("br"));
        assert!(registry.get("identity").is_none());
    }

    #[test]
    fn gzip_round_trips_arbitrary_bytes() {
        let registry = CompressorRegistry::new();
        let compress = registry.get("gzip").unwrap();

        let original: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let compressed = compress(&original).unwrap();
        assert_ne!(compressed, original);

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();

        assert_eq!(decompressed, original);
    }

    #[test]
    fn gzip_handles_empty_input() {
        let registry = CompressorRegistry::new();
        let compress = registry.get("gzip").unwrap();

        let compressed = compress(b"").unwrap();

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert!(decompressed.is_empty());
    }
}
