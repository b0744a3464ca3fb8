//! gzip + JSON codec

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{FramingError, FramingResult};

/// Content-Encoding token that turns compression on
pub const GZIP_ENCODING: &str = "gzip";

/// Body framing mode for one request and its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Identity,
    Gzip,
}

impl Compression {
    /// Decide the mode from the request's `Content-Encoding` value
    pub fn from_content_encoding(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case(GZIP_ENCODING) => Compression::Gzip,
            _ => Compression::Identity,
        }
    }

    pub fn is_gzip(&self) -> bool {
        matches!(self, Compression::Gzip)
    }
}

/// Decode a request body into `T`.
///
/// No partial value is returned: either the whole body decompresses and
/// parses, or the error carries the underlying cause.
pub fn decode<T: DeserializeOwned>(body: &[u8], compression: Compression) -> FramingResult<T> {
    match compression {
        Compression::Gzip => {
            let json = decompress(body)?;
            serde_json::from_slice(&json).map_err(FramingError::Parse)
        }
        Compression::Identity => serde_json::from_slice(body).map_err(FramingError::Parse),
    }
}

/// Encode a response value, compressing when the request was compressed
pub fn encode<T: Serialize>(value: &T, compression: Compression) -> FramingResult<Vec<u8>> {
    let json = serde_json::to_vec(value).map_err(FramingError::Serialize)?;
    match compression {
        Compression::Gzip => compress(&json),
        Compression::Identity => Ok(json),
    }
}

/// gzip-compress a byte slice
pub fn compress(data: &[u8]) -> FramingResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).map_err(FramingError::Compress)?;
    encoder.finish().map_err(FramingError::Compress)
}

/// Inflate a gzip stream
pub fn decompress(data: &[u8]) -> FramingResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(FramingError::Decompress)?;
    Ok(out)
}
