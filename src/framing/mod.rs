//! # Request/Response Framing
//!
//! Bodies are JSON, optionally gzip-compressed. The request's
//! `Content-Encoding` decides both how the body is read and whether the
//! response is compressed; nothing else is negotiated.

mod codec;
mod errors;

pub use codec::{compress, decode, decompress, encode, Compression, GZIP_ENCODING};
pub use errors::{FramingError, FramingResult};
