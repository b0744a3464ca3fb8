//! Raw document payload

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque document bytes plus store metadata.
///
/// Emptiness means a zero-length payload. A document that does not exist is a
/// different outcome and never reaches this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDocument {
    #[serde(
        default,
        serialize_with = "serialize_value",
        deserialize_with = "deserialize_value"
    )]
    value: Vec<u8>,

    /// Store-specific format flags
    #[serde(default)]
    pub flags: u32,

    /// Expiry in seconds (0 = never)
    #[serde(default)]
    pub expiry: u32,

    /// Version token assigned by the store
    #[serde(default)]
    pub cas: u64,
}

impl RawDocument {
    /// Create a document with the given payload and zeroed metadata
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Set the format flags
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the expiry
    pub fn with_expiry(mut self, expiry: u32) -> Self {
        self.expiry = expiry;
        self
    }

    /// Payload bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// True when the payload has zero length
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

fn serialize_value<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(value))
}

fn deserialize_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    // The sender encodes a nil payload as null
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}
