//! Response envelopes returned to the sender

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status discriminant as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Error,
    Success,
    DocumentExists,
    DocumentNotExists,
    NullDocument,
}

impl StatusFlag {
    /// Integer code used by the sender
    pub fn code(&self) -> i32 {
        match self {
            StatusFlag::Error => 1,
            StatusFlag::Success => 2,
            StatusFlag::DocumentExists => 3,
            StatusFlag::DocumentNotExists => 4,
            StatusFlag::NullDocument => 5,
        }
    }

    /// Parse a wire code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(StatusFlag::Error),
            2 => Some(StatusFlag::Success),
            3 => Some(StatusFlag::DocumentExists),
            4 => Some(StatusFlag::DocumentNotExists),
            5 => Some(StatusFlag::NullDocument),
            _ => None,
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusFlag::Error => "Error",
            StatusFlag::Success => "Success",
            StatusFlag::DocumentExists => "DocumentExists",
            StatusFlag::DocumentNotExists => "DocumentNotExists",
            StatusFlag::NullDocument => "NullDocument",
        };
        f.write_str(name)
    }
}

impl Serialize for StatusFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for StatusFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i32::deserialize(deserializer)?;
        StatusFlag::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown status code {}", code)))
    }
}

/// Outcome of one replication request.
///
/// Each variant carries exactly one message, so a result with both an error
/// and a success message cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResult", try_from = "WireResult")]
pub enum ResponseResult {
    Error(String),
    Success(String),
    DocumentExists(String),
    DocumentNotExists(String),
    NullDocument(String),
}

impl ResponseResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn status(&self) -> StatusFlag {
        match self {
            Self::Error(_) => StatusFlag::Error,
            Self::Success(_) => StatusFlag::Success,
            Self::DocumentExists(_) => StatusFlag::DocumentExists,
            Self::DocumentNotExists(_) => StatusFlag::DocumentNotExists,
            Self::NullDocument(_) => StatusFlag::NullDocument,
        }
    }

    /// The populated message, whichever side it belongs to
    pub fn message(&self) -> &str {
        match self {
            Self::Error(m)
            | Self::Success(m)
            | Self::DocumentExists(m)
            | Self::DocumentNotExists(m)
            | Self::NullDocument(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    fn from_parts(status: StatusFlag, error_message: String, success_message: String) -> Self {
        match status {
            StatusFlag::Error => Self::Error(error_message),
            StatusFlag::Success => Self::Success(success_message),
            StatusFlag::DocumentExists => Self::DocumentExists(success_message),
            StatusFlag::DocumentNotExists => Self::DocumentNotExists(success_message),
            StatusFlag::NullDocument => Self::NullDocument(success_message),
        }
    }

    fn into_parts(self) -> (StatusFlag, String, String) {
        let status = self.status();
        match self {
            Self::Error(m) => (status, m, String::new()),
            Self::Success(m)
            | Self::DocumentExists(m)
            | Self::DocumentNotExists(m)
            | Self::NullDocument(m) => (status, String::new(), m),
        }
    }
}

/// Flat wire form of [`ResponseResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireResult {
    status: StatusFlag,
    #[serde(default)]
    error_message: String,
    #[serde(default)]
    success_message: String,
}

impl From<ResponseResult> for WireResult {
    fn from(result: ResponseResult) -> Self {
        let (status, error_message, success_message) = result.into_parts();
        Self {
            status,
            error_message,
            success_message,
        }
    }
}

impl TryFrom<WireResult> for ResponseResult {
    type Error = std::convert::Infallible;

    fn try_from(wire: WireResult) -> Result<Self, std::convert::Infallible> {
        Ok(ResponseResult::from_parts(
            wire.status,
            wire.error_message,
            wire.success_message,
        ))
    }
}

/// Response for the fetch endpoint.
///
/// `null_flag` is only ever set together with a `Success` result, which the
/// constructors enforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireGetResult", try_from = "WireGetResult")]
pub struct GetDocumentResponse {
    result: ResponseResult,
    null_flag: bool,
}

impl GetDocumentResponse {
    pub const NOT_FOUND: &'static str = "document not found";
    pub const HAS_CONTENT: &'static str = "document length is greater than zero";
    pub const ZERO_LENGTH: &'static str = "document length is zero";

    /// The key is absent from the bucket
    pub fn not_found() -> Self {
        Self {
            result: ResponseResult::success(Self::NOT_FOUND),
            null_flag: false,
        }
    }

    /// The document exists and has a non-empty payload
    pub fn with_content() -> Self {
        Self {
            result: ResponseResult::success(Self::HAS_CONTENT),
            null_flag: false,
        }
    }

    /// The document exists with a zero-length payload
    pub fn empty() -> Self {
        Self {
            result: ResponseResult::success(Self::ZERO_LENGTH),
            null_flag: true,
        }
    }

    pub fn result(&self) -> &ResponseResult {
        &self.result
    }

    pub fn status(&self) -> StatusFlag {
        self.result.status()
    }

    pub fn null_flag(&self) -> bool {
        self.null_flag
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireGetResult {
    status: StatusFlag,
    #[serde(default)]
    error_message: String,
    #[serde(default)]
    success_message: String,
    #[serde(default)]
    null_flag: bool,
}

impl From<GetDocumentResponse> for WireGetResult {
    fn from(response: GetDocumentResponse) -> Self {
        let (status, error_message, success_message) = response.result.into_parts();
        Self {
            status,
            error_message,
            success_message,
            null_flag: response.null_flag,
        }
    }
}

impl TryFrom<WireGetResult> for GetDocumentResponse {
    type Error = String;

    fn try_from(wire: WireGetResult) -> Result<Self, Self::Error> {
        if wire.null_flag && wire.status != StatusFlag::Success {
            return Err(format!("NullFlag set with status {}", wire.status));
        }
        Ok(Self {
            result: ResponseResult::from_parts(
                wire.status,
                wire.error_message,
                wire.success_message,
            ),
            null_flag: wire.null_flag,
        })
    }
}
