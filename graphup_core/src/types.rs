use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Direction of a single HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    Upload,
    Download,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Upload => f.write_str("Upload"),
            TransferKind::Download => f.write_str("Download"),
        }
    }
}

/// Which remote entity a transfer concerns. Carried on every transfer event
/// so a subscriber listening to several objects can tell transfers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Photo,
    Comment,
    Like,
}

/// Value of a single form/query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    /// Path of a local file whose contents are sent as a multipart file part.
    File(PathBuf),
}

/// Ordered request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::File(path.into()),
        }
    }
}

/// Outcome of one transfer as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    /// The server answered with this HTTP status code.
    Http(u16),
    /// The exchange failed below HTTP (DNS, connect, reset, ...).
    Network(String),
    /// A local file parameter could not be read.
    File(String),
    /// The request URL did not parse; nothing was sent.
    InvalidUrl(String),
}

impl TransferStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, TransferStatus::Http(200))
    }

    /// Reason string carried by `transfer-failed`.
    pub fn failure_reason(&self) -> String {
        match self {
            TransferStatus::Http(code) => format!("HTTP Code {}", code),
            TransferStatus::Network(msg) => format!("Network error: {}", msg),
            TransferStatus::File(msg) => format!("File error: {}", msg),
            TransferStatus::InvalidUrl(msg) => format!("Invalid URL: {}", msg),
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Http(code) => write!(f, "{}", code),
            TransferStatus::Network(_) => f.write_str("network unreachable"),
            TransferStatus::File(_) => f.write_str("file unreadable"),
            TransferStatus::InvalidUrl(_) => f.write_str("invalid URL"),
        }
    }
}

/// Status plus the raw response body of a finished transfer.
#[derive(Debug, Clone)]
pub struct TransferResponse {
    pub status: TransferStatus,
    pub body: Vec<u8>,
}

/// A comment attached to a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author_name: String,
    pub message: String,
    pub created_time: String,
    pub like_count: u64,
    pub id: String,
}

/// A like on a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub name: String,
}
