use std::fmt;

use reqwest::StatusCode;

use crate::rest::Extension;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid network name `{0}`")]
    InvalidNetwork(String),

    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    #[error("invalid version range `{range}` for `{method}`: {source}")]
    InvalidVersionRange {
        method: String,
        range: String,
        source: semver::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("method `{method}` is not supported by version `{version}`")]
    UnsupportedMethod { method: String, version: String },

    #[error("extension `{extension}` is not supported by `{endpoint}`")]
    UnsupportedExtension {
        endpoint: &'static str,
        extension: Extension,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Protocol-level failure reported by the daemon or synthesized while
/// parsing its response.
///
/// `code` is a JSON-RPC error code (e.g. `-32601`), one of the synthesized
/// codes [`RpcError::INTERNAL_ERROR`] / [`RpcError::PARSE_ERROR`], or the
/// HTTP status of a non-JSON error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    /// Raw body of a non-JSON error response.
    pub body: Option<String>,
}

impl RpcError {
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const PARSE_ERROR: i64 = -32700;

    /// Build an error, falling back to the HTTP reason phrase for `code`
    /// when `message` is empty.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = reason_phrase(code).unwrap_or_default().to_owned();
        }
        Self {
            code,
            message,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Alias of `code`.
    pub fn status(&self) -> i64 {
        self.code
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RpcError: {} {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

fn reason_phrase(code: i64) -> Option<&'static str> {
    let code = u16::try_from(code).ok()?;
    StatusCode::from_u16(code).ok()?.canonical_reason()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_falls_back_to_reason_phrase() {
        let err = RpcError::new(401, "");
        assert_eq!(err.message, "Unauthorized");
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn rpc_codes_keep_empty_message_when_no_reason_exists() {
        let err = RpcError::new(-32601, "");
        assert_eq!(err.message, "");
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = RpcError::new(-8, "Block height out of range");
        assert_eq!(err.to_string(), "RpcError: -8 Block height out of range");
    }

    #[test]
    fn body_is_retained() {
        let err = RpcError::new(400, "Invalid hash: foobar").with_body("Invalid hash: foobar\r\n");
        assert_eq!(err.body.as_deref(), Some("Invalid hash: foobar\r\n"));
    }
}
