//! Typed error codes shared across the pipeline.
//!
//! Every stage reports failures as an [`ErrorCode`] rather than a free-form
//! string. The wire representation (`E_ACL_DENY:<tool>`, `E_HTTP:<detail>`,
//! ...) is produced by `Display` and parsed back by [`ErrorCode::parse`],
//! so the HTTP transport and the in-process registry speak the same shape.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Machine-readable error code carried through execution results.
///
/// Codes with a payload keep it after the colon in the wire form:
/// `E_ACL_DENY:files.create`, `E_HTTP:connect timeout`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCode {
    /// Step tool's ACL tag does not intersect the plan policy.
    #[error("E_ACL_DENY:{0}")]
    AclDeny(String),
    /// Tool name is not present in the execution registry.
    #[error("E_UNKNOWN_COMMAND")]
    UnknownCommand,
    /// Planner received a chat intent.
    #[error("E_NOT_COMMAND")]
    NotCommand,
    /// Planner has no rule for a resolver-whitelisted command.
    #[error("E_NO_RULE")]
    NoRule,
    /// Planner rule matched but declared zero steps.
    #[error("E_EMPTY_PLAN")]
    EmptyPlan,
    /// Plan handed to the executor was already invalid.
    #[error("E_INVALID_PLAN")]
    InvalidPlan,
    /// Transport reported failure without a specific code.
    #[error("E_COMMAND_FAILED")]
    CommandFailed,
    /// HTTP-level transport failure (connect, timeout, status).
    #[error("E_HTTP:{0}")]
    Http(String),
    /// Transport response body could not be decoded.
    #[error("E_BAD_RESPONSE:{0}")]
    BadResponse(String),
    /// Handler raised something that is not a business error.
    #[error("E_RUNTIME:{0}")]
    Runtime(String),
    /// Required argument absent from the call.
    #[error("E_ARG_MISSING:{0}")]
    ArgMissing(String),
    /// Requested file does not exist inside the workspace.
    #[error("E_NOT_FOUND")]
    NotFound,
    /// File exceeds the configured read limit.
    #[error("E_FILE_TOO_LARGE")]
    FileTooLarge,
    /// Path escapes the workspace sandbox.
    #[error("E_PATH_OUTSIDE_WORKSPACE")]
    PathOutsideWorkspace,
    /// Operation disabled by a security feature flag.
    #[error("E_FORBIDDEN")]
    Forbidden,
    /// Desktop integration is unavailable on this platform.
    #[error("E_UNSUPPORTED_OS")]
    UnsupportedOs,
    /// Any other `E_`-prefixed business code reported by a tool handler.
    #[error("{0}")]
    Tool(String),
}

impl ErrorCode {
    /// Parse a wire string back into a code.
    ///
    /// Unknown `E_` codes are preserved verbatim as [`ErrorCode::Tool`];
    /// anything without the prefix is wrapped as [`ErrorCode::Runtime`].
    pub fn parse(raw: &str) -> Self {
        if let Some(tool) = raw.strip_prefix("E_ACL_DENY:") {
            return ErrorCode::AclDeny(tool.to_string());
        }
        if let Some(detail) = raw.strip_prefix("E_HTTP:") {
            return ErrorCode::Http(detail.to_string());
        }
        if let Some(detail) = raw.strip_prefix("E_BAD_RESPONSE:") {
            return ErrorCode::BadResponse(detail.to_string());
        }
        if let Some(detail) = raw.strip_prefix("E_RUNTIME:") {
            return ErrorCode::Runtime(detail.to_string());
        }
        if let Some(name) = raw.strip_prefix("E_ARG_MISSING:") {
            return ErrorCode::ArgMissing(name.to_string());
        }
        match raw {
            "E_UNKNOWN_COMMAND" => ErrorCode::UnknownCommand,
            "E_NOT_COMMAND" => ErrorCode::NotCommand,
            "E_NO_RULE" => ErrorCode::NoRule,
            "E_EMPTY_PLAN" => ErrorCode::EmptyPlan,
            "E_INVALID_PLAN" => ErrorCode::InvalidPlan,
            "E_COMMAND_FAILED" => ErrorCode::CommandFailed,
            "E_NOT_FOUND" => ErrorCode::NotFound,
            "E_FILE_TOO_LARGE" => ErrorCode::FileTooLarge,
            "E_PATH_OUTSIDE_WORKSPACE" => ErrorCode::PathOutsideWorkspace,
            "E_FORBIDDEN" => ErrorCode::Forbidden,
            "E_UNSUPPORTED_OS" => ErrorCode::UnsupportedOs,
            other if other.starts_with("E_") => ErrorCode::Tool(other.to_string()),
            other => ErrorCode::Runtime(other.to_string()),
        }
    }

    /// Check whether this code denotes an ACL denial.
    pub fn is_acl_deny(&self) -> bool {
        matches!(self, ErrorCode::AclDeny(_))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorCode::parse(&raw))
    }
}
