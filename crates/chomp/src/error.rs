// ABOUTME: Error types for chomp including the ErrorCode enum and ChompError struct.
// ABOUTME: Fetch failures are absorbed by the loader; callers mostly see InvalidArgument.

use std::fmt;

/// Error codes representing the categories of chomp failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidArgument,
    InvalidUrl,
    Fetch,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for chomp operations.
#[derive(Debug, thiserror::Error)]
pub struct ChompError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ChompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chomp: {}", self.op)?;
        if !self.target.is_empty() {
            write!(f, " {}", self.target)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ChompError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(op: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidArgument,
            target: String::new(),
            op: op.into(),
            source: Some(anyhow::anyhow!(message.into())),
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            target: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            target: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidArgument error.
    pub fn is_invalid_argument(&self) -> bool {
        self.code == ErrorCode::InvalidArgument
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_target_and_code() {
        let err = ChompError::fetch(
            "https://example.com",
            "Fetch",
            Some(anyhow::anyhow!("HTTP status 404")),
        );
        assert_eq!(
            err.to_string(),
            "chomp: Fetch https://example.com: fetch error: HTTP status 404"
        );
        assert!(err.is_fetch());
        assert!(!err.is_invalid_url());
    }

    #[test]
    fn invalid_argument_omits_empty_target() {
        let err = ChompError::invalid_argument("Clean", "no input");
        assert_eq!(err.to_string(), "chomp: Clean: invalid argument: no input");
        assert!(err.is_invalid_argument());
    }
}
