// error.rs - Syntax error types.
//
// Every user-facing parse failure is an `Error` carrying an `ErrorCode` and
// the offending piece of the pattern. Internal invariant violations are
// not represented here; they panic.

use std::fmt;

use thiserror::Error;

/// The kind of syntax error found in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Not produced by the parser, which reports malformed classes as
    /// `InvalidCharRange` or `MissingBracket`. Kept for callers that
    /// validate class syntax themselves.
    InvalidCharClass,
    InvalidCharRange,
    InvalidEscape,
    InvalidNamedCapture,
    InvalidPerlOp,
    InvalidRepeatOp,
    InvalidRepeatSize,
    MissingBracket,
    MissingParen,
    MissingRepeatArgument,
    TrailingBackslash,
    UnexpectedParen,
    NestingDepth,
}

impl ErrorCode {
    /// Human-readable message for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCharClass => "invalid character class",
            ErrorCode::InvalidCharRange => "invalid character class range",
            ErrorCode::InvalidEscape => "invalid escape sequence",
            ErrorCode::InvalidNamedCapture => "invalid named capture",
            ErrorCode::InvalidPerlOp => "invalid or unsupported Perl syntax",
            ErrorCode::InvalidRepeatOp => "invalid nested repetition operator",
            ErrorCode::InvalidRepeatSize => "invalid repeat count",
            ErrorCode::MissingBracket => "missing closing ]",
            ErrorCode::MissingParen => "missing closing )",
            ErrorCode::MissingRepeatArgument => "missing argument to repetition operator",
            ErrorCode::TrailingBackslash => "trailing backslash at end of expression",
            ErrorCode::UnexpectedParen => "unexpected )",
            ErrorCode::NestingDepth => "expression nests too deeply",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ErrorCode {}

/// A syntax error: what went wrong and the part of the pattern it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error parsing regexp: {code}: `{expr}`")]
pub struct Error {
    pub code: ErrorCode,
    pub expr: String,
}

impl Error {
    pub(crate) fn new(code: ErrorCode, expr: impl Into<String>) -> Self {
        Error {
            code,
            expr: expr.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The offending substring of the pattern (empty for a trailing backslash).
    pub fn expr(&self) -> &str {
        &self.expr
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Tests
// ============================================================================
