//! Error handling for pseudotex
//!
//! This module provides a unified error type and result type for parsing
//! and rendering, plus the non-fatal warnings a render may report.

use std::fmt;

use pseudotex_html_backend::RenderError;

/// Characters of source shown on each side of the caret in a parse error.
const EXCERPT_RADIUS: usize = 15;

/// Caret marking the failure position inside an excerpt.
pub const EXCERPT_CARET: char = '\u{21B1}';

/// Pseudotex error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudotexError {
    /// Lexical or syntax error - input does not follow the grammar
    Parse {
        message: String,
        /// Character offset into the input
        position: usize,
        /// Source around `position` with the caret inserted
        excerpt: String,
    },
    /// Malformed option value
    Config { message: String },
    /// No input text was supplied
    MissingInput,
    /// Parser and renderer disagree about the tree
    Internal { message: String },
    /// IO error (for file operations)
    Io { message: String },
}

impl PseudotexError {
    /// Parse error at character offset `position` of `input`.
    pub fn parse_at(message: impl Into<String>, position: usize, input: &str) -> Self {
        PseudotexError::Parse {
            message: message.into(),
            position,
            excerpt: excerpt(input, position),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PseudotexError::Config {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PseudotexError::Internal {
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, PseudotexError::Parse { .. })
    }
}

/// Up to 15 characters either side of `position`, joined by the caret.
fn excerpt(input: &str, position: usize) -> String {
    let start = position.saturating_sub(EXCERPT_RADIUS);
    let before: String = input
        .chars()
        .skip(start)
        .take(position - start)
        .collect();
    let after: String = input.chars().skip(position).take(EXCERPT_RADIUS).collect();
    format!("{}{}{}", before, EXCERPT_CARET, after)
}

impl fmt::Display for PseudotexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudotexError::Parse {
                message,
                position,
                excerpt,
            } => {
                write!(f, "Error: {} at position {}: `{}`", message, position, excerpt)
            }
            PseudotexError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            PseudotexError::MissingInput => {
                write!(f, "Input is required")
            }
            PseudotexError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
            PseudotexError::Io { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for PseudotexError {}

impl From<std::io::Error> for PseudotexError {
    fn from(err: std::io::Error) -> Self {
        PseudotexError::Io {
            message: err.to_string(),
        }
    }
}

impl From<RenderError> for PseudotexError {
    fn from(err: RenderError) -> Self {
        PseudotexError::internal(err.to_string())
    }
}

/// Result type for pseudotex operations
pub type Result<T> = std::result::Result<T, PseudotexError>;

/// What a [`RenderWarning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The math backend only typesets after the markup is attached, so a
    /// string render leaves math as `\(..\)` source.
    DeferredMath,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::DeferredMath => write!(f, "deferred math"),
        }
    }
}

/// Render warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning [{}]: {}", self.kind, self.message)
    }
}

/// Render output with optional warnings
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The rendered markup
    pub content: String,
    /// Any warnings generated while rendering
    pub warnings: Vec<RenderWarning>,
}

impl RenderOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<RenderWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Rejects an absent input before any work is done.
pub fn require_input(input: Option<&str>) -> Result<&str> {
    input.ok_or(PseudotexError::MissingInput)
}
