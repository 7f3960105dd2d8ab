//! Utility modules
//!
//! Error types, result types and render warnings.

pub mod error;

// Re-export commonly used items
pub use error::{
    require_input, PseudotexError, RenderOutput, RenderWarning, Result, WarningKind,
};
