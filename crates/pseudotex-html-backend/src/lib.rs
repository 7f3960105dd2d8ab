//! Parse tree to HTML backend.

use std::fmt;

use pseudotex_ir::{AtomKind, Document};

pub mod dom;
pub mod math;
pub mod options;
pub mod renderer;
pub mod style;
mod text;

pub use dom::{escape_html, Element, HtmlBuilder, Node};
pub use math::{DeferredMath, InlineMath, MathBackend, MathCapability, PlainMath};
pub use options::{CaptionCounter, RenderOptions};
pub use renderer::{HtmlRenderer, Rendered};
pub use style::{TextStyle, UnknownStyleCommand};

/// A parse tree the renderer cannot handle. Always a parser/renderer
/// mismatch, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    UnknownStyleCommand(String),
    UnexpectedAtom { kind: AtomKind, value: String },
    MalformedTree(String),
}

impl RenderError {
    pub fn unexpected_atom(kind: AtomKind, value: &str) -> Self {
        RenderError::UnexpectedAtom {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownStyleCommand(name) => {
                write!(f, "unrecognized text-style command '{}'", name)
            }
            RenderError::UnexpectedAtom { kind, value } => {
                write!(f, "unexpected {} atom '{}'", kind.name(), value)
            }
            RenderError::MalformedTree(message) => write!(f, "malformed tree: {}", message),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<UnknownStyleCommand> for RenderError {
    fn from(err: UnknownStyleCommand) -> Self {
        RenderError::UnknownStyleCommand(err.0)
    }
}

/// Renders `doc` into a `ps-root` element.
pub fn render_document(
    doc: &Document,
    options: &RenderOptions,
    math: &dyn MathBackend,
) -> Result<Rendered, RenderError> {
    HtmlRenderer::new(options, math).render(doc)
}

/// Renders `doc` to markup with the default math backend.
pub fn render_to_markup(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    Ok(render_document(doc, options, &PlainMath)?.element.to_markup())
}
