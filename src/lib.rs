//! # Pseudotex
//!
//! Renders algorithm pseudocode written in the LaTeX `algorithm` /
//! `algorithmic` style as HTML.
//!
//! The pipeline is lexer → recursive-descent parser → tree renderer. The
//! parser produces a [`Document`] that can be rendered any number of times;
//! math spans are handed to a pluggable [`MathBackend`].
//!
//! ## Example
//!
//! ```
//! use pseudotex::{render_to_string, RenderOptions};
//!
//! let source = r"\begin{algorithmic}
//! \STATE $x \gets 1$
//! \end{algorithmic}";
//! let html = render_to_string(source, &RenderOptions::default()).unwrap();
//! assert!(html.starts_with("<div class=\"ps-root\">"));
//! ```

pub mod core;
pub mod options;
pub mod utils;
pub mod wasm;

pub use pseudotex_html_backend as html;
pub use pseudotex_ir as ir;

pub use crate::core::{Lexer, Parser, Token, TokenKind};
pub use options::Options;
pub use pseudotex_html_backend::{
    CaptionCounter, DeferredMath, Element, InlineMath, MathBackend, MathCapability, Node,
    PlainMath, RenderOptions,
};
pub use pseudotex_ir::Document;
pub use utils::error::{
    require_input, PseudotexError, RenderOutput, RenderWarning, Result, WarningKind,
};

use pseudotex_html_backend::{render_document, Rendered};

/// Parses `input` into a parse tree.
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input)?.parse()
}

/// Parses and renders `input` to a markup string.
///
/// Math is rendered with [`PlainMath`]. Leading and trailing whitespace is
/// trimmed from the result.
pub fn render_to_string(input: &str, options: &RenderOptions) -> Result<String> {
    Ok(render_to_string_with(input, options, &PlainMath)?.content)
}

/// Like [`render_to_string`] with a chosen math backend.
///
/// A deferred backend cannot typeset a detached string, so its formulas stay
/// as `\(..\)` source and the output carries a warning.
pub fn render_to_string_with(
    input: &str,
    options: &RenderOptions,
    math: &dyn MathBackend,
) -> Result<RenderOutput> {
    let rendered = render_source(input, options, math)?;
    let mut warnings = Vec::new();
    if rendered.capability == MathCapability::Deferred {
        let message = format!(
            "math backend `{}` typesets only attached elements; {} formula(s) left as source",
            math.name(),
            rendered.math_spans
        );
        log::warn!("{}", message);
        warnings.push(RenderWarning {
            kind: WarningKind::DeferredMath,
            message,
        });
    }
    Ok(RenderOutput::with_warnings(
        rendered.element.to_markup(),
        warnings,
    ))
}

/// Parses and renders `input` into an element tree.
pub fn render(input: &str, options: &RenderOptions) -> Result<Element> {
    render_with(input, options, &PlainMath)
}

/// Like [`render`] with a chosen math backend. A deferred backend is asked
/// to typeset the finished element; the call does not wait on it.
pub fn render_with(input: &str, options: &RenderOptions, math: &dyn MathBackend) -> Result<Element> {
    let rendered = render_source(input, options, math)?;
    if rendered.capability == MathCapability::Deferred {
        math.schedule_typeset(&rendered.element);
    }
    Ok(rendered.element)
}

/// Renders `input` and appends the result to `container`.
pub fn render_into(
    input: &str,
    container: &mut Element,
    options: &RenderOptions,
    math: &dyn MathBackend,
) -> Result<()> {
    let rendered = render_source(input, options, math)?;
    container.append(rendered.element);
    if rendered.capability == MathCapability::Deferred {
        if let Some(Node::Element(attached)) = container.children.last() {
            math.schedule_typeset(attached);
        }
    }
    Ok(())
}

fn render_source(input: &str, options: &RenderOptions, math: &dyn MathBackend) -> Result<Rendered> {
    let doc = parse(input)?;
    log::debug!(
        "rendering {} environment(s) with math backend `{}`",
        doc.environments.len(),
        math.name()
    );
    Ok(render_document(&doc, options, math)?)
}
