//! Math backends.
//!
//! The renderer never typesets math itself. A backend either turns a math
//! source string into markup on the spot ([`MathCapability::Inline`]) or
//! leaves a placeholder and typesets the finished element later
//! ([`MathCapability::Deferred`]).

use std::fmt;

use crate::dom::{escape_html, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathCapability {
    Inline,
    Deferred,
}

pub trait MathBackend {
    fn name(&self) -> &str;

    fn capability(&self) -> MathCapability;

    /// Markup for one math span. Only called on inline backends.
    fn render_inline(&self, tex: &str) -> String {
        format!("<span class=\"ps-math\">{}</span>", escape_html(tex))
    }

    /// Typesets the placeholders inside `element`. Only called on deferred
    /// backends, once, after the element is complete.
    fn schedule_typeset(&self, _element: &Element) {}
}

/// Default backend: the math source, escaped, in a `ps-math` span.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMath;

impl MathBackend for PlainMath {
    fn name(&self) -> &str {
        "plain"
    }

    fn capability(&self) -> MathCapability {
        MathCapability::Inline
    }
}

/// Inline backend over any `Fn(&str) -> String`, e.g. a KaTeX binding.
pub struct InlineMath<F> {
    name: String,
    render: F,
}

impl<F> InlineMath<F>
where
    F: Fn(&str) -> String,
{
    pub fn new(name: impl Into<String>, render: F) -> Self {
        Self {
            name: name.into(),
            render,
        }
    }
}

impl<F> MathBackend for InlineMath<F>
where
    F: Fn(&str) -> String,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> MathCapability {
        MathCapability::Inline
    }

    fn render_inline(&self, tex: &str) -> String {
        (self.render)(tex)
    }
}

impl<F> fmt::Debug for InlineMath<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineMath").field("name", &self.name).finish()
    }
}

/// Deferred backend: math is written as `\(tex\)` placeholders and the
/// callback is handed the finished element, e.g. to queue a MathJax pass.
pub struct DeferredMath<F> {
    name: String,
    typeset: F,
}

impl<F> DeferredMath<F>
where
    F: Fn(&Element),
{
    pub fn new(name: impl Into<String>, typeset: F) -> Self {
        Self {
            name: name.into(),
            typeset,
        }
    }
}

impl<F> MathBackend for DeferredMath<F>
where
    F: Fn(&Element),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> MathCapability {
        MathCapability::Deferred
    }

    fn schedule_typeset(&self, element: &Element) {
        (self.typeset)(element)
    }
}

impl<F> fmt::Debug for DeferredMath<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredMath").field("name", &self.name).finish()
    }
}

/// Placeholder text for a deferred math span.
pub fn deferred_placeholder(tex: &str) -> String {
    format!("\\({}\\)", tex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_plain_math_escapes() {
        assert_eq!(
            PlainMath.render_inline("a < b"),
            "<span class=\"ps-math\">a &lt; b</span>"
        );
        assert_eq!(PlainMath.capability(), MathCapability::Inline);
    }

    #[test]
    fn test_inline_closure() {
        let backend = InlineMath::new("upper", |tex: &str| tex.to_uppercase());
        assert_eq!(backend.render_inline("x+y"), "X+Y");
        assert_eq!(backend.name(), "upper");
    }

    #[test]
    fn test_deferred_invokes_callback() {
        let calls = Cell::new(0);
        let backend = DeferredMath::new("mathjax", |_el: &Element| calls.set(calls.get() + 1));
        assert_eq!(backend.capability(), MathCapability::Deferred);
        backend.schedule_typeset(&Element::new("div"));
        assert_eq!(calls.get(), 1);
        assert_eq!(deferred_placeholder("x"), "\\(x\\)");
    }
}
