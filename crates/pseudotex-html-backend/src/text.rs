//! Style-aware rendering of text runs.
//!
//! Brace groups get a fresh [`TextStyle`] seeded from the enclosing size, so
//! font changes inside a group never leak out of it. Declarations
//! (`\bfseries`) wrap every later sibling of the current run; commands
//! (`\textbf{..}`) wrap only the group that follows them.

use pseudotex_ir::{AtomKind, Text, TextItem};

use crate::dom::HtmlBuilder;
use crate::math::{deferred_placeholder, MathBackend, MathCapability};
use crate::style::TextStyle;
use crate::RenderError;

pub(crate) struct InlineWriter<'a> {
    html: &'a mut HtmlBuilder,
    math: &'a dyn MathBackend,
    capability: MathCapability,
    math_spans: &'a mut usize,
}

impl<'a> InlineWriter<'a> {
    pub(crate) fn new(
        html: &'a mut HtmlBuilder,
        math: &'a dyn MathBackend,
        capability: MathCapability,
        math_spans: &'a mut usize,
    ) -> Self {
        Self {
            html,
            math,
            capability,
            math_spans,
        }
    }

    /// Renders `text` in the scope described by `style`.
    ///
    /// Declarations found in the run update `style` in place, which is how
    /// a declaration in statement text carries over to later lines.
    pub(crate) fn write(&mut self, text: &Text, style: &mut TextStyle) -> Result<(), RenderError> {
        self.write_items(&text.items, style)
    }

    fn write_group(&mut self, group: &Text, outer: &TextStyle) -> Result<(), RenderError> {
        let mut style = TextStyle::new(outer.font_size());
        self.write_items(&group.items, &mut style)
    }

    fn write_items(&mut self, items: &[TextItem], style: &mut TextStyle) -> Result<(), RenderError> {
        let mut idx = 0;
        while idx < items.len() {
            let item = &items[idx];
            idx += 1;

            if item.whitespace() {
                self.html.put_text(" ");
            }

            match item {
                TextItem::Atom(atom) => match atom.kind {
                    AtomKind::Ordinary => {
                        self.html.put_text(&atom.value);
                    }
                    AtomKind::Math => self.write_math(&atom.value),
                    AtomKind::CondSymbol => {
                        self.html
                            .begin_span(Some("ps-keyword"), None)
                            .put_text(&atom.value.to_lowercase())
                            .end();
                    }
                    AtomKind::Special => {
                        if atom.value == "\\\\" {
                            self.html.begin("br", None, None).end();
                        } else {
                            let literal = special_literal(&atom.value)
                                .ok_or_else(|| RenderError::unexpected_atom(atom.kind, &atom.value))?;
                            self.html.put_text(literal);
                        }
                    }
                    AtomKind::TextSymbol => {
                        let literal = text_symbol(&atom.value)
                            .ok_or_else(|| RenderError::unexpected_atom(atom.kind, &atom.value))?;
                        self.html.put_text(literal);
                    }
                    AtomKind::QuoteSymbol => {
                        let glyph = quote_glyph(&atom.value)
                            .ok_or_else(|| RenderError::unexpected_atom(atom.kind, &atom.value))?;
                        self.html.put_text(glyph);
                    }
                    AtomKind::FontDeclaration | AtomKind::SizingDeclaration => {
                        let mut scope = TextStyle::new(style.font_size());
                        scope.update_by_command(&atom.value)?;
                        style.update_by_command(&atom.value)?;
                        self.html.begin_span(None, Some(scope.to_css()));
                        self.write_items(&items[idx..], style)?;
                        self.html.end();
                        return Ok(());
                    }
                    AtomKind::FontCommand => {
                        // A command with no group after it has nothing to style.
                        if let Some(TextItem::Group(arg)) = items.get(idx) {
                            idx += 1;
                            let mut cmd_style = TextStyle::new(style.font_size());
                            cmd_style.update_by_command(&atom.value)?;
                            self.html.begin_span(None, Some(cmd_style.to_css()));
                            self.write_items(&arg.items, &mut cmd_style)?;
                            self.html.end();
                        }
                    }
                },
                TextItem::Call(call) => {
                    self.html
                        .begin_span(Some("ps-funcname"), None)
                        .put_text(&call.name)
                        .end();
                    self.html.put_text("(");
                    self.write_group(&call.args, style)?;
                    self.html.put_text(")");
                }
                TextItem::Group(group) => self.write_group(group, style)?,
            }
        }
        Ok(())
    }

    fn write_math(&mut self, tex: &str) {
        *self.math_spans += 1;
        match self.capability {
            MathCapability::Inline => {
                self.html.put_raw(self.math.render_inline(tex));
            }
            MathCapability::Deferred => {
                self.html
                    .begin_span(Some("ps-math"), None)
                    .put_text(&deferred_placeholder(tex))
                    .end();
            }
        }
    }
}

fn special_literal(escape: &str) -> Option<&'static str> {
    Some(match escape {
        "\\{" => "{",
        "\\}" => "}",
        "\\$" => "$",
        "\\&" => "&",
        "\\#" => "#",
        "\\%" => "%",
        "\\_" => "_",
        _ => return None,
    })
}

fn text_symbol(name: &str) -> Option<&'static str> {
    match name {
        "textbackslash" => Some("\\"),
        _ => None,
    }
}

fn quote_glyph(quote: &str) -> Option<&'static str> {
    Some(match quote {
        "`" => "\u{2018}",
        "``" => "\u{201C}",
        "'" => "\u{2019}",
        "''" => "\u{201D}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Node};
    use crate::math::PlainMath;
    use pretty_assertions::assert_eq;
    use pseudotex_ir::{Atom, Call};

    fn atom(kind: AtomKind, value: &str, ws: bool) -> TextItem {
        TextItem::Atom(Atom::new(kind, value, ws))
    }

    fn render(items: Vec<TextItem>) -> String {
        let mut html = HtmlBuilder::new();
        let mut spans = 0;
        html.begin_span(None, None);
        {
            let mut writer =
                InlineWriter::new(&mut html, &PlainMath, MathCapability::Inline, &mut spans);
            writer
                .write(&Text::open(items), &mut TextStyle::default())
                .unwrap();
        }
        let nodes = html.finish();
        let Node::Element(span) = &nodes[0] else {
            panic!("expected element");
        };
        let markup = span.to_markup();
        markup["<span>".len()..markup.len() - "</span>".len()].to_string()
    }

    #[test]
    fn test_specials_and_quotes() {
        let out = render(vec![
            atom(AtomKind::Special, "\\{", false),
            atom(AtomKind::Special, "\\_", false),
            atom(AtomKind::Special, "\\\\", false),
            atom(AtomKind::QuoteSymbol, "``", true),
            atom(AtomKind::Ordinary, "hi", false),
            atom(AtomKind::QuoteSymbol, "''", false),
            atom(AtomKind::TextSymbol, "textbackslash", true),
        ]);
        assert_eq!(out, "{_<br> \u{201C}hi\u{201D} \\");
    }

    #[test]
    fn test_declaration_wraps_rest() {
        let out = render(vec![
            atom(AtomKind::Ordinary, "a", false),
            atom(AtomKind::FontDeclaration, "bfseries", true),
            atom(AtomKind::Ordinary, "b", true),
            atom(AtomKind::Ordinary, "c", true),
        ]);
        assert_eq!(out, "a <span style=\"font-weight:bold;\"> b c</span>");
    }

    #[test]
    fn test_command_wraps_only_argument() {
        let out = render(vec![
            atom(AtomKind::FontCommand, "textit", false),
            TextItem::Group(Text::close(vec![atom(AtomKind::Ordinary, "x", false)])),
            atom(AtomKind::Ordinary, "y", true),
        ]);
        assert_eq!(
            out,
            "<span style=\"font-style:italic;font-variant:normal;\">x</span> y"
        );
    }

    #[test]
    fn test_group_isolates_declarations() {
        let out = render(vec![
            TextItem::Group(Text::close(vec![
                atom(AtomKind::SizingDeclaration, "Large", false),
                atom(AtomKind::Ordinary, "big", true),
            ])),
            atom(AtomKind::Ordinary, "normal", true),
        ]);
        assert_eq!(
            out,
            "<span style=\"font-size:1.41em;\"> big</span> normal"
        );
    }

    #[test]
    fn test_call_renders_funcname() {
        let out = render(vec![TextItem::Call(Call {
            name: "Partition".into(),
            args: Text::close(vec![atom(AtomKind::Math, "A, p", false)]),
            whitespace: true,
        })]);
        assert_eq!(
            out,
            " <span class=\"ps-funcname\">Partition</span>(<span class=\"ps-math\">A, p</span>)"
        );
    }

    #[test]
    fn test_deferred_math_placeholder() {
        let mut html = HtmlBuilder::new();
        let mut spans = 0;
        {
            let mut writer =
                InlineWriter::new(&mut html, &PlainMath, MathCapability::Deferred, &mut spans);
            writer
                .write(
                    &Text::open(vec![atom(AtomKind::Math, "x", false)]),
                    &mut TextStyle::default(),
                )
                .unwrap();
        }
        assert_eq!(spans, 1);
        let nodes = html.finish();
        let mut expected = Element::new("span").with_class("ps-math");
        expected.children.push(Node::Text("\\(x\\)".into()));
        assert_eq!(nodes, vec![Node::Element(expected)]);
    }

    #[test]
    fn test_unknown_special_is_internal_error() {
        let mut html = HtmlBuilder::new();
        let mut spans = 0;
        let mut writer = InlineWriter::new(&mut html, &PlainMath, MathCapability::Inline, &mut spans);
        let err = writer
            .write(
                &Text::open(vec![atom(AtomKind::Special, "\\@", false)]),
                &mut TextStyle::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RenderError::UnexpectedAtom { .. }));
    }
}
