//! Tree walker: groups (root, algorithm, algorithmic, block) > lines > inline text.

use pseudotex_ir::{
    Algorithm, AlgorithmItem, Algorithmic, AlgorithmicItem, Block, BlockItem, Comment, Document,
    Environment, Function, If, Loop, Repeat, Statement, Text, Upon,
};

use crate::dom::{Element, HtmlBuilder, Node};
use crate::math::{MathBackend, MathCapability};
use crate::options::RenderOptions;
use crate::style::{format_number, TextStyle};
use crate::text::InlineWriter;
use crate::RenderError;

/// Result of rendering one document.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The `ps-root` element.
    pub element: Element,
    /// Number of math spans handed to the math backend.
    pub math_spans: usize,
    pub capability: MathCapability,
}

pub struct HtmlRenderer<'a> {
    options: &'a RenderOptions,
    math: &'a dyn MathBackend,
    capability: MathCapability,
    html: HtmlBuilder,
    block_level: usize,
    open_line: bool,
    line_count: usize,
    global_style: TextStyle,
    math_spans: usize,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(options: &'a RenderOptions, math: &'a dyn MathBackend) -> Self {
        Self {
            options,
            math,
            capability: math.capability(),
            html: HtmlBuilder::new(),
            block_level: 0,
            open_line: false,
            line_count: 0,
            global_style: TextStyle::default(),
            math_spans: 0,
        }
    }

    pub fn render(mut self, doc: &Document) -> Result<Rendered, RenderError> {
        if let Some(count) = self.options.caption_count {
            self.options.caption_counter.reset(count);
        }

        self.begin_group("root", None, None);
        for env in &doc.environments {
            match env {
                Environment::Algorithm(algorithm) => self.algorithm(algorithm)?,
                Environment::Algorithmic(algorithmic) => self.algorithmic(algorithmic)?,
            }
        }
        self.end_group();

        if self.block_level != 0 || self.html.depth() != 0 {
            return Err(RenderError::MalformedTree(format!(
                "unbalanced output: block level {}, open elements {}",
                self.block_level,
                self.html.depth()
            )));
        }

        let math_spans = self.math_spans;
        let capability = self.capability;
        let mut nodes = self.html.finish();
        match (nodes.pop(), nodes.is_empty()) {
            (Some(Node::Element(element)), true) => Ok(Rendered {
                element,
                math_spans,
                capability,
            }),
            _ => Err(RenderError::MalformedTree(
                "expected a single root element".to_string(),
            )),
        }
    }

    // ----------------------------------------------------------------- groups

    fn begin_group(&mut self, name: &str, extra_class: Option<&str>, style: Option<String>) {
        self.close_line_if_any();
        let class = match extra_class {
            Some(extra) => format!("ps-{} {}", name, extra),
            None => format!("ps-{}", name),
        };
        self.html.begin_div(&class, style);
    }

    fn end_group(&mut self) {
        self.close_line_if_any();
        self.html.end();
    }

    fn begin_block(&mut self) {
        // The gutter for line numbers sits in the first block's margin.
        let extra = if self.options.line_number && self.block_level == 0 {
            0.6
        } else {
            0.0
        };
        let mut indent = self.options.indent_size + extra;
        if self.options.scope_lines {
            indent /= 2.0;
        }
        self.begin_group(
            "block",
            None,
            Some(format!("margin-left:{}em;", format_number(indent))),
        );
        self.block_level += 1;
    }

    fn end_block(&mut self) {
        self.end_group();
        self.block_level -= 1;
    }

    fn algorithm(&mut self, algorithm: &Algorithm) -> Result<(), RenderError> {
        self.global_style = TextStyle::default();
        match algorithm.caption() {
            Some(caption) => {
                let number = self.options.caption_counter.next();
                log::debug!("caption number {} assigned", number);
                self.begin_group("algorithm", Some("with-caption"), None);
                self.new_line();
                self.type_keyword(&format!("{} {} ", self.options.title_prefix, number));
                self.close_text(caption)?;
            }
            None => self.begin_group("algorithm", None, None),
        }
        for item in &algorithm.items {
            match item {
                AlgorithmItem::Caption(_) => {}
                AlgorithmItem::Algorithmic(algorithmic) => self.algorithmic(algorithmic)?,
            }
        }
        self.end_group();
        Ok(())
    }

    fn algorithmic(&mut self, algorithmic: &Algorithmic) -> Result<(), RenderError> {
        self.global_style = TextStyle::default();
        self.line_count = 0;

        let mut classes = Vec::new();
        if self.options.line_number {
            classes.push("with-linenum");
        }
        if self.options.scope_lines {
            classes.push("with-scopeline");
        }
        let extra = classes.join(" ");
        self.begin_group(
            "algorithmic",
            (!extra.is_empty()).then_some(extra.as_str()),
            None,
        );
        for item in &algorithmic.items {
            match item {
                AlgorithmicItem::Io(statement) => self.statement(statement)?,
                AlgorithmicItem::Block(block) => self.block(block)?,
            }
        }
        self.end_group();
        Ok(())
    }

    fn block(&mut self, block: &Block) -> Result<(), RenderError> {
        self.block_items(&block.items)
    }

    fn block_items(&mut self, items: &[BlockItem]) -> Result<(), RenderError> {
        self.begin_block();
        for item in items {
            self.block_item(item)?;
        }
        self.end_block();
        Ok(())
    }

    /// Renders the body of a construct whose header line is still open.
    ///
    /// Leading comments go on the header line; the rest forms the block.
    fn owned_block(&mut self, block: &Block) -> Result<(), RenderError> {
        let (comments, rest) = block.split_leading_comments();
        for item in comments {
            if let BlockItem::Comment(comment) = item {
                self.comment(comment)?;
            }
        }
        self.block_items(rest)
    }

    // ------------------------------------------------------------- constructs

    fn block_item(&mut self, item: &BlockItem) -> Result<(), RenderError> {
        match item {
            BlockItem::If(node) => self.if_node(node),
            BlockItem::Loop(node) => self.loop_node(node),
            BlockItem::Repeat(node) => self.repeat_node(node),
            BlockItem::Upon(node) => self.upon_node(node),
            BlockItem::Function(node) => self.function_node(node),
            BlockItem::Statement(statement) => self.statement(statement),
            BlockItem::Command(command) => {
                self.new_line();
                self.type_keyword(command.kind.keyword());
                Ok(())
            }
            BlockItem::Comment(comment) => self.comment(comment),
        }
    }

    fn function_node(&mut self, node: &Function) -> Result<(), RenderError> {
        let keyword = node.kind.keyword();
        self.new_line();
        self.type_keyword(&format!("{} ", keyword));
        self.type_func_name(&node.name);
        self.type_text("(");
        self.close_text(&node.args)?;
        self.type_text(")");

        self.owned_block(&node.body)?;

        if !self.options.no_end {
            self.new_line();
            self.type_keyword(&format!("end {}", keyword));
        }
        Ok(())
    }

    fn if_node(&mut self, node: &If) -> Result<(), RenderError> {
        self.new_line();
        self.type_keyword("if ");
        self.close_text(&node.condition)?;
        self.type_keyword(" then");
        self.owned_block(&node.then_block)?;

        for elif in &node.elifs {
            self.new_line();
            self.type_keyword("else if ");
            self.close_text(&elif.condition)?;
            self.type_keyword(" then");
            self.owned_block(&elif.block)?;
        }

        if let Some(else_block) = &node.else_block {
            self.new_line();
            self.type_keyword("else");
            self.owned_block(else_block)?;
        }

        if !self.options.no_end {
            self.new_line();
            self.type_keyword("end if");
        }
        Ok(())
    }

    fn loop_node(&mut self, node: &Loop) -> Result<(), RenderError> {
        self.new_line();
        self.type_keyword(&format!("{} ", node.kind.display_name()));
        self.close_text(&node.condition)?;
        self.type_keyword(" do");
        self.owned_block(&node.body)?;

        if !self.options.no_end {
            self.new_line();
            self.type_keyword(node.kind.end_name());
        }
        Ok(())
    }

    fn repeat_node(&mut self, node: &Repeat) -> Result<(), RenderError> {
        self.new_line();
        self.type_keyword("repeat");
        self.owned_block(&node.body)?;

        self.new_line();
        self.type_keyword("until ");
        self.close_text(&node.condition)
    }

    fn upon_node(&mut self, node: &Upon) -> Result<(), RenderError> {
        self.new_line();
        self.type_keyword("upon ");
        self.close_text(&node.condition)?;
        self.owned_block(&node.body)?;

        if !self.options.no_end {
            self.new_line();
            self.type_keyword("end upon");
        }
        Ok(())
    }

    // ------------------------------------------------------------------ lines

    fn statement(&mut self, statement: &Statement) -> Result<(), RenderError> {
        self.new_line();
        let label = statement.kind.label();
        if !label.is_empty() {
            self.type_keyword(label);
        }
        self.open_text(&statement.text)
    }

    fn comment(&mut self, comment: &Comment) -> Result<(), RenderError> {
        if !self.open_line {
            self.new_line();
        }
        self.html
            .begin_span(Some("ps-comment"), None)
            .put_text(&self.options.comment_delimiter);
        self.close_text(&comment.text)?;
        self.html.end();
        Ok(())
    }

    fn new_line(&mut self) {
        self.close_line_if_any();
        self.open_line = true;
        self.global_style.set_outer_font_size(1.0);
        let indent = self.options.indent_size;

        if self.block_level > 0 {
            // code line, e.g. \STATE
            self.line_count += 1;
            self.html
                .begin_p("ps-line ps-code", Some(self.global_style.to_css()));
            if self.options.line_number {
                let mut extra = indent * 1.25;
                if self.options.scope_lines {
                    extra += indent * 0.1;
                }
                let left = -((self.block_level - 1) as f64 * (indent + extra));
                let number = format!("{}{}", self.line_count, self.options.line_number_punc);
                self.html
                    .begin_span(
                        Some("ps-linenum"),
                        Some(format!("left:{}em;", format_number(left))),
                    )
                    .put_text(&number)
                    .end();
            }
        } else {
            // pre-condition line, e.g. \REQUIRE
            let indent = format_number(indent);
            let style = format!(
                "text-indent:-{}em;padding-left:{}em;{}",
                indent,
                indent,
                self.global_style.to_css()
            );
            self.html.begin_p("ps-line", Some(style));
        }
    }

    fn close_line_if_any(&mut self) {
        if !self.open_line {
            return;
        }
        self.html.end();
        self.open_line = false;
    }

    fn type_keyword(&mut self, keyword: &str) {
        self.html
            .begin_span(Some("ps-keyword"), None)
            .put_text(keyword)
            .end();
    }

    fn type_func_name(&mut self, name: &str) {
        self.html
            .begin_span(Some("ps-funcname"), None)
            .put_text(name)
            .end();
    }

    fn type_text(&mut self, text: &str) {
        self.html.put_text(text);
    }

    // ------------------------------------------------------------------- text

    /// Statement text shares the algorithm-wide style.
    fn open_text(&mut self, text: &Text) -> Result<(), RenderError> {
        let mut writer = InlineWriter::new(
            &mut self.html,
            self.math,
            self.capability,
            &mut self.math_spans,
        );
        writer.write(text, &mut self.global_style)
    }

    /// Braced text gets its own style seeded from the current size.
    fn close_text(&mut self, text: &Text) -> Result<(), RenderError> {
        let mut style = TextStyle::new(self.global_style.font_size());
        let mut writer = InlineWriter::new(
            &mut self.html,
            self.math,
            self.capability,
            &mut self.math_spans,
        );
        writer.write(text, &mut style)
    }
}
