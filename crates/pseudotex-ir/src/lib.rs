//! Parse tree for algorithm pseudocode.
//!
//! Interior nodes (environments, blocks, control constructs) own their
//! children directly; leaf atoms carry the whitespace flag the renderer uses
//! to decide on separating spaces. The tree is immutable once built.

use std::fmt;

/// The root node: every `algorithm`/`algorithmic` environment in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub environments: Vec<Environment>,
}

impl Document {
    pub fn new(environments: Vec<Environment>) -> Self {
        Self { environments }
    }

    pub fn kind(&self) -> &'static str {
        "root"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Algorithm(Algorithm),
    Algorithmic(Algorithmic),
}

impl Environment {
    pub fn kind(&self) -> &'static str {
        match self {
            Environment::Algorithm(_) => "algorithm",
            Environment::Algorithmic(_) => "algorithmic",
        }
    }
}

/// Body of `\begin{algorithm}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Algorithm {
    pub items: Vec<AlgorithmItem>,
}

impl Algorithm {
    /// The caption that titles the algorithm. When several are given the last wins.
    pub fn caption(&self) -> Option<&Text> {
        self.items.iter().rev().find_map(|item| match item {
            AlgorithmItem::Caption(text) => Some(text),
            AlgorithmItem::Algorithmic(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmItem {
    Caption(Text),
    Algorithmic(Algorithmic),
}

/// Body of `\begin{algorithmic}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Algorithmic {
    pub items: Vec<AlgorithmicItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmicItem {
    /// `\REQUIRE`, `\ENSURE`, `\INPUT` or `\OUTPUT`.
    Io(Statement),
    Block(Block),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

impl Block {
    pub fn new(items: Vec<BlockItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splits off the comments that open the block.
    ///
    /// Those comments annotate the construct owning the block, so the
    /// renderer places them on the construct's header line.
    pub fn split_leading_comments(&self) -> (&[BlockItem], &[BlockItem]) {
        let count = self
            .items
            .iter()
            .take_while(|item| matches!(item, BlockItem::Comment(_)))
            .count();
        self.items.split_at(count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    If(If),
    Loop(Loop),
    Repeat(Repeat),
    Upon(Upon),
    Function(Function),
    Statement(Statement),
    Command(Command),
    Comment(Comment),
}

impl BlockItem {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockItem::If(_) => "if",
            BlockItem::Loop(_) => "loop",
            BlockItem::Repeat(_) => "repeat",
            BlockItem::Upon(_) => "upon",
            BlockItem::Function(_) => "function",
            BlockItem::Statement(_) => "statement",
            BlockItem::Command(_) => "command",
            BlockItem::Comment(_) => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub condition: Text,
    pub then_block: Block,
    pub elifs: Vec<ElifBranch>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElifBranch {
    pub condition: Text,
    pub block: Block,
}

/// A positional child of an `if` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfChild<'a> {
    Condition(&'a Text),
    Block(&'a Block),
}

impl If {
    pub fn elif_count(&self) -> usize {
        self.elifs.len()
    }

    pub fn has_else(&self) -> bool {
        self.else_block.is_some()
    }

    /// Children in the flat layout `[cond0, block0, ..., condN, blockN, else?]`.
    pub fn children(&self) -> Vec<IfChild<'_>> {
        let mut children = Vec::with_capacity(2 + 2 * self.elifs.len() + 1);
        children.push(IfChild::Condition(&self.condition));
        children.push(IfChild::Block(&self.then_block));
        for elif in &self.elifs {
            children.push(IfChild::Condition(&elif.condition));
            children.push(IfChild::Block(&elif.block));
        }
        if let Some(block) = &self.else_block {
            children.push(IfChild::Block(block));
        }
        children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    ForAll,
    While,
}

impl LoopKind {
    /// Command name as written in source, lower-cased.
    pub fn command(&self) -> &'static str {
        match self {
            LoopKind::For => "for",
            LoopKind::ForAll => "forall",
            LoopKind::While => "while",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LoopKind::For => "for",
            LoopKind::ForAll => "for all",
            LoopKind::While => "while",
        }
    }

    /// Keyword shown on the closing line. `forall` closes like `for`.
    pub fn end_name(&self) -> &'static str {
        match self {
            LoopKind::For | LoopKind::ForAll => "end for",
            LoopKind::While => "end while",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub kind: LoopKind,
    pub condition: Text,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub body: Block,
    pub condition: Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upon {
    pub condition: Text,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Procedure,
}

impl FunctionKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Procedure => "procedure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub kind: FunctionKind,
    pub name: String,
    pub args: Text,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    State,
    Print,
    Return,
    Require,
    Ensure,
    Input,
    Output,
}

impl StatementKind {
    pub fn command(&self) -> &'static str {
        match self {
            StatementKind::State => "state",
            StatementKind::Print => "print",
            StatementKind::Return => "return",
            StatementKind::Require => "require",
            StatementKind::Ensure => "ensure",
            StatementKind::Input => "input",
            StatementKind::Output => "output",
        }
    }

    /// Label typed before the statement text; empty for `\STATE`.
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::State => "",
            StatementKind::Print => "print ",
            StatementKind::Return => "return ",
            StatementKind::Require => "Require: ",
            StatementKind::Ensure => "Ensure: ",
            StatementKind::Input => "Input: ",
            StatementKind::Output => "Output: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub text: Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Break,
    Continue,
}

impl CommandKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Break => "break",
            CommandKind::Continue => "continue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Statement bodies: ended by the next token that is not text.
    Open,
    /// Brace-delimited text: conditions, arguments, captions and groups.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub kind: TextKind,
    /// Whitespace preceded the opening brace of a nested group.
    pub whitespace: bool,
    pub items: Vec<TextItem>,
}

impl Text {
    pub fn open(items: Vec<TextItem>) -> Self {
        Self {
            kind: TextKind::Open,
            whitespace: false,
            items,
        }
    }

    pub fn close(items: Vec<TextItem>) -> Self {
        Self {
            kind: TextKind::Close,
            whitespace: false,
            items,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TextKind::Open => "open-text",
            TextKind::Close => "close-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextItem {
    Atom(Atom),
    Call(Call),
    Group(Text),
}

impl TextItem {
    pub fn whitespace(&self) -> bool {
        match self {
            TextItem::Atom(atom) => atom.whitespace,
            TextItem::Call(call) => call.whitespace,
            TextItem::Group(text) => text.whitespace,
        }
    }

    /// Grammar name: the atom kind, `call`, or the group's text kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TextItem::Atom(atom) => atom.kind.name(),
            TextItem::Call(_) => "call",
            TextItem::Group(text) => text.kind_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    Ordinary,
    Math,
    Special,
    CondSymbol,
    QuoteSymbol,
    SizingDeclaration,
    FontDeclaration,
    FontCommand,
    TextSymbol,
}

impl AtomKind {
    pub fn name(&self) -> &'static str {
        match self {
            AtomKind::Ordinary => "ordinary",
            AtomKind::Math => "math",
            AtomKind::Special => "special",
            AtomKind::CondSymbol => "cond-symbol",
            AtomKind::QuoteSymbol => "quote-symbol",
            AtomKind::SizingDeclaration => "sizing-dclr",
            AtomKind::FontDeclaration => "font-dclr",
            AtomKind::FontCommand => "font-cmd",
            AtomKind::TextSymbol => "text-symbol",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub kind: AtomKind,
    pub value: String,
    pub whitespace: bool,
}

impl Atom {
    pub fn new(kind: AtomKind, value: impl Into<String>, whitespace: bool) -> Self {
        Self {
            kind,
            value: value.into(),
            whitespace,
        }
    }
}

/// `\CALL{name}{args}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub args: Text,
    pub whitespace: bool,
}

// =============================================================================
// Tree dump
// =============================================================================

struct TreeWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    depth: usize,
}

impl TreeWriter<'_, '_> {
    fn line(&mut self, label: fmt::Arguments<'_>) -> fmt::Result {
        writeln!(self.f, "{:indent$}{}", "", label, indent = self.depth * 2)
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn algorithmic(&mut self, algorithmic: &Algorithmic) -> fmt::Result {
        self.line(format_args!("algorithmic"))?;
        self.nested(|w| {
            for item in &algorithmic.items {
                match item {
                    AlgorithmicItem::Io(statement) => w.statement(statement)?,
                    AlgorithmicItem::Block(block) => w.block(block)?,
                }
            }
            Ok(())
        })
    }

    fn block(&mut self, block: &Block) -> fmt::Result {
        self.line(format_args!("block"))?;
        self.nested(|w| {
            for item in &block.items {
                w.block_item(item)?;
            }
            Ok(())
        })
    }

    fn block_item(&mut self, item: &BlockItem) -> fmt::Result {
        match item {
            BlockItem::If(node) => {
                self.line(format_args!(
                    "if (elif: {}, else: {})",
                    node.elif_count(),
                    node.has_else()
                ))?;
                self.nested(|w| {
                    for child in node.children() {
                        match child {
                            IfChild::Condition(text) => w.text(text)?,
                            IfChild::Block(block) => w.block(block)?,
                        }
                    }
                    Ok(())
                })
            }
            BlockItem::Loop(node) => {
                self.line(format_args!("loop ({})", node.kind.command()))?;
                self.nested(|w| {
                    w.text(&node.condition)?;
                    w.block(&node.body)
                })
            }
            BlockItem::Repeat(node) => {
                self.line(format_args!("repeat"))?;
                self.nested(|w| {
                    w.block(&node.body)?;
                    w.text(&node.condition)
                })
            }
            BlockItem::Upon(node) => {
                self.line(format_args!("upon"))?;
                self.nested(|w| {
                    w.text(&node.condition)?;
                    w.block(&node.body)
                })
            }
            BlockItem::Function(node) => {
                self.line(format_args!(
                    "function ({} {})",
                    node.kind.keyword(),
                    node.name
                ))?;
                self.nested(|w| {
                    w.text(&node.args)?;
                    w.block(&node.body)
                })
            }
            BlockItem::Statement(statement) => self.statement(statement),
            BlockItem::Command(command) => {
                self.line(format_args!("command ({})", command.kind.keyword()))
            }
            BlockItem::Comment(comment) => {
                self.line(format_args!("comment"))?;
                self.nested(|w| w.text(&comment.text))
            }
        }
    }

    fn statement(&mut self, statement: &Statement) -> fmt::Result {
        self.line(format_args!("statement ({})", statement.kind.command()))?;
        self.nested(|w| w.text(&statement.text))
    }

    fn text(&mut self, text: &Text) -> fmt::Result {
        self.line(format_args!("{}", text.kind_name()))?;
        self.nested(|w| {
            for item in &text.items {
                match item {
                    TextItem::Atom(atom) => w.line(format_args!(
                        "{}: {:?}{}",
                        atom.kind.name(),
                        atom.value,
                        if atom.whitespace { " (ws)" } else { "" }
                    ))?,
                    TextItem::Call(call) => {
                        w.line(format_args!("call ({})", call.name))?;
                        w.nested(|w| w.text(&call.args))?;
                    }
                    TextItem::Group(group) => w.text(group)?,
                }
            }
            Ok(())
        })
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = TreeWriter { f, depth: 0 };
        writer.line(format_args!("root"))?;
        writer.nested(|w| {
            for env in &self.environments {
                match env {
                    Environment::Algorithm(algorithm) => {
                        w.line(format_args!("algorithm"))?;
                        w.nested(|w| {
                            for item in &algorithm.items {
                                match item {
                                    AlgorithmItem::Caption(text) => {
                                        w.line(format_args!("caption"))?;
                                        w.nested(|w| w.text(text))?;
                                    }
                                    AlgorithmItem::Algorithmic(inner) => w.algorithmic(inner)?,
                                }
                            }
                            Ok(())
                        })?;
                    }
                    Environment::Algorithmic(algorithmic) => w.algorithmic(algorithmic)?,
                }
            }
            Ok(())
        })
    }
}
