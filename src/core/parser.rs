//! Recursive-descent parser
//!
//! Every production decides what to do from the lexer's single lookahead
//! token; there is no backtracking. Keyword matching is case-insensitive.
//!
//! ```text
//! document    := environment* EOF
//! algorithm   := (caption | algorithmic)*
//! algorithmic := (io-statement | block)*
//! block       := (control | function | statement | command | comment)*
//! text        := (atom | call | '{' text '}')*
//! ```

use phf::phf_set;

use pseudotex_ir::{
    Algorithm, AlgorithmItem, Algorithmic, AlgorithmicItem, Atom, AtomKind, Block, BlockItem,
    Call, Command, CommandKind, Comment, Document, ElifBranch, Environment, Function,
    FunctionKind, If, Loop, LoopKind, Repeat, Statement, StatementKind, Text, TextItem, Upon,
};

use super::lexer::Lexer;
use super::token::TokenKind;
use crate::utils::error::Result;

const IO_COMMANDS: &[&str] = &["require", "ensure", "input", "output"];
const STATEMENT_COMMANDS: &[&str] = &["state", "print", "return"];
const BARE_COMMANDS: &[&str] = &["break", "continue"];
const ELIF_COMMANDS: &[&str] = &["elif", "elsif", "elseif"];
const LOOP_COMMANDS: &[&str] = &["for", "forall", "while"];
const FUNCTION_COMMANDS: &[&str] = &["function", "procedure"];

const COND_SYMBOLS: &[&str] = &["and", "or", "not", "true", "false", "to", "downto"];
const SIZING_DECLARATIONS: &[&str] = &[
    "tiny",
    "scriptsize",
    "footnotesize",
    "small",
    "normalsize",
    "large",
    "Large",
    "LARGE",
    "huge",
    "Huge",
];
const FONT_DECLARATIONS: &[&str] = &[
    "normalfont",
    "rmfamily",
    "sffamily",
    "ttfamily",
    "upshape",
    "itshape",
    "slshape",
    "scshape",
    "bfseries",
    "mdseries",
    "lfseries",
];
const FONT_COMMANDS: &[&str] = &[
    "textnormal",
    "textrm",
    "textsf",
    "texttt",
    "textup",
    "textit",
    "textsl",
    "textsc",
    "uppercase",
    "lowercase",
    "textbf",
    "textmd",
    "textlf",
];
const TEXT_SYMBOLS: &[&str] = &["textbackslash"];

/// Token kind (and accepted texts) for each atom kind, tried in order.
const ATOM_TABLE: &[(AtomKind, TokenKind, &[&str])] = &[
    (AtomKind::Ordinary, TokenKind::Ordinary, &[]),
    (AtomKind::Math, TokenKind::Math, &[]),
    (AtomKind::Special, TokenKind::Special, &[]),
    (AtomKind::CondSymbol, TokenKind::Func, COND_SYMBOLS),
    (AtomKind::QuoteSymbol, TokenKind::Quote, &[]),
    (AtomKind::SizingDeclaration, TokenKind::Func, SIZING_DECLARATIONS),
    (AtomKind::FontDeclaration, TokenKind::Func, FONT_DECLARATIONS),
    (AtomKind::FontCommand, TokenKind::Func, FONT_COMMANDS),
    (AtomKind::TextSymbol, TokenKind::Func, TEXT_SYMBOLS),
];

/// Block-level commands that may legitimately follow a statement's text.
static BLOCK_BOUNDARY_COMMANDS: phf::Set<&'static str> = phf_set! {
    "begin", "end", "caption",
    "require", "ensure", "input", "output",
    "state", "print", "return", "break", "continue", "comment",
    "if", "elif", "elsif", "elseif", "else", "endif",
    "for", "forall", "endfor", "while", "endwhile",
    "repeat", "until", "upon", "endupon",
    "function", "endfunction", "procedure", "endprocedure",
};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self> {
        Ok(Parser {
            lexer: Lexer::new(input)?,
        })
    }

    /// Parses the whole input; anything after the last environment is an error.
    pub fn parse(mut self) -> Result<Document> {
        let mut environments = Vec::new();
        while let Some((name, position)) = self.accept_environment()? {
            let env = match name.to_lowercase().as_str() {
                "algorithm" => Environment::Algorithm(self.algorithm_inner()?),
                "algorithmic" => Environment::Algorithmic(self.algorithmic_inner()?),
                _ => {
                    return Err(self
                        .lexer
                        .error_at(format!("Unexpected environment {}", name), position))
                }
            };
            self.close_environment(&name)?;
            environments.push(env);
        }
        self.lexer.expect(TokenKind::Eof, &[])?;
        log::debug!("parsed {} environment(s)", environments.len());
        Ok(Document::new(environments))
    }

    // ------------------------------------------------------------ environments

    /// `\begin{name}`; returns the name and its position.
    fn accept_environment(&mut self) -> Result<Option<(String, usize)>> {
        if self.lexer.accept(TokenKind::Func, &["begin"])?.is_none() {
            return Ok(None);
        }
        self.lexer.expect(TokenKind::Open, &[])?;
        let position = self.lexer.peek().position;
        let name = self.lexer.expect(TokenKind::Ordinary, &[])?;
        self.lexer.expect(TokenKind::Close, &[])?;
        Ok(Some((name, position)))
    }

    /// `\end{name}`
    fn close_environment(&mut self, name: &str) -> Result<()> {
        self.lexer.expect(TokenKind::Func, &["end"])?;
        self.lexer.expect(TokenKind::Open, &[])?;
        self.lexer.expect(TokenKind::Ordinary, &[name])?;
        self.lexer.expect(TokenKind::Close, &[])?;
        Ok(())
    }

    fn algorithm_inner(&mut self) -> Result<Algorithm> {
        let mut items = Vec::new();
        loop {
            if let Some((name, position)) = self.accept_environment()? {
                if !name.eq_ignore_ascii_case("algorithmic") {
                    return Err(self
                        .lexer
                        .error_at(format!("Unexpected environment {}", name), position));
                }
                items.push(AlgorithmItem::Algorithmic(self.algorithmic_inner()?));
                self.close_environment(&name)?;
                continue;
            }
            if let Some(caption) = self.caption()? {
                items.push(AlgorithmItem::Caption(caption));
                continue;
            }
            break;
        }
        Ok(Algorithm { items })
    }

    fn algorithmic_inner(&mut self) -> Result<Algorithmic> {
        let mut items = Vec::new();
        loop {
            if let Some(kind) = self.accept_statement_kind(IO_COMMANDS)? {
                items.push(AlgorithmicItem::Io(self.statement_body(kind)?));
                continue;
            }
            let block = self.block()?;
            if !block.is_empty() {
                items.push(AlgorithmicItem::Block(block));
                continue;
            }
            break;
        }
        Ok(Algorithmic { items })
    }

    fn caption(&mut self) -> Result<Option<Text>> {
        if self.lexer.accept(TokenKind::Func, &["caption"])?.is_none() {
            return Ok(None);
        }
        self.braced_close_text().map(Some)
    }

    // ------------------------------------------------------------------ blocks

    fn block(&mut self) -> Result<Block> {
        let mut items = Vec::new();
        loop {
            if let Some(item) = self.control()? {
                items.push(item);
            } else if let Some(function) = self.function()? {
                items.push(BlockItem::Function(function));
            } else if let Some(kind) = self.accept_statement_kind(STATEMENT_COMMANDS)? {
                items.push(BlockItem::Statement(self.statement_body(kind)?));
            } else if let Some(command) = self.command()? {
                items.push(BlockItem::Command(command));
            } else if let Some(comment) = self.comment()? {
                items.push(BlockItem::Comment(comment));
            } else {
                break;
            }
        }
        Ok(Block::new(items))
    }

    fn control(&mut self) -> Result<Option<BlockItem>> {
        if let Some(node) = self.if_node()? {
            return Ok(Some(BlockItem::If(node)));
        }
        if let Some(node) = self.loop_node()? {
            return Ok(Some(BlockItem::Loop(node)));
        }
        if let Some(node) = self.repeat_node()? {
            return Ok(Some(BlockItem::Repeat(node)));
        }
        if let Some(node) = self.upon_node()? {
            return Ok(Some(BlockItem::Upon(node)));
        }
        Ok(None)
    }

    fn if_node(&mut self) -> Result<Option<If>> {
        if self.lexer.accept(TokenKind::Func, &["if"])?.is_none() {
            return Ok(None);
        }
        let condition = self.braced_close_text()?;
        let then_block = self.block()?;

        let mut elifs = Vec::new();
        while self.lexer.accept(TokenKind::Func, ELIF_COMMANDS)?.is_some() {
            let condition = self.braced_close_text()?;
            let block = self.block()?;
            elifs.push(ElifBranch { condition, block });
        }

        let else_block = match self.lexer.accept(TokenKind::Func, &["else"])? {
            Some(_) => Some(self.block()?),
            None => None,
        };

        self.lexer.expect(TokenKind::Func, &["endif"])?;
        Ok(Some(If {
            condition,
            then_block,
            elifs,
            else_block,
        }))
    }

    fn loop_node(&mut self) -> Result<Option<Loop>> {
        let Some(command) = self.lexer.accept(TokenKind::Func, LOOP_COMMANDS)? else {
            return Ok(None);
        };
        let kind = match command.to_lowercase().as_str() {
            "for" => LoopKind::For,
            "forall" => LoopKind::ForAll,
            _ => LoopKind::While,
        };
        let condition = self.braced_close_text()?;
        let body = self.block()?;

        // forall closes with \ENDFOR
        let end = match kind {
            LoopKind::ForAll => "endfor".to_string(),
            _ => format!("end{}", kind.command()),
        };
        self.lexer.expect(TokenKind::Func, &[end.as_str()])?;
        Ok(Some(Loop {
            kind,
            condition,
            body,
        }))
    }

    fn repeat_node(&mut self) -> Result<Option<Repeat>> {
        if self.lexer.accept(TokenKind::Func, &["repeat"])?.is_none() {
            return Ok(None);
        }
        let body = self.block()?;
        self.lexer.expect(TokenKind::Func, &["until"])?;
        let condition = self.braced_close_text()?;
        Ok(Some(Repeat { body, condition }))
    }

    fn upon_node(&mut self) -> Result<Option<Upon>> {
        if self.lexer.accept(TokenKind::Func, &["upon"])?.is_none() {
            return Ok(None);
        }
        let condition = self.braced_close_text()?;
        let body = self.block()?;
        self.lexer.expect(TokenKind::Func, &["endupon"])?;
        Ok(Some(Upon { condition, body }))
    }

    fn function(&mut self) -> Result<Option<Function>> {
        let Some(command) = self.lexer.accept(TokenKind::Func, FUNCTION_COMMANDS)? else {
            return Ok(None);
        };
        let kind = if command.eq_ignore_ascii_case("procedure") {
            FunctionKind::Procedure
        } else {
            FunctionKind::Function
        };
        self.lexer.expect(TokenKind::Open, &[])?;
        let name = self.lexer.expect(TokenKind::Ordinary, &[])?;
        self.lexer.expect(TokenKind::Close, &[])?;
        let args = self.braced_close_text()?;
        let body = self.block()?;

        let end = format!("end{}", kind.keyword());
        self.lexer.expect(TokenKind::Func, &[end.as_str()])?;
        Ok(Some(Function {
            kind,
            name,
            args,
            body,
        }))
    }

    fn accept_statement_kind(&mut self, commands: &[&str]) -> Result<Option<StatementKind>> {
        let Some(command) = self.lexer.accept(TokenKind::Func, commands)? else {
            return Ok(None);
        };
        let kind = match command.to_lowercase().as_str() {
            "require" => StatementKind::Require,
            "ensure" => StatementKind::Ensure,
            "input" => StatementKind::Input,
            "output" => StatementKind::Output,
            "print" => StatementKind::Print,
            "return" => StatementKind::Return,
            _ => StatementKind::State,
        };
        Ok(Some(kind))
    }

    /// Open text after a statement command.
    ///
    /// The text ends at the first token that cannot continue it. If that
    /// token is a command no production knows, report it here rather than
    /// as a confusing mismatch further up.
    fn statement_body(&mut self, kind: StatementKind) -> Result<Statement> {
        let text = self.text(Text::open)?;
        let next = self.lexer.peek();
        if next.kind == TokenKind::Func
            && !BLOCK_BOUNDARY_COMMANDS.contains(next.text.to_lowercase().as_str())
        {
            return Err(self.lexer.error_at(
                format!("Unrecognized command \\{}", next.text),
                next.position,
            ));
        }
        Ok(Statement { kind, text })
    }

    fn command(&mut self) -> Result<Option<Command>> {
        let Some(command) = self.lexer.accept(TokenKind::Func, BARE_COMMANDS)? else {
            return Ok(None);
        };
        let kind = if command.eq_ignore_ascii_case("break") {
            CommandKind::Break
        } else {
            CommandKind::Continue
        };
        Ok(Some(Command { kind }))
    }

    fn comment(&mut self) -> Result<Option<Comment>> {
        if self.lexer.accept(TokenKind::Func, &["comment"])?.is_none() {
            return Ok(None);
        }
        let text = self.braced_close_text()?;
        Ok(Some(Comment { text }))
    }

    // -------------------------------------------------------------------- text

    /// `{` close-text `}`
    fn braced_close_text(&mut self) -> Result<Text> {
        self.lexer.expect(TokenKind::Open, &[])?;
        let text = self.text(Text::close)?;
        self.lexer.expect(TokenKind::Close, &[])?;
        Ok(text)
    }

    /// Atoms, calls and brace groups until none of them matches.
    fn text(&mut self, make: fn(Vec<TextItem>) -> Text) -> Result<Text> {
        let mut items = Vec::new();
        loop {
            if let Some(atom) = self.atom()? {
                items.push(TextItem::Atom(atom));
                continue;
            }
            if let Some(call) = self.call()? {
                items.push(TextItem::Call(call));
                continue;
            }
            if self.lexer.accept(TokenKind::Open, &[])?.is_some() {
                let whitespace = self.whitespace_before_current();
                let mut group = self.text(Text::close)?;
                group.whitespace = whitespace;
                self.lexer.expect(TokenKind::Close, &[])?;
                items.push(TextItem::Group(group));
                continue;
            }
            break;
        }
        Ok(make(items))
    }

    fn atom(&mut self) -> Result<Option<Atom>> {
        for &(kind, token_kind, texts) in ATOM_TABLE {
            let Some(text) = self.lexer.accept(token_kind, texts)? else {
                continue;
            };
            let whitespace = self.whitespace_before_current();
            let value = match kind {
                // Size names differ only by case (large, Large, LARGE).
                AtomKind::Ordinary | AtomKind::Math | AtomKind::SizingDeclaration => text,
                _ => text.to_lowercase(),
            };
            return Ok(Some(Atom::new(kind, value, whitespace)));
        }
        Ok(None)
    }

    /// `\CALL{name}{args}`
    fn call(&mut self) -> Result<Option<Call>> {
        if self.lexer.accept(TokenKind::Func, &["call"])?.is_none() {
            return Ok(None);
        }
        let whitespace = self.whitespace_before_current();
        self.lexer.expect(TokenKind::Open, &[])?;
        let name = self.lexer.expect(TokenKind::Ordinary, &[])?;
        self.lexer.expect(TokenKind::Close, &[])?;
        let args = self.braced_close_text()?;
        Ok(Some(Call {
            name,
            args,
            whitespace,
        }))
    }

    fn whitespace_before_current(&self) -> bool {
        self.lexer.current().is_some_and(|token| token.whitespace)
    }
}
