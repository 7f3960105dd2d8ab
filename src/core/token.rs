//! Token definitions for the pseudocode lexer.

use std::fmt;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An escaped character: `\\`, `\{`, `\}`, `\$`, `\&`, `\#`, `\%` or `\_`.
    Special,
    /// Inline math; the text excludes the delimiters.
    Math,
    /// A command like `\STATE`; the text excludes the backslash.
    Func,
    /// `{`
    Open,
    /// `}`
    Close,
    /// `` ` ``, ``` `` ```, `'` or `''`.
    Quote,
    /// A run of characters with no special meaning.
    Ordinary,
    /// End of input marker
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Special => "special",
            TokenKind::Math => "math",
            TokenKind::Func => "func",
            TokenKind::Open => "open",
            TokenKind::Close => "close",
            TokenKind::Quote => "quote",
            TokenKind::Ordinary => "ordinary",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Whitespace came between this token and the previous one.
    pub whitespace: bool,
    /// Character offset of the token's first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, whitespace: bool, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            whitespace,
            position,
        }
    }

    pub fn eof(whitespace: bool, position: usize) -> Self {
        Self::new(TokenKind::Eof, "", whitespace, position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Case-insensitive match on kind and, when `texts` is non-empty, on any
    /// one of `texts`.
    pub fn matches(&self, kind: TokenKind, texts: &[&str]) -> bool {
        self.kind == kind
            && (texts.is_empty() || texts.iter().any(|t| t.eq_ignore_ascii_case(&self.text)))
    }
}
