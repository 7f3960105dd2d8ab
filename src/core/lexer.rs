//! Pseudocode lexer
//!
//! Turns source text into [`Token`]s on demand, keeping exactly one token of
//! lookahead. Whitespace and `%` line comments between tokens are skipped;
//! whether whitespace was skipped is recorded on the following token.

use super::token::{Token, TokenKind};
use crate::utils::error::{PseudotexError, Result};

pub struct Lexer<'a> {
    input: &'a str,
    chars: Vec<char>,
    /// Character offset of the first unscanned character
    pos: usize,
    current: Option<Token>,
    next: Token,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer and scans the first token.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer {
            input,
            chars: input.chars().collect(),
            pos: 0,
            current: None,
            next: Token::eof(false, 0),
        };
        lexer.next = lexer.read_token()?;
        Ok(lexer)
    }

    /// The lookahead token, not yet consumed.
    pub fn peek(&self) -> &Token {
        &self.next
    }

    /// The most recently consumed token.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Consumes the lookahead if it matches `kind` and, when given, any of
    /// `texts` (case-insensitively). Returns the consumed text.
    pub fn accept(&mut self, kind: TokenKind, texts: &[&str]) -> Result<Option<String>> {
        if !self.next.matches(kind, texts) {
            return Ok(None);
        }
        let text = self.next.text.clone();
        self.advance()?;
        Ok(Some(text))
    }

    /// Like [`accept`](Self::accept), but a mismatch is a parse error.
    pub fn expect(&mut self, kind: TokenKind, texts: &[&str]) -> Result<String> {
        if self.next.kind != kind {
            return Err(self.error_at(
                format!(
                    "Expect an atom of {} but received {}",
                    kind, self.next.kind
                ),
                self.next.position,
            ));
        }
        if !self.next.matches(kind, texts) {
            return Err(self.error_at(
                format!(
                    "Expect `{}` for {} but received `{}`",
                    texts.join("|"),
                    kind,
                    self.next.text
                ),
                self.next.position,
            ));
        }
        let text = self.next.text.clone();
        self.advance()?;
        Ok(text)
    }

    /// A parse error at `position` with an excerpt of this lexer's input.
    pub fn error_at(&self, message: impl Into<String>, position: usize) -> PseudotexError {
        PseudotexError::parse_at(message, position, self.input)
    }

    fn advance(&mut self) -> Result<()> {
        let next = self.read_token()?;
        self.current = Some(std::mem::replace(&mut self.next, next));
        Ok(())
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Skips whitespace and comments; true if any whitespace was skipped.
    /// Comments alone do not count as whitespace.
    fn skip_blank(&mut self) -> bool {
        let mut whitespace = false;
        loop {
            match self.char_at(self.pos) {
                Some(c) if c.is_whitespace() => {
                    self.pos += 1;
                    whitespace = true;
                }
                Some('%') => {
                    while let Some(c) = self.char_at(self.pos) {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return whitespace,
            }
        }
    }

    fn read_token(&mut self) -> Result<Token> {
        let whitespace = self.skip_blank();
        let start = self.pos;
        let Some(c) = self.char_at(start) else {
            return Ok(Token::eof(whitespace, start));
        };

        match c {
            '\\' => match self.char_at(start + 1) {
                Some(escaped) if is_special_char(escaped) => {
                    self.pos += 2;
                    Ok(Token::new(
                        TokenKind::Special,
                        format!("\\{}", escaped),
                        whitespace,
                        start,
                    ))
                }
                Some('(') => self.read_math(start, 2, &['\\', ')'], whitespace),
                Some(letter) if letter.is_ascii_alphabetic() => {
                    let mut end = start + 1;
                    while self.char_at(end).is_some_and(|c| c.is_ascii_alphabetic()) {
                        end += 1;
                    }
                    let name: String = self.chars[start + 1..end].iter().collect();
                    self.pos = end;
                    Ok(Token::new(TokenKind::Func, name, whitespace, start))
                }
                _ => Err(self.error_at("Unrecognizable atom", start)),
            },
            '$' => self.read_math(start, 1, &['$'], whitespace),
            '{' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Open, "{", whitespace, start))
            }
            '}' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Close, "}", whitespace, start))
            }
            '`' | '\'' => {
                // `` and '' win over a single quote
                let len = if self.char_at(start + 1) == Some(c) { 2 } else { 1 };
                self.pos += len;
                let quote: String = self.chars[start..start + len].iter().collect();
                Ok(Token::new(TokenKind::Quote, quote, whitespace, start))
            }
            c if is_ordinary_char(c) => {
                let mut end = start + 1;
                while self.char_at(end).is_some_and(is_ordinary_char) {
                    end += 1;
                }
                let text: String = self.chars[start..end].iter().collect();
                self.pos = end;
                Ok(Token::new(TokenKind::Ordinary, text, whitespace, start))
            }
            _ => Err(self.error_at("Unrecognizable atom", start)),
        }
    }

    /// Scans a math span opened at `start` by a delimiter of `open_len`
    /// characters, up to the first `close` not preceded by a backslash.
    fn read_math(
        &mut self,
        start: usize,
        open_len: usize,
        close: &[char],
        whitespace: bool,
    ) -> Result<Token> {
        let content_start = start + open_len;
        let mut i = content_start;
        while i + close.len() <= self.chars.len() {
            if self.chars[i..i + close.len()] == *close {
                if self.chars[i - 1] == '\\' {
                    i += close.len();
                    continue;
                }
                let tex: String = self.chars[content_start..i].iter().collect();
                self.pos = i + close.len();
                return Ok(Token::new(TokenKind::Math, tex, whitespace, start));
            }
            i += 1;
        }
        Err(self.error_at("Math environment is not closed", start))
    }
}

fn is_special_char(c: char) -> bool {
    matches!(c, '\\' | '{' | '}' | '$' | '&' | '#' | '%' | '_')
}

fn is_ordinary_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '\\' | '{' | '}' | '$' | '&' | '#' | '%' | '_')
}
