//! Tokenizer for the Carton object container format.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from Carton source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// The full source text this tokenizer reads from.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        if self.is_eof() {
            return self.token(TokenKind::Eof, self.pos);
        }

        let start = self.pos;
        let c = self.peek().unwrap();

        match c {
            // Structural tokens
            '{' => {
                self.advance();
                self.token(TokenKind::LBrace, start)
            }
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start)
            }

            // Quoted string literal
            '"' => self.tokenize_string_literal(),

            // Comments
            '/' if self.starts_with("//") => self.tokenize_line_comment(),
            '/' if self.starts_with("/*") => self.tokenize_block_comment(),

            // Whitespace
            ' ' | '\t' => self.tokenize_whitespace(),

            // Newline
            '\n' => {
                self.advance();
                self.token(TokenKind::Newline, start)
            }
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                self.token(TokenKind::Newline, start)
            }

            // Identifier, keyword, or hex string literal
            _ if is_identifier_start(c) => self.tokenize_identifier_or_hex(),
            _ if c.is_ascii_digit() => self.tokenize_identifier_like(),

            // Any other printable punctuation appears only inside code block
            // bodies; emit it as a single Punct token.
            _ if !c.is_control() => {
                self.advance();
                self.token(TokenKind::Punct, start)
            }

            // Error: unrecognized character
            _ => {
                self.advance();
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Tokenize horizontal whitespace (spaces and tabs).
    fn tokenize_whitespace(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Whitespace, start)
    }

    /// Tokenize an identifier, keyword, or `hex"…"` literal.
    fn tokenize_identifier_or_hex(&mut self) -> Token<'src> {
        // `hex` immediately followed by a quote starts a hex string literal.
        if self.starts_with("hex\"") {
            return self.tokenize_hex_string_literal();
        }
        self.tokenize_identifier_like()
    }

    /// Tokenize an identifier-shaped run. Numbers in code block bodies land
    /// here too; the object parser never consumes them, only balances past.
    fn tokenize_identifier_like(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_identifier_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Identifier, start)
    }

    /// Tokenize a quoted string literal: `"..."` with backslash escapes.
    fn tokenize_string_literal(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance(); // consume opening quote

        loop {
            match self.peek() {
                // Unterminated string
                None | Some('\n') => return self.token(TokenKind::Error, start),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.token(TokenKind::StringLiteral, start)
    }

    /// Tokenize a hex string literal: `hex"00ff"`.
    ///
    /// The content must be an even number of hex digits, optionally broken
    /// by underscores. Anything else makes the whole literal an error token.
    fn tokenize_hex_string_literal(&mut self) -> Token<'src> {
        let start = self.pos;
        for _ in 0.."hex\"".len() {
            self.advance();
        }

        let mut digits = 0usize;
        let mut valid = true;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    // Unterminated literal
                    return self.token(TokenKind::Error, start);
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('_') => {
                    self.advance();
                }
                Some(c) if c.is_ascii_hexdigit() => {
                    digits += 1;
                    self.advance();
                }
                Some(_) => {
                    valid = false;
                    self.advance();
                }
            }
        }

        if valid && digits % 2 == 0 {
            self.token(TokenKind::HexStringLiteral, start)
        } else {
            self.token(TokenKind::Error, start)
        }
    }

    /// Tokenize a line comment: `// ...` (without the trailing newline).
    fn tokenize_line_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.advance();

        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::LineComment, start)
    }

    /// Tokenize a block comment: `/* ... */`. Unterminated comments are
    /// error tokens covering the rest of the input.
    fn tokenize_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.advance();

        loop {
            if self.is_eof() {
                return self.token(TokenKind::Error, start);
            }
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.token(TokenKind::BlockComment, start)
    }
}

/// Whether a character can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Whether a character can continue an identifier. Dots are allowed so that
/// dotted names like `memoryguard` dialect builtins or `a.b` labels stay a
/// single token.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}
