//! Token types for the Carton tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    /// Identifier or keyword: `object`, `code`, `data`, opcode names inside
    /// code blocks. Keywords are distinguished by the parser, not here.
    Identifier,
    /// Quoted string literal: `"name"` (text includes the quotes).
    StringLiteral,
    /// Hex string literal: `hex"00ff"` (text includes the prefix and quotes).
    HexStringLiteral,
    /// Any other single punctuation character that may appear inside a code
    /// block body: `(`, `)`, `:`, `,`, `.`, `->` and friends. The object
    /// parser never consumes these directly; the block parser skips over
    /// them while balancing braces.
    Punct,

    // Trivia tokens
    /// Line comment: `// ...`
    LineComment,
    /// Block comment: `/* ... */`
    BlockComment,
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n` or `\r\n`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Tokenizer error (unterminated literal, malformed hex, unrecognized input)
    Error,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
