//! Token stream adapter over the tokenizer.
//!
//! Skips trivia, keeps the comment text attached to the current position
//! (needed for `@use-src` annotation lookup), and decodes string and hex
//! literals on demand.

use std::borrow::Cow;

use carton_tokenizer::{Span, Token, TokenKind, Tokenizer};
use tracing::trace;

use crate::error::{ErrorReporter, ParseErrorKind, ParseResult};

/// A stream of significant tokens with one token of lookahead (the current
/// token itself).
pub struct TokenStream<'src> {
    tokenizer: Tokenizer<'src>,
    current: Token<'src>,
    /// Comment text skipped immediately before `current`, newline-joined.
    comment: String,
}

impl<'src> TokenStream<'src> {
    /// Create a stream positioned on the first significant token.
    pub fn new(source: &'src str) -> Self {
        let mut tokenizer = Tokenizer::new(source);
        let mut comment = String::new();
        let current = next_significant(&mut tokenizer, &mut comment);
        Self {
            tokenizer,
            current,
            comment,
        }
    }

    /// The full source text the stream reads from.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.tokenizer.source()
    }

    /// The current token.
    #[inline]
    pub fn current(&self) -> &Token<'src> {
        &self.current
    }

    /// The current token's kind.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.current.kind
    }

    /// The current token's span.
    #[inline]
    pub fn span(&self) -> Span {
        self.current.span
    }

    /// Whether the current token is the given keyword.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.current.kind == TokenKind::Identifier && self.current.text == keyword
    }

    /// Comment text attached to the current position (the comments skipped
    /// directly before the current token), or empty.
    pub fn comment_literal(&self) -> &str {
        &self.comment
    }

    /// Move to the next significant token.
    pub fn advance(&mut self) {
        self.comment.clear();
        self.current = next_significant(&mut self.tokenizer, &mut self.comment);
        trace!("Advanced to {:?}", self.current.kind);
    }

    /// Require the current token to be of the given kind and consume it.
    /// Mismatch is a structural (fatal) error.
    pub fn expect(&mut self, kind: TokenKind, reporter: &mut ErrorReporter) -> ParseResult<()> {
        if self.current.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(reporter.fatal(
                ParseErrorKind::ExpectedToken {
                    expected: kind,
                    found: self.current.kind,
                },
                self.current.span,
            ))
        }
    }

    /// The current token's literal text: quoted strings are unquoted and
    /// escape-resolved, everything else is the raw token text.
    pub fn literal(&self) -> Cow<'src, str> {
        match self.current.kind {
            TokenKind::StringLiteral => unescape_string(strip_quotes(self.current.text)),
            _ => Cow::Borrowed(self.current.text),
        }
    }

    /// The current literal decoded to raw bytes: hex string literals decode
    /// their digit pairs, quoted strings yield their escape-resolved bytes.
    pub fn literal_bytes(&self) -> Vec<u8> {
        match self.current.kind {
            TokenKind::HexStringLiteral => decode_hex_literal(self.current.text),
            TokenKind::StringLiteral => self.literal().into_owned().into_bytes(),
            _ => self.current.text.as_bytes().to_vec(),
        }
    }
}

/// Pull tokens until a significant one, collecting comment text on the way.
fn next_significant<'src>(tokenizer: &mut Tokenizer<'src>, comment: &mut String) -> Token<'src> {
    loop {
        let token = tokenizer.next_token();
        if token.kind.is_comment() {
            if !comment.is_empty() {
                comment.push('\n');
            }
            comment.push_str(comment_content(token.kind, token.text));
            continue;
        }
        if token.kind.is_trivia() {
            continue;
        }
        return token;
    }
}

/// Strip the comment delimiters, including the extra doc-comment marker, so
/// annotation lookup sees only the comment's content.
fn comment_content(kind: TokenKind, text: &str) -> &str {
    match kind {
        TokenKind::LineComment => {
            let text = text.strip_prefix("//").unwrap_or(text);
            text.strip_prefix('/').unwrap_or(text)
        }
        TokenKind::BlockComment => {
            let text = text.strip_prefix("/*").unwrap_or(text);
            let text = text.strip_suffix("*/").unwrap_or(text);
            text.strip_prefix('*').unwrap_or(text)
        }
        _ => text,
    }
}

/// Remove the surrounding quotes from a string literal's text.
fn strip_quotes(text: &str) -> &str {
    debug_assert!(text.len() >= 2 && text.starts_with('"'));
    // The closing quote may be missing only on error tokens, which never
    // reach literal decoding.
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

/// Resolve backslash escapes in a string literal's content.
fn unescape_string(inner: &str) -> Cow<'_, str> {
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            // Unknown escapes keep their backslash.
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    Cow::Owned(result)
}

/// Decode the digit pairs of a `hex"…"` literal. The tokenizer already
/// validated the content, so stray characters cannot appear here.
fn decode_hex_literal(text: &str) -> Vec<u8> {
    let inner = text
        .strip_prefix("hex\"")
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let digits: Vec<u8> = inner
        .bytes()
        .filter(|b| *b != b'_')
        .map(|b| (b as char).to_digit(16).unwrap_or(0) as u8)
        .collect();
    debug_assert!(digits.len() % 2 == 0);
    digits.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_trivia() {
        let mut stream = TokenStream::new("object   \n  \"a\"");
        assert!(stream.is_keyword("object"));
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::StringLiteral);
        assert_eq!(stream.literal(), "a");
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Eof);
    }

    #[test]
    fn test_comment_attaches_to_next_token() {
        let mut stream = TokenStream::new("object // note\n\"a\"");
        assert_eq!(stream.comment_literal(), "");
        stream.advance();
        assert_eq!(stream.comment_literal(), " note");
        stream.advance();
        assert_eq!(stream.comment_literal(), "");
    }

    #[test]
    fn test_consecutive_comments_join() {
        let mut stream = TokenStream::new("// one\n/* two */ object");
        assert_eq!(stream.comment_literal(), " one\n two ");
        assert!(stream.is_keyword("object"));
    }

    #[test]
    fn test_doc_comment_markers_stripped() {
        let mut stream = TokenStream::new("/// dashed\nobject");
        assert_eq!(stream.comment_literal(), " dashed");
        let mut stream = TokenStream::new("/** starred */ object");
        assert_eq!(stream.comment_literal(), " starred ");
    }

    #[test]
    fn test_string_escapes() {
        let stream = TokenStream::new(r#""a\"b\n""#);
        assert_eq!(stream.literal(), "a\"b\n");
    }

    #[test]
    fn test_hex_literal_bytes() {
        let stream = TokenStream::new(r#"hex"00_ff10""#);
        assert_eq!(stream.literal_bytes(), vec![0x00, 0xff, 0x10]);
    }

    #[test]
    fn test_string_literal_bytes() {
        let stream = TokenStream::new(r#""AB\t""#);
        assert_eq!(stream.literal_bytes(), vec![b'A', b'B', b'\t']);
    }

    #[test]
    fn test_expect_mismatch_is_fatal() {
        let mut stream = TokenStream::new("object");
        let mut reporter = ErrorReporter::new();
        assert!(stream.expect(TokenKind::LBrace, &mut reporter).is_err());
        assert!(reporter.has_errors());
    }
}
