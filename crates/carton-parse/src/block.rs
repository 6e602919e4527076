//! The inner code block and the seam to its parser.
//!
//! The object tree parser treats the executable block's language as opaque:
//! it hands the token stream to a [`BlockParser`] and stores whatever handle
//! comes back. The default [`RawBlockParser`] consumes one balanced-brace
//! block and captures its raw body without interpreting it; a real
//! inner-language frontend plugs in through the same trait.

use carton_tokenizer::{Span, TokenKind};
use tracing::trace;

use crate::annotation::ReverseSourceNameMap;
use crate::error::{ErrorReporter, ParseErrorKind, ParseResult};
use crate::stream::TokenStream;

/// Capability descriptor for the inner code-block language.
///
/// Opcode and identifier validation against the dialect is the inner
/// parser's business; this type only carries the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Dialect name.
    pub name: String,
    /// Optional target version the dialect is pinned to.
    pub version: Option<String>,
}

impl Dialect {
    /// Create a dialect descriptor with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Dialect {
            name: name.into(),
            version: None,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::new("core")
    }
}

/// An opaque parsed code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Span covering the block including both braces.
    pub span: Span,
    /// Raw text between the braces, uninterpreted.
    pub body: String,
    /// Source-name remapping in effect for this block, decoded from a
    /// `@use-src` annotation, if one was present.
    pub source_names: Option<ReverseSourceNameMap>,
}

/// The seam to the inner-language parser.
///
/// Implementations report their own errors into the shared reporter. A
/// `Ok(None)` return means the block failed recoverably (errors already
/// recorded); `Err` propagates a fatal abort.
pub trait BlockParser {
    /// Parse one code block starting at the current `{`.
    fn parse_block(
        &mut self,
        stream: &mut TokenStream<'_>,
        reporter: &mut ErrorReporter,
        source_names: Option<ReverseSourceNameMap>,
    ) -> ParseResult<Option<Block>>;
}

/// Default block parser: balances braces and records the raw body.
#[derive(Debug, Default)]
pub struct RawBlockParser {
    dialect: Dialect,
}

impl RawBlockParser {
    /// Create a raw block parser for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The dialect this parser was constructed with.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }
}

impl BlockParser for RawBlockParser {
    fn parse_block(
        &mut self,
        stream: &mut TokenStream<'_>,
        reporter: &mut ErrorReporter,
        source_names: Option<ReverseSourceNameMap>,
    ) -> ParseResult<Option<Block>> {
        if stream.kind() != TokenKind::LBrace {
            return Err(reporter.fatal(
                ParseErrorKind::ExpectedToken {
                    expected: TokenKind::LBrace,
                    found: stream.kind(),
                },
                stream.span(),
            ));
        }
        let open = stream.span();
        stream.advance();

        let mut depth = 1usize;
        let close;
        loop {
            match stream.kind() {
                TokenKind::LBrace => {
                    depth += 1;
                    stream.advance();
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    let span = stream.span();
                    stream.advance();
                    if depth == 0 {
                        close = span;
                        break;
                    }
                }
                TokenKind::Eof => {
                    return Err(reporter.fatal(ParseErrorKind::UnclosedBlock, open));
                }
                TokenKind::Error => {
                    return Err(reporter.fatal(ParseErrorKind::InvalidToken, stream.span()));
                }
                _ => stream.advance(),
            }
        }

        let span = open.cover(close);
        let body = stream.source()[open.end as usize..close.start as usize].to_string();
        trace!(dialect = %self.dialect.name, ?span, "parsed raw code block");
        Ok(Some(Block {
            span,
            body,
            source_names,
        }))
    }
}
