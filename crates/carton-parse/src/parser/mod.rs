//! Recursive-descent parser for the object container grammar.
//!
//! ```text
//! Container := Object | Block            (code-only shorthand)
//! Object    := 'object' STRING '{' Code ( Object | Data )* '}'
//! Code      := 'code' Block
//! Data      := 'data' STRING ( HEX_STRING | STRING )
//! ```
//!
//! Keyword and token-shape mismatches are fatal and abort the parse;
//! naming violations are recorded and parsing continues, so callers may
//! receive a best-effort tree together with recorded errors.

use carton_tokenizer::{Span, TokenKind};
use tracing::trace;

use crate::annotation::source_name_mapping;
use crate::block::{Block, BlockParser, Dialect, RawBlockParser};
use crate::error::{ErrorReporter, ParseErrorKind, ParseResult};
use crate::object::{Data, Object, ObjectNode};
use crate::stream::TokenStream;

#[cfg(test)]
mod tests;

/// Default bound on object nesting depth.
pub const MAX_RECURSION_DEPTH: usize = 256;

/// Parser for a container of objects and data blobs.
pub struct ObjectParser<B = RawBlockParser> {
    reporter: ErrorReporter,
    block_parser: B,
    depth: usize,
    max_depth: usize,
}

impl ObjectParser<RawBlockParser> {
    /// Create a parser using the default raw block parser for the given
    /// dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_block_parser(RawBlockParser::new(dialect))
    }
}

impl<B: BlockParser> ObjectParser<B> {
    /// Create a parser delegating code blocks to a custom inner parser.
    pub fn with_block_parser(block_parser: B) -> Self {
        Self {
            reporter: ErrorReporter::new(),
            block_parser,
            depth: 0,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }

    /// Override the nesting-depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether any errors were recorded during the last parse.
    pub fn has_errors(&self) -> bool {
        self.reporter.has_errors()
    }

    /// The errors recorded during the last parse.
    pub fn errors(&self) -> &[crate::ParseError] {
        self.reporter.errors()
    }

    /// Consume the parser, yielding the recorded errors.
    pub fn into_errors(self) -> Vec<crate::ParseError> {
        self.reporter.into_errors()
    }

    /// Parse one container from the stream.
    ///
    /// With `reuse_stream` set the stream may hold trailing tokens for a
    /// later parse; otherwise it must be exhausted after the container.
    ///
    /// Returns `None` on failure; errors live in the reporter either way. A
    /// `Some` tree may still carry recorded recoverable errors and must not
    /// be trusted without checking [`has_errors`](Self::has_errors).
    pub fn parse(&mut self, stream: &mut TokenStream<'_>, reuse_stream: bool) -> Option<Object> {
        self.depth = 0;
        match self.parse_container(stream, reuse_stream) {
            Ok(object) => object,
            Err(_) => {
                // A fatal abort must always come with a recorded error.
                debug_assert!(
                    self.reporter.has_errors(),
                    "fatal abort without a recorded error"
                );
                None
            }
        }
    }

    fn parse_container(
        &mut self,
        stream: &mut TokenStream<'_>,
        reuse_stream: bool,
    ) -> ParseResult<Option<Object>> {
        let object = if stream.kind() == TokenKind::LBrace {
            // Code-only shorthand: the whole input is a single anonymous
            // object wrapping this block.
            trace!("parsing code-only container");
            let mut object = Object::named("object");
            match self.parse_block(stream)? {
                Some(block) => object.code = Some(block),
                None => return Ok(None),
            }
            object
        } else {
            self.parse_object(stream, None)?
        };

        if !reuse_stream {
            stream.expect(TokenKind::Eof, &mut self.reporter)?;
        }
        Ok(Some(object))
    }

    fn parse_object(
        &mut self,
        stream: &mut TokenStream<'_>,
        containing: Option<&Object>,
    ) -> ParseResult<Object> {
        let span = stream.span();
        self.with_recursion_guard(span, |parser| {
            if !stream.is_keyword("object") {
                return Err(parser
                    .reporter
                    .fatal(ParseErrorKind::ExpectedKeyword("object"), stream.span()));
            }
            stream.advance();

            let name = parser.parse_unique_name(stream, containing)?;
            trace!(name = %name, "parsing object");
            let mut object = Object::named(name);

            stream.expect(TokenKind::LBrace, &mut parser.reporter)?;

            object.code = parser.parse_code(stream)?;

            while stream.kind() != TokenKind::RBrace {
                if stream.is_keyword("object") {
                    let child = parser.parse_object(stream, Some(&object))?;
                    object.add_named_sub_object(ObjectNode::Object(child));
                } else if stream.is_keyword("data") {
                    parser.parse_data(stream, &mut object)?;
                } else {
                    // No sensible resynchronization point exists here.
                    return Err(parser
                        .reporter
                        .fatal(ParseErrorKind::ExpectedDataOrObject, stream.span()));
                }
            }

            stream.expect(TokenKind::RBrace, &mut parser.reporter)?;

            Ok(object)
        })
    }

    fn parse_code(&mut self, stream: &mut TokenStream<'_>) -> ParseResult<Option<Block>> {
        if !stream.is_keyword("code") {
            return Err(self
                .reporter
                .fatal(ParseErrorKind::ExpectedKeyword("code"), stream.span()));
        }
        stream.advance();
        self.parse_block(stream)
    }

    fn parse_block(&mut self, stream: &mut TokenStream<'_>) -> ParseResult<Option<Block>> {
        // A @use-src annotation in the comment attached to the block's
        // opening position remaps source indices for this block.
        let source_names = source_name_mapping(stream.comment_literal());
        let block = self
            .block_parser
            .parse_block(stream, &mut self.reporter, source_names)?;
        debug_assert!(
            block.is_some() || self.reporter.has_errors(),
            "no block but no error"
        );
        Ok(block)
    }

    fn parse_data(
        &mut self,
        stream: &mut TokenStream<'_>,
        containing: &mut Object,
    ) -> ParseResult<()> {
        debug_assert!(stream.is_keyword("data"), "parse_data called on wrong input");
        stream.advance();

        let name = self.parse_unique_name(stream, Some(containing))?;

        match stream.kind() {
            TokenKind::HexStringLiteral | TokenKind::StringLiteral => {
                let content = stream.literal_bytes();
                stream.advance();
                trace!(name = %name, len = content.len(), "parsed data blob");
                containing.add_named_sub_object(ObjectNode::Data(Data { name, content }));
                Ok(())
            }
            found => Err(self.reporter.fatal(
                ParseErrorKind::ExpectedToken {
                    expected: TokenKind::StringLiteral,
                    found,
                },
                stream.span(),
            )),
        }
    }

    /// Parse a name literal and validate it against the containing object.
    ///
    /// Violations are recoverable: they are recorded, the token is consumed
    /// regardless, and the name is returned as written so later stages still
    /// see a best-effort tree.
    fn parse_unique_name(
        &mut self,
        stream: &mut TokenStream<'_>,
        containing: Option<&Object>,
    ) -> ParseResult<String> {
        if stream.kind() != TokenKind::StringLiteral {
            return Err(self.reporter.fatal(
                ParseErrorKind::ExpectedToken {
                    expected: TokenKind::StringLiteral,
                    found: stream.kind(),
                },
                stream.span(),
            ));
        }

        let name = stream.literal().into_owned();
        let span = stream.span();
        if name.is_empty() {
            self.reporter.report(ParseErrorKind::EmptyName, span);
        } else if let Some(container) = containing {
            if container.name == name {
                self.reporter
                    .report(ParseErrorKind::NameCollisionWithContainer(name.clone()), span);
            } else if container.sub_index_by_name.contains_key(&name) {
                self.reporter
                    .report(ParseErrorKind::DuplicateName(name.clone()), span);
            }
        }
        stream.advance();
        Ok(name)
    }

    /// Track nesting depth around a recursive parse, releasing the count on
    /// every exit path.
    fn with_recursion_guard<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(self
                .reporter
                .fatal(ParseErrorKind::RecursionLimitExceeded, span));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
