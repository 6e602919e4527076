//! Parser for the Carton object container format.
//!
//! A Carton artifact is a tree of named objects. Each object holds one
//! executable code block and any number of nested sub-objects and raw data
//! blobs:
//!
//! ```text
//! object "MyUnit" {
//!     code { ... }
//!     object "MyUnit_deployed" {
//!         code { ... }
//!     }
//!     data "table" hex"00010203"
//! }
//! ```
//!
//! Comments directly before a code block may carry a `@use-src` annotation
//! mapping numeric source indices back to file names; the decoded mapping is
//! attached to the parsed block so later stages can produce accurate debug
//! maps.
//!
//! Parsing is error-tolerant: naming violations are recorded in the
//! [`ErrorReporter`] and parsing continues, while structural mismatches and
//! recursion-depth overflow abort the parse. A returned tree may still carry
//! recorded errors; callers must check the reporter before trusting it.

pub use carton_tokenizer::{Span, Token, TokenKind, Tokenizer};

mod error;
pub use error::{ErrorReporter, Fatal, ParseError, ParseErrorKind, ParseResult};

mod object;
pub use object::{Data, Object, ObjectNode};

mod stream;
pub use stream::TokenStream;

mod annotation;
pub use annotation::{MAX_SOURCE_INDICES, ReverseSourceNameMap, source_name_mapping};

mod block;
pub use block::{Block, BlockParser, Dialect, RawBlockParser};

mod parser;
pub use parser::{MAX_RECURSION_DEPTH, ObjectParser};

mod diagnostic;

/// Parse a Carton source string into an object tree.
///
/// Convenience wrapper wiring together the tokenizer, the default
/// [`RawBlockParser`], and a fresh [`ErrorReporter`]. Returns the tree (if
/// the parse survived) together with every error recorded along the way.
pub fn parse(source: &str) -> (Option<Object>, Vec<ParseError>) {
    let mut stream = TokenStream::new(source);
    let mut parser = ObjectParser::new(Dialect::default());
    let object = parser.parse(&mut stream, false);
    (object, parser.into_errors())
}
