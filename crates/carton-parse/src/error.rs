//! Error taxonomy and the error sink shared across the parse.

use carton_tokenizer::{Span, TokenKind};

/// Kinds of errors recorded while parsing an object container.
///
/// Fatal kinds abort the whole parse; recoverable kinds are recorded and
/// parsing continues on a best-effort basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A structural keyword (`object`, `code`) was missing.
    ExpectedKeyword(&'static str),
    /// A specific token was required and something else was found.
    ExpectedToken {
        /// The token kind the grammar requires here.
        expected: TokenKind,
        /// The token kind actually present.
        found: TokenKind,
    },
    /// Inside an object body only `object`, `data`, or `}` may follow.
    ExpectedDataOrObject,
    /// The tokenizer produced an error token (unterminated or malformed
    /// literal, unrecognized input).
    InvalidToken,
    /// A code block was never closed before end of input.
    UnclosedBlock,
    /// Objects nested deeper than the configured maximum.
    RecursionLimitExceeded,

    /// An object or data name literal was empty.
    EmptyName,
    /// A child was named the same as its containing object.
    NameCollisionWithContainer(String),
    /// Two direct siblings share a name.
    DuplicateName(String),
}

impl ParseErrorKind {
    /// Whether this error aborts the whole parse.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ParseErrorKind::EmptyName
                | ParseErrorKind::NameCollisionWithContainer(_)
                | ParseErrorKind::DuplicateName(_)
        )
    }
}

/// A recorded parse error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Control-transfer signal for fatal errors.
///
/// Carries no payload: the error itself is already in the [`ErrorReporter`]
/// by the time a `Fatal` is returned. Propagated with `?` up the call chain
/// and downgraded to a `None` tree only at the top-level parse entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatal;

/// Result type used throughout the parser.
pub type ParseResult<T> = Result<T, Fatal>;

/// Accumulates parse errors for the duration of one parse.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<ParseError>,
}

impl ErrorReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable error; parsing continues.
    pub fn report(&mut self, kind: ParseErrorKind, span: Span) {
        debug_assert!(!kind.is_fatal(), "fatal kind reported as recoverable");
        self.errors.push(ParseError::new(kind, span));
    }

    /// Record a fatal error and return the control-transfer marker.
    ///
    /// Always used as `return Err(reporter.fatal(..))` (or behind `?`), so a
    /// fatal abort is always accompanied by at least one recorded error.
    #[must_use]
    pub fn fatal(&mut self, kind: ParseErrorKind, span: Span) -> Fatal {
        debug_assert!(kind.is_fatal(), "recoverable kind raised as fatal");
        self.errors.push(ParseError::new(kind, span));
        Fatal
    }

    /// Whether any errors have been recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors recorded so far, in report order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume the reporter, yielding the recorded errors.
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}
