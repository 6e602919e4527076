//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use carton_tokenizer::TokenKind;

use crate::error::{ParseError, ParseErrorKind};

impl ParseError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range = self.span.start as usize..self.span.end as usize;

        match &self.kind {
            ParseErrorKind::ExpectedKeyword(keyword) => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("expected '{}'", keyword))
                    .with_label(
                        Label::new((filename, range))
                            .with_message(format!("expected the '{}' keyword here", keyword))
                            .with_color(Color::Red),
                    )
            }

            ParseErrorKind::ExpectedToken { expected, found } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!(
                        "expected {}, found {}",
                        describe(*expected),
                        describe(*found)
                    ))
                    .with_label(
                        Label::new((filename, range))
                            .with_message(format!("expected {} here", describe(*expected)))
                            .with_color(Color::Red),
                    )
            }

            ParseErrorKind::ExpectedDataOrObject => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("expected 'object', 'data', or '}'")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("unexpected here")
                            .with_color(Color::Red),
                    )
                    .with_help("an object body holds one code block followed by nested objects and data entries")
            }

            ParseErrorKind::InvalidToken => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("invalid token")
                .with_label(
                    Label::new((filename, range))
                        .with_message("cannot be tokenized")
                        .with_color(Color::Red),
                )
                .with_help("check for unterminated strings or comments and malformed hex literals"),

            ParseErrorKind::UnclosedBlock => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unclosed code block")
                .with_label(
                    Label::new((filename, range))
                        .with_message("block opened here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing '}'"),

            ParseErrorKind::RecursionLimitExceeded => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("objects nested too deeply")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("nesting limit reached here")
                            .with_color(Color::Red),
                    )
            }

            ParseErrorKind::EmptyName => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("empty name")
                .with_label(
                    Label::new((filename, range))
                        .with_message("name must not be empty")
                        .with_color(Color::Red),
                ),

            ParseErrorKind::NameCollisionWithContainer(name) => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("'{}' shadows the containing object", name))
                    .with_label(
                        Label::new((filename, range))
                            .with_message("named like its container")
                            .with_color(Color::Red),
                    )
                    .with_help("a child must not share its containing object's name")
            }

            ParseErrorKind::DuplicateName(name) => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("duplicate name '{}'", name))
                    .with_label(
                        Label::new((filename, range))
                            .with_message("already used by a sibling")
                            .with_color(Color::Red),
                    )
                    .with_help("each name must be unique among the direct children of an object")
            }
        }
    }
}

/// A short phrase for a token kind, for use in messages.
fn describe(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::LBrace => "'{'",
        TokenKind::RBrace => "'}'",
        TokenKind::Identifier => "an identifier",
        TokenKind::StringLiteral => "a string literal",
        TokenKind::HexStringLiteral => "a hex string literal",
        TokenKind::Punct => "punctuation",
        TokenKind::LineComment | TokenKind::BlockComment => "a comment",
        TokenKind::Whitespace | TokenKind::Newline => "whitespace",
        TokenKind::Eof => "end of input",
        TokenKind::Error => "an invalid token",
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::ExpectedKeyword(keyword) => write!(f, "expected '{}'", keyword),
            ParseErrorKind::ExpectedToken { expected, found } => write!(
                f,
                "expected {}, found {}",
                describe(*expected),
                describe(*found)
            ),
            ParseErrorKind::ExpectedDataOrObject => {
                write!(f, "expected 'object', 'data', or '}}'")
            }
            ParseErrorKind::InvalidToken => write!(f, "invalid token"),
            ParseErrorKind::UnclosedBlock => write!(f, "unclosed code block"),
            ParseErrorKind::RecursionLimitExceeded => write!(f, "objects nested too deeply"),
            ParseErrorKind::EmptyName => write!(f, "empty name"),
            ParseErrorKind::NameCollisionWithContainer(name) => {
                write!(f, "'{}' shadows the containing object", name)
            }
            ParseErrorKind::DuplicateName(name) => write!(f, "duplicate name '{}'", name),
        }?;
        write!(f, " at offset {}", self.span.start)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn rendered(source: &str) -> String {
        let (_, errors) = parse(source);
        assert!(!errors.is_empty(), "expected at least one error");
        let raw = errors[0].render("test.obj", source);
        String::from_utf8(strip_ansi_escapes::strip(raw)).unwrap()
    }

    #[test]
    fn test_duplicate_name_diagnostic() {
        let source = "object \"r\" {\n  code { }\n  data \"a\" hex\"00\"\n  data \"a\" hex\"01\"\n}";
        let output = rendered(source);
        assert!(output.contains("duplicate name 'a'"), "{output}");
        assert!(output.contains("test.obj"), "{output}");
        assert!(output.contains("already used by a sibling"), "{output}");
    }

    #[test]
    fn test_missing_keyword_diagnostic() {
        let source = "object \"r\" {\n  data \"a\" hex\"00\"\n}";
        let output = rendered(source);
        assert!(output.contains("expected 'code'"), "{output}");
    }

    #[test]
    fn test_expected_token_diagnostic() {
        let source = "object name { code { } }";
        let output = rendered(source);
        assert!(
            output.contains("expected a string literal, found an identifier"),
            "{output}"
        );
    }

    #[test]
    fn test_display_fallback() {
        let (_, errors) = parse("object \"\" { code { } }");
        assert_eq!(errors[0].to_string(), "empty name at offset 7");
    }
}
