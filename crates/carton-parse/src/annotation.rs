//! Decoder for `@use-src` source annotations.
//!
//! Code generators annotate emitted containers with comments of the form
//!
//! ```text
//! @use-src 0:"contract.sol" , 1:"lib.sol"
//! ```
//!
//! mapping numeric source indices to the original file names. The decoder
//! recovers that mapping from a comment's text. Annotations are
//! tool-generated metadata, not user syntax: malformed input is dropped
//! silently (`None`) rather than reported as a diagnostic. This is
//! deliberate policy, not an accident of implementation.
//!
//! The grammar is matched by a small dedicated cursor, independent of the
//! main token stream:
//!
//! ```text
//! Annotation := (start | whitespace) '@use-src' whitespace UseSrcList
//! UseSrcList := UseSrc (',' UseSrc)*
//! UseSrc     := Digits ':' '"' EscapedChars '"'
//! ```

use std::collections::BTreeMap;

/// Mapping from source index to file name, decoded from one annotation.
/// Keys need not be contiguous.
pub type ReverseSourceNameMap = BTreeMap<u32, String>;

/// Hard cap on pairs per annotation. Well-formed tools never come close;
/// exceeding it aborts decoding.
pub const MAX_SOURCE_INDICES: usize = 16;

/// The annotation marker.
const USE_SRC_MARKER: &str = "@use-src";

/// Decode the `@use-src` annotation in `text`, if any.
///
/// Returns `None` both when no annotation is present and when one is
/// present but malformed (including indices that do not fit `u32` and
/// more than [`MAX_SOURCE_INDICES`] pairs). Later pairs with the same index
/// overwrite earlier ones. File names keep their raw escaped text.
pub fn source_name_mapping(text: &str) -> Option<ReverseSourceNameMap> {
    let params = annotation_params(text)?;

    let mut result = ReverseSourceNameMap::new();
    let mut rest = params;
    let mut pairs = 0usize;
    // Trailing whitespace after the last pair is fine; anything else is not.
    while !rest.trim().is_empty() {
        let (consumed, index, file_name) = match_pair(rest, pairs > 0)?;
        pairs += 1;
        if pairs > MAX_SOURCE_INDICES {
            return None;
        }
        result.insert(index, file_name.to_owned());
        rest = &rest[consumed..];
    }
    Some(result)
}

/// Find the marker and return the parameter text following it: everything
/// after the marker's trailing whitespace, up to the end of that line.
fn annotation_params(text: &str) -> Option<&str> {
    let mut search = text;
    let mut base = 0usize;
    loop {
        let at = search.find(USE_SRC_MARKER)?;
        let start_ok = {
            let before = &text[..base + at];
            before.is_empty() || before.ends_with(char::is_whitespace)
        };
        let after = &search[at + USE_SRC_MARKER.len()..];
        if start_ok && after.starts_with(char::is_whitespace) {
            let params = after.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
            // The annotation's parameter list never spans lines.
            let params = params.split('\n').next().unwrap_or(params);
            return Some(params.strip_suffix('\r').unwrap_or(params));
        }
        // Marker embedded in a longer word; keep looking.
        base += at + USE_SRC_MARKER.len();
        search = &search[at + USE_SRC_MARKER.len()..];
    }
}

/// Match one `INDEX:"FILE"` pair at the front of `text`, with a mandatory
/// leading comma for every pair after the first. Returns the matched byte
/// length, the parsed index, and the raw file name.
fn match_pair(text: &str, require_comma: bool) -> Option<(usize, u32, &str)> {
    let mut cursor = Cursor::new(text);

    cursor.skip_whitespace();
    if require_comma {
        if !cursor.eat(',') {
            return None;
        }
        cursor.skip_whitespace();
    }

    let digits = cursor.take_while(|c| c.is_ascii_digit());
    if digits.is_empty() {
        return None;
    }
    // Rejects anything that does not fit u32, aborting the whole decode.
    let index: u32 = digits.parse().ok()?;

    cursor.skip_whitespace();
    if !cursor.eat(':') {
        return None;
    }
    cursor.skip_whitespace();
    if !cursor.eat('"') {
        return None;
    }

    let name_start = cursor.pos;
    loop {
        match cursor.peek() {
            None => return None,
            Some('"') => break,
            Some('\\') => {
                cursor.bump();
                // An escaped character (notably `\"`) stays part of the name.
                cursor.bump();
            }
            Some(_) => {
                cursor.bump();
            }
        }
    }
    let file_name = &text[name_start..cursor.pos];
    cursor.bump(); // closing quote

    Some((cursor.pos, index, file_name))
}

/// Byte-position cursor over the annotation text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() && c != '\n' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.bump();
            } else {
                break;
            }
        }
        &self.text[start..self.pos]
    }
}
