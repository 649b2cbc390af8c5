//! Error types produced while decoding and while reading a decoded tree.
//!
//! Three failure families are kept apart so callers can tell "malformed" from "out of range"
//! from "asked the wrong question":
//!
//! - [`SyntaxError`]: the input does not follow the JSON grammar.
//! - [`RangeError`]: a number literal is well formed but does not fit in an `f64`.
//! - [`ValueAccessError`]: an accessor on [`Value`](crate::Value) was called for the wrong
//!   shape or with an index past the end, or a string was read as text when it isn't UTF-8.
//!
//! [`DecodeError`] is what [`parse`](crate::parse) returns and wraps the first two, plus the
//! nesting limit.

use std::fmt;

use crate::span::Span;
use crate::value::ValueKind;

/// Everything that can make a decode call fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Range(#[from] RangeError),

    /// The input nests arrays/objects deeper than the configured limit.
    #[error("nesting too deep: more than {limit} nested containers at byte {offset}")]
    NestingTooDeep { offset: usize, limit: usize },
}

impl DecodeError {
    /// Byte offset into the input the error points at.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Syntax(e) => e.offset,
            DecodeError::Range(e) => e.span.lo,
            DecodeError::NestingTooDeep { offset, .. } => *offset,
        }
    }

    /// Region of the input the error covers. Syntax errors cover the single offending byte (or
    /// nothing at end of input).
    pub fn span(&self) -> Span {
        match self {
            DecodeError::Syntax(e) => {
                let width = usize::from(e.found.is_some());
                Span::new(e.offset, e.offset + width)
            }
            DecodeError::Range(e) => e.span,
            DecodeError::NestingTooDeep { offset, .. } => Span::new(*offset, *offset + 1),
        }
    }
}

/// The grammar point at which a [`SyntaxError`] was raised. Its `Display` is the context text
/// that appears in the error message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// A `null`/`true`/`false` literal diverged from its expected spelling.
    Literal { expected: &'static str },
    NumberSyntax,
    InvalidStringChar,
    InvalidStringEscape,
    InvalidUnicodeHex,
    InvalidUnicodeSurrogate,
    MissQuotationMark,
    MissCommaOrSquareBracket,
    MissKey,
    MissColon,
    MissCommaOrCurlyBracket,
    /// Something other than whitespace follows the single top-level value.
    UnexpectedTrailingInput,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = match self {
            SyntaxErrorKind::Literal { expected } => {
                return write!(f, "expected literal {expected}");
            }
            SyntaxErrorKind::NumberSyntax => "number syntax invalid",
            SyntaxErrorKind::InvalidStringChar => "invalid string char",
            SyntaxErrorKind::InvalidStringEscape => "invalid_string_escape",
            SyntaxErrorKind::InvalidUnicodeHex => "invalid_string_unicode_hex",
            SyntaxErrorKind::InvalidUnicodeSurrogate => "invalid_unicode_surrogate",
            SyntaxErrorKind::MissQuotationMark => "miss quotation mark",
            SyntaxErrorKind::MissCommaOrSquareBracket => "MISS_COMMA_OR_SQUARE_BRACKET",
            SyntaxErrorKind::MissKey => "miss key",
            SyntaxErrorKind::MissColon => "miss colon",
            SyntaxErrorKind::MissCommaOrCurlyBracket => "miss comma or curly bracket",
            SyntaxErrorKind::UnexpectedTrailingInput => "unexpected end of JSON input",
        };
        f.write_str(context)
    }
}

/// A grammar violation at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Where the offending byte is (or the input length, at end of input).
    pub offset: usize,
    /// The offending byte, `None` at end of input.
    pub found: Option<u8>,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, offset: usize, found: Option<u8>) -> Self {
        SyntaxError {
            offset,
            found,
            kind,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == SyntaxErrorKind::UnexpectedTrailingInput {
            return write!(f, "{}", self.kind);
        }
        write!(f, "invalid character {} {}", FoundByte(self.found), self.kind)
    }
}

impl std::error::Error for SyntaxError {}

/// Renders an offending byte: printable ASCII as itself, everything else escaped, `EOF` for the
/// end of input.
struct FoundByte(Option<u8>);

impl fmt::Display for FoundByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("EOF"),
            Some(b) if b.is_ascii_graphic() => write!(f, "{}", b as char),
            Some(b) => write!(f, "{}", b.escape_ascii()),
        }
    }
}

/// A number literal that follows the grammar but whose magnitude cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot decode number out of range {literal} into {target}")]
pub struct RangeError {
    pub span: Span,
    /// The literal exactly as it appeared in the input.
    pub literal: String,
    /// Description of the numeric type the literal was converted to.
    pub target: &'static str,
}

/// Misuse of a [`Value`](crate::Value) accessor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueAccessError {
    #[error("value type isn't {expected} (found {found})")]
    TypeMismatch {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{container} out of range: index {index} but length is {len}")]
    IndexOutOfRange {
        container: &'static str,
        index: usize,
        len: usize,
    },

    /// The string holds raw bytes that are not UTF-8; only the text view fails.
    #[error("string value isn't valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Some(b'x'), SyntaxErrorKind::MissColon, "invalid character x miss colon"; "miss colon")]
    #[test_case(None, SyntaxErrorKind::MissQuotationMark, "invalid character EOF miss quotation mark"; "eof")]
    #[test_case(Some(0x01), SyntaxErrorKind::InvalidStringChar, "invalid character \\x01 invalid string char"; "control byte")]
    #[test_case(Some(b'a'), SyntaxErrorKind::Literal { expected: "null" }, "invalid character a expected literal null"; "literal")]
    #[test_case(Some(b'x'), SyntaxErrorKind::UnexpectedTrailingInput, "unexpected end of JSON input"; "trailing input")]
    fn syntax_error_messages(found: Option<u8>, kind: SyntaxErrorKind, expected: &str) {
        assert_eq!(SyntaxError::new(kind, 0, found).to_string(), expected);
    }

    #[test]
    fn range_error_message_names_literal_and_target() {
        let err = RangeError {
            span: Span::new(0, 5),
            literal: "1e309".to_string(),
            target: "f64",
        };
        assert_eq!(
            err.to_string(),
            "cannot decode number out of range 1e309 into f64"
        );
    }

    #[test]
    fn decode_error_span_covers_offending_byte() {
        let err = DecodeError::from(SyntaxError::new(SyntaxErrorKind::MissColon, 4, Some(b',')));
        assert_eq!(err.offset(), 4);
        assert_eq!(err.span(), Span::new(4, 5));

        let eof = DecodeError::from(SyntaxError::new(SyntaxErrorKind::MissQuotationMark, 4, None));
        assert!(eof.span().is_empty());
    }
}
