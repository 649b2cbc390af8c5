//! The recursive-descent decoder.
//!
//! The decoder owns nothing but a cursor into the input and the current nesting depth. Every
//! production starts with the cursor on its first byte and leaves it on the first byte after
//! what it consumed. The grammar is LL(1): one byte of lookahead picks the production.

use tracing::instrument;

use crate::error::{DecodeError, RangeError, SyntaxError, SyntaxErrorKind};
use crate::span::Span;
use crate::value::{Node, Value};

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Knobs for [`parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How many arrays/objects may be nested inside each other. `None` means unlimited, in which
    /// case deep enough input will overflow the stack.
    pub max_depth: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Decode exactly one JSON value, optionally surrounded by whitespace.
pub fn parse(input: impl AsRef<[u8]>) -> Result<Value, DecodeError> {
    parse_with(input, &DecodeOptions::default())
}

/// Like [`parse`], with the nesting limit taken from `options`.
pub fn parse_with(input: impl AsRef<[u8]>, options: &DecodeOptions) -> Result<Value, DecodeError> {
    decode(input.as_ref(), options)
}

#[instrument(level = "trace", skip_all, fields(len = input.len(), max_depth = ?options.max_depth))]
fn decode(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder {
        input,
        offset: 0,
        depth: 0,
        max_depth: options.max_depth,
    };
    decoder.skip_whitespace();
    let value = decoder.parse_value()?;
    decoder.skip_whitespace();
    if decoder.peek().is_some() {
        return Err(decoder.error(SyntaxErrorKind::UnexpectedTrailingInput));
    }
    Ok(value)
}

struct Decoder<'a> {
    input: &'a [u8],
    offset: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl Decoder<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    fn bump(&mut self) {
        self.offset += 1;
    }

    /// Consume the current byte if it is `expected`.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.bump();
        }
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.bump();
        }
    }

    /// A syntax error pointing at the byte under the cursor.
    fn error(&self, kind: SyntaxErrorKind) -> DecodeError {
        SyntaxError::new(kind, self.offset, self.peek()).into()
    }

    fn span_from(&self, lo: usize) -> Span {
        Span::new(lo, self.offset)
    }

    fn parse_value(&mut self) -> Result<Value, DecodeError> {
        match self.peek() {
            Some(b'n') => self.parse_literal("null", Node::Null),
            Some(b't') => self.parse_literal("true", Node::True),
            Some(b'f') => self.parse_literal("false", Node::False),
            Some(b'"') => self.parse_string(),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_object),
            _ => self.parse_number(),
        }
    }

    /// Run a container production one nesting level deeper.
    fn nested(
        &mut self,
        production: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return Err(DecodeError::NestingTooDeep {
                    offset: self.offset,
                    limit,
                });
            }
        }
        self.depth += 1;
        let value = production(self);
        self.depth -= 1;
        value
    }

    fn parse_literal(&mut self, literal: &'static str, node: Node) -> Result<Value, DecodeError> {
        let lo = self.offset;
        for &expected in literal.as_bytes() {
            if !self.eat(expected) {
                return Err(self.error(SyntaxErrorKind::Literal { expected: literal }));
            }
        }
        Ok(Value::new(self.span_from(lo), node))
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let lo = self.offset;
        self.eat(b'-');

        match self.peek() {
            // A leading zero stands alone; whatever follows is left for the caller to judge.
            Some(b'0') => self.bump(),
            Some(b'1'..=b'9') => {
                self.bump();
                self.skip_digits();
            }
            _ => return Err(self.error(SyntaxErrorKind::NumberSyntax)),
        }

        if self.eat(b'.') {
            self.expect_digit()?;
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.bump();
            if let Some(b'+' | b'-') = self.peek() {
                self.bump();
            }
            self.expect_digit()?;
            self.skip_digits();
        }

        let span = self.span_from(lo);
        // Only ASCII has been consumed, so this never actually replaces anything.
        let literal = String::from_utf8_lossy(&self.input[span.into_range()]);
        let n = match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                return Err(RangeError {
                    span,
                    literal: literal.into_owned(),
                    target: "f64",
                }
                .into())
            }
        };
        Ok(Value::new(span, Node::Number(n)))
    }

    fn expect_digit(&mut self) -> Result<(), DecodeError> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error(SyntaxErrorKind::NumberSyntax)),
        }
    }

    fn parse_string(&mut self) -> Result<Value, DecodeError> {
        let lo = self.offset;
        if !self.eat(b'"') {
            return Err(self.error(SyntaxErrorKind::MissQuotationMark));
        }

        let mut buf = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error(SyntaxErrorKind::MissQuotationMark)),
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.bump();
                    self.parse_escape(&mut buf)?;
                }
                Some(c) if c < 0x20 => {
                    return Err(self.error(SyntaxErrorKind::InvalidStringChar));
                }
                Some(c) => {
                    buf.push(c);
                    self.bump();
                }
            }
        }

        Ok(Value::new(self.span_from(lo), Node::String(buf)))
    }

    /// Decode one escape sequence; the cursor is on the byte after the backslash.
    fn parse_escape(&mut self, buf: &mut Vec<u8>) -> Result<(), DecodeError> {
        let unescaped = match self.peek() {
            Some(b'"') => b'"',
            Some(b'\\') => b'\\',
            Some(b'/') => b'/',
            Some(b'b') => b'\x08',
            Some(b'f') => b'\x0c',
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'u') => {
                self.bump();
                let c = self.parse_unicode_escape()?;
                let mut utf8 = [0; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                return Ok(());
            }
            _ => return Err(self.error(SyntaxErrorKind::InvalidStringEscape)),
        };
        buf.push(unescaped);
        self.bump();
        Ok(())
    }

    /// Decode the code unit(s) of a `\u` escape into one scalar value. The cursor is on the first
    /// hex digit. A high surrogate must be followed by a `\u` low surrogate; a surrogate on its
    /// own is never accepted.
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.eat(b'\\') || !self.eat(b'u') {
                    return Err(self.error(SyntaxErrorKind::InvalidUnicodeSurrogate));
                }
                let low_offset = self.offset;
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::InvalidUnicodeSurrogate,
                        low_offset,
                        self.input.get(low_offset).copied(),
                    )
                    .into());
                }
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidUnicodeSurrogate,
                    self.offset - 4,
                    self.input.get(self.offset - 4).copied(),
                )
                .into());
            }
            _ => u32::from(high),
        };
        char::from_u32(code).ok_or_else(|| self.error(SyntaxErrorKind::InvalidUnicodeSurrogate))
    }

    fn parse_hex4(&mut self) -> Result<u16, DecodeError> {
        let mut unit = 0u16;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(c @ b'0'..=b'9') => c - b'0',
                Some(c @ b'a'..=b'f') => c - b'a' + 10,
                Some(c @ b'A'..=b'F') => c - b'A' + 10,
                _ => return Err(self.error(SyntaxErrorKind::InvalidUnicodeHex)),
            };
            unit = (unit << 4) | u16::from(digit);
            self.bump();
        }
        Ok(unit)
    }

    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        let lo = self.offset;
        self.bump();
        self.skip_whitespace();

        let mut values = Vec::new();
        if self.eat(b']') {
            return Ok(Value::new(self.span_from(lo), Node::Array(values)));
        }

        loop {
            self.skip_whitespace();
            values.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.bump(),
                Some(b']') => {
                    self.bump();
                    return Ok(Value::new(self.span_from(lo), Node::Array(values)));
                }
                _ => return Err(self.error(SyntaxErrorKind::MissCommaOrSquareBracket)),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        let lo = self.offset;
        self.bump();
        self.skip_whitespace();

        let mut members = Vec::new();
        if self.eat(b'}') {
            return Ok(Value::new(self.span_from(lo), Node::Object(members)));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error(SyntaxErrorKind::MissKey));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if !self.eat(b':') {
                return Err(self.error(SyntaxErrorKind::MissColon));
            }

            self.skip_whitespace();
            let value = self.parse_value()?;
            members.push((key, value));

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.bump(),
                Some(b'}') => {
                    self.bump();
                    return Ok(Value::new(self.span_from(lo), Node::Object(members)));
                }
                _ => return Err(self.error(SyntaxErrorKind::MissCommaOrCurlyBracket)),
            }
        }
    }
}
