//! Turning decode failures into ariadne reports.

use std::ops::Range;

use ariadne::{Color, Fmt, Label, Report, ReportKind};
use puffjson::{DecodeError, Span, SyntaxErrorKind};

pub type DiagnosticReport<'a> = Report<'a, (&'a String, Range<usize>)>;
pub type Diagnostics<'a> = Vec<DiagnosticReport<'a>>;

/// The document being checked: raw bytes for the decoder, text for the reports.
pub struct Input {
    pub path: String,
    pub bytes: Vec<u8>,
    pub text: String,
    /// `char_offsets[i]` is the number of chars of `text` that come before byte `i` of `bytes`.
    /// One longer than `bytes`.
    char_offsets: Vec<usize>,
}

impl Input {
    pub fn new(path: String, bytes: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let char_offsets = char_offsets(&bytes);
        Input {
            path,
            bytes,
            text,
            char_offsets,
        }
    }

    /// ariadne counts in chars while the decoder counts in bytes.
    pub fn char_range(&self, span: Span) -> Range<usize> {
        let lo = self.char_offset(span.lo);
        let hi = self.char_offset(span.hi).max(lo);
        lo..hi
    }

    fn char_offset(&self, byte_offset: usize) -> usize {
        let total = self.char_offsets.len() - 1;
        self.char_offsets[byte_offset.min(total)]
    }
}

/// Map every byte to its char index in the lossy decoding of `bytes`. A byte in the middle of a
/// char maps to that char; each invalid sequence counts as the one U+FFFD it is replaced with.
fn char_offsets(bytes: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(bytes.len() + 1);
    let mut chars = 0;
    let mut rest = bytes;
    while !rest.is_empty() {
        let (valid_len, invalid_len) = match std::str::from_utf8(rest) {
            Ok(_) => (rest.len(), 0),
            Err(e) => (
                e.valid_up_to(),
                e.error_len().unwrap_or(rest.len() - e.valid_up_to()),
            ),
        };
        let valid = std::str::from_utf8(&rest[..valid_len]).unwrap_or_default();
        for c in valid.chars() {
            offsets.extend(std::iter::repeat(chars).take(c.len_utf8()));
            chars += 1;
        }
        if invalid_len > 0 {
            offsets.extend(std::iter::repeat(chars).take(invalid_len));
            chars += 1;
        }
        rest = &rest[valid_len + invalid_len..];
    }
    offsets.push(chars);
    offsets
}

pub fn decode_error<'a>(input: &'a Input, err: &DecodeError) -> DiagnosticReport<'a> {
    let path = &input.path;
    let range = input.char_range(err.span());

    let label = match err {
        DecodeError::Syntax(e) if e.found.is_none() => "input ends here".to_string(),
        DecodeError::Syntax(e) => e.kind.to_string(),
        DecodeError::Range(e) => format!("does not fit in {}", e.target.fg(Color::Blue)),
        DecodeError::NestingTooDeep { limit, .. } => {
            format!("container number {} opened here", limit + 1)
        }
    };

    let mut report = DiagnosticReport::build(ReportKind::Error, path, range.start)
        .with_message(err.to_string())
        .with_label(
            Label::new((path, range))
                .with_message(label)
                .with_color(Color::Red),
        );

    match err {
        DecodeError::Syntax(e) if e.kind == SyntaxErrorKind::UnexpectedTrailingInput => {
            report.set_help("a JSON document holds exactly one value");
        }
        DecodeError::NestingTooDeep { .. } => {
            report.set_help(format!(
                "raise {} in the config file or pass {}",
                "max_depth".fg(Color::Blue),
                "--max-depth".fg(Color::Blue)
            ));
        }
        _ => {}
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_range_counts_multibyte_chars_once() {
        let input = Input::new("t.json".to_string(), "[\"é\", x]".as_bytes().to_vec());
        // `x` is byte 7 but char 6.
        assert_eq!(input.char_range(Span::new(7, 8)), 6..7);
    }

    #[test]
    fn char_range_counts_invalid_sequences_as_one_replacement() {
        // A truncated three-byte sequence becomes a single U+FFFD.
        let input = Input::new("t.json".to_string(), b"[\"\xe9\xa9\", x]".to_vec());
        assert_eq!(input.text.chars().count(), 8);
        assert_eq!(input.char_range(Span::new(7, 8)), 6..7);
        assert_eq!(input.char_range(Span::new(1, 5)), 1..4);
    }

    #[test]
    fn char_offsets_agree_with_lossy_text() {
        let bytes = "a\u{e9}\u{1f600}b".as_bytes();
        let offsets = char_offsets(bytes);
        assert_eq!(offsets, [0, 1, 1, 2, 2, 2, 2, 3, 4]);
    }

    #[test]
    fn char_range_is_clamped_to_the_text() {
        let input = Input::new("t.json".to_string(), b"[1,".to_vec());
        assert_eq!(input.char_range(Span::new(3, 3)), 3..3);
        assert_eq!(input.char_range(Span::new(3, 9)), 3..3);
    }
}
