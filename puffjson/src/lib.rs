//! A small JSON decoder. The intention is to hand-roll a recursive-descent parser that turns a
//! byte buffer into a tree of [`Value`]s while rejecting everything the JSON grammar does not
//! allow, with an error that says which byte was wrong and why.
//!
//! We deviate from typical (de-)serialization libraries in that we do not bind into user types
//! and never re-encode: the output is the tree itself, with typed accessors that fail instead of
//! coercing. Every node remembers the span of input it came from, so downstream users can report
//! problems against the source.
//!
//! ```
//! let value = puffjson::parse(r#"{"name": "puff", "sizes": [1, 2.5]}"#).unwrap();
//! assert_eq!(value.object_len().unwrap(), 2);
//! assert_eq!(value.object_value(0).unwrap().as_string().unwrap(), "puff");
//! assert_eq!(value.object_value(1).unwrap().array_get(1).unwrap().as_number().unwrap(), 2.5);
//! ```
//!
//! Object keys are neither deduplicated nor indexed; members stay in input order and may repeat.
//! Comments, trailing commas and other JSON5 extensions are rejected.

mod decode;
mod error;
mod span;
mod value;

pub use decode::{parse, parse_with, DecodeOptions, DEFAULT_MAX_DEPTH};
pub use error::{DecodeError, RangeError, SyntaxError, SyntaxErrorKind, ValueAccessError};
pub use span::Span;
pub use value::{Value, ValueKind};
