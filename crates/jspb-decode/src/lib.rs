//! Schema-driven structural decoder for positional payloads.
//!
//! A record type declares a [`Pattern`] describing the shape of the value tree
//! it is decoded from. Decoding walks the pattern against the tree, collects
//! the matched leaves and nested records in depth-first order, and hands them
//! to the record's constructor positionally.
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use jspb_decode::{Decodable, DecodeErrorKind, Fields, Pattern, decode, integer, rest, shape};
//! use jspb_value::jspb;
//!
//! #[derive(Debug, PartialEq)]
//! struct Pair(i64);
//!
//! impl Decodable for Pair {
//!     const NAME: &'static str = "Pair";
//!
//!     fn pattern() -> &'static Pattern {
//!         static PATTERN: LazyLock<Pattern> = LazyLock::new(|| shape![integer(), rest()]);
//!         &PATTERN
//!     }
//!
//!     fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
//!         Ok(Pair(fields.integer()?))
//!     }
//! }
//!
//! let pair: Pair = decode(&jspb!(["7", "ignored"])).unwrap();
//! assert_eq!(pair, Pair(7));
//! ```

mod error;
mod matcher;
mod options;
mod pattern;
mod record;

pub use error::{DecodeError, DecodeErrorKind, ExpectedKind};
pub use matcher::match_pattern;
pub use options::{DecodeOptions, IntegerLeafRepr, RepeatedTarget};
pub use pattern::{
    LeafKind, Pattern, RecordRef, ShapeField, alternation, ignore, integer, literal, null, record,
    repeated, rest, skip, string,
};
pub use record::{Decodable, Extracted, ExtractedRecord, Fields, decode, decode_with};
