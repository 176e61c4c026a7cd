//! Untyped value tree of a positional (JSPB-style) payload.
//!
//! Every node is a string, an integer, a null, or an ordered sequence of
//! nodes. There is no map node: meaning is carried by position alone.

/// The value node and its kinds.
pub mod value;

/// Position paths from the root of a value tree.
pub mod path;

mod jspb_macro;

pub use path::NodePath;
pub use value::{Sequence, Value, ValueKind};
