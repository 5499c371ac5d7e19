//! The textual wire document and its encoder.
//!
//! One document is produced per tick: a keyed object rendered in a fixed
//! field order, terminated by a CR/LF frame delimiter. See
//! [`encode_snapshot`] for the exact layout.

mod encode;
mod value;

pub use encode::{encode_snapshot, encode_snapshot_at};
pub use value::Value;
