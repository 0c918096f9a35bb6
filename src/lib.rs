//! Pure Rust TrueType table decoder
//!
//! Reads glyph ids, metrics, names and glyph outlines straight out of the big-endian bytes of an
//! sfnt font file. Nothing is copied or cached: every decoder borrows the caller's buffer and
//! bounds checks each read, so untrusted fonts fail with a [`DecodeError`] rather than a panic.
//!
//! [`FontRef`] locates the tables of a whole font file. The per-table decoders in [`tables`]
//! work on a single table's bytes and can be used on their own.

pub mod buffer;
pub mod endian;
mod error;
mod font;
pub mod sfnt;
pub mod table_tags;
pub mod tables;

mod common;
#[cfg(test)]
mod test_data;

pub use common::{Point, compute_checksum};
pub use error::DecodeError;
pub use font::FontRef;
pub use tables::glyf::{BBox, Glyph, GlyphOutliner, Outline, OutlineLimits};
