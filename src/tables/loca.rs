//! The [loca](https://learn.microsoft.com/en-us/typography/opentype/spec/loca) table

use std::ops::Range;

use crate::buffer::TableData;
use crate::error::{DecodeError, bail_if, bail_with_msg_if};
use crate::tables::head::Head;

/// Number of glyphs a loca table of `loca_len` bytes describes.
///
/// Meant as a cross-check against `maxp.numGlyphs`.
pub fn loca_num_glyphs(loca_len: usize, head: &Head) -> usize {
    let entry_size = if head.long_loca() { 4 } else { 2 };
    (loca_len / entry_size).saturating_sub(1)
}

/// Offset into `glyf` of the record for `glyph_id`.
pub fn loca_lookup(glyph_id: u16, loca: &[u8], head: &Head) -> Result<u32, DecodeError> {
    Loca::new(loca, head).offset(glyph_id as usize)
}

/// Glyph index to `glyf` offset mapping
#[derive(Copy, Clone)]
pub struct Loca<'a> {
    data: TableData<'a>,
    long: bool,
}

impl<'a> Loca<'a> {
    pub fn new(data: &'a [u8], head: &Head) -> Self {
        Self {
            data: TableData::new(data),
            long: head.long_loca(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.long
    }

    fn num_entries(&self) -> usize {
        if self.long {
            self.data.len() / 4
        } else {
            self.data.len() / 2
        }
    }

    /// Number of glyphs the table covers (entries minus the trailing end offset)
    pub fn num_glyphs(&self) -> usize {
        self.num_entries().saturating_sub(1)
    }

    /// The `index`th entry as a byte offset.
    pub fn offset(&self, index: usize) -> Result<u32, DecodeError> {
        bail_if!(index >= self.num_entries(), DecodeError::InvalidGlyphId);
        if self.long {
            self.data.read_u32(index * 4)
        } else {
            // loca short version. The actual local offset divided by 2 is stored.
            Ok(self.data.read_u16(index * 2)? as u32 * 2)
        }
    }

    /// Byte range of the glyph's record within `glyf`. Empty for glyphs with no outline.
    pub fn glyph_range(&self, glyph_id: u16) -> Result<Range<usize>, DecodeError> {
        let glyph_id = glyph_id as usize;
        bail_if!(glyph_id >= self.num_glyphs(), DecodeError::InvalidGlyphId);
        let start = self.offset(glyph_id)? as usize;
        let end = self.offset(glyph_id + 1)? as usize;
        bail_with_msg_if!(
            end < start,
            DecodeError::Malformed,
            "loca is not monotonic at glyph {}",
            glyph_id
        );
        Ok(start..end)
    }

    /// Whether the glyph's `glyf` record is empty (e.g. space).
    pub fn is_space(&self, glyph_id: u16) -> Result<bool, DecodeError> {
        Ok(self.glyph_range(glyph_id)?.is_empty())
    }
}
