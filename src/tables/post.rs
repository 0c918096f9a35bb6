//! The [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post) table
//!
//! Maps Postscript glyph names to glyph ids. Formats 1.0, 2.0 and 2.5 carry names; format 3.0
//! has none.

use crate::buffer::TableData;
use crate::error::{DecodeError, bail, bail_if, bail_with_msg_if};
use crate::tables::maxp::Maxp;
use crate::tables::post_names::{NUM_STANDARD_NAMES, STANDARD_NAMES, standard_index};

/// Size of the header shared by every version
pub const POST_HEADER_SIZE: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PostVersion {
    /// The font uses exactly the standard Macintosh glyph order
    Version1,
    /// Per-glyph index into the standard names or a trailing string table
    Version2,
    /// Per-glyph signed offset into the standard order
    Version2_5,
    /// No glyph names
    Version3,
}

impl PostVersion {
    pub fn from_raw(version: u32) -> Option<Self> {
        match version {
            0x00010000 => Some(PostVersion::Version1),
            0x00020000 => Some(PostVersion::Version2),
            0x00025000 => Some(PostVersion::Version2_5),
            0x00030000 => Some(PostVersion::Version3),
            _ => None,
        }
    }
}

/// Glyph id for the Postscript glyph `name`.
///
/// Fails with `NotFound` when no glyph carries the name and `NoGlyphNames` for format 3.0
/// tables; [`DecodeError::sentinel`] turns these into `-1` and `-2`.
pub fn post_lookup(post: &[u8], maxp: &Maxp, name: &str) -> Result<u16, DecodeError> {
    Post::new(post, maxp)?.lookup(name)
}

#[derive(Copy, Clone)]
pub struct Post<'a> {
    data: TableData<'a>,
    version: PostVersion,
    pub italic_angle: i32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    /// Glyph count of the per-glyph array, 0 for formats 1.0 and 3.0
    num_glyphs: u16,
}

// numGlyphs follows the header in formats 2.0 and 2.5
const NAME_INDEX_OFFSET: usize = POST_HEADER_SIZE + 2;

impl<'a> Post<'a> {
    pub fn new(data: &'a [u8], maxp: &Maxp) -> Result<Self, DecodeError> {
        let data = TableData::new(data);
        bail_if!(data.len() < POST_HEADER_SIZE);
        let Some(version) = PostVersion::from_raw(data.read_u32(0)?) else {
            bail!(DecodeError::UnsupportedFormat);
        };

        let num_glyphs = match version {
            PostVersion::Version2 | PostVersion::Version2_5 => {
                let num_glyphs = data.read_u16(POST_HEADER_SIZE)?;
                bail_with_msg_if!(
                    num_glyphs != maxp.num_glyphs,
                    DecodeError::Malformed,
                    "post has {} glyphs, maxp has {}",
                    num_glyphs,
                    (maxp.num_glyphs)
                );
                let item_size = if version == PostVersion::Version2 { 2 } else { 1 };
                data.check_array(NAME_INDEX_OFFSET, num_glyphs as usize, item_size)?;
                num_glyphs
            }
            PostVersion::Version1 | PostVersion::Version3 => 0,
        };

        Ok(Self {
            data,
            version,
            italic_angle: data.read_i32(4)?,
            underline_position: data.read_i16(8)?,
            underline_thickness: data.read_i16(10)?,
            is_fixed_pitch: data.read_u32(12)?,
            num_glyphs,
        })
    }

    pub fn version(&self) -> PostVersion {
        self.version
    }

    /// Glyph id for the Postscript glyph `name`; the first match wins.
    pub fn lookup(&self, name: &str) -> Result<u16, DecodeError> {
        match self.version {
            PostVersion::Version1 => standard_index(name).ok_or(DecodeError::NotFound),
            PostVersion::Version2 => {
                let name_index = match standard_index(name) {
                    Some(index) => index as usize,
                    None => NUM_STANDARD_NAMES + self.custom_name_index(name)?,
                };
                for glyph_id in 0..self.num_glyphs {
                    if self.name_index(glyph_id)? as usize == name_index {
                        return Ok(glyph_id);
                    }
                }
                Err(DecodeError::NotFound)
            }
            PostVersion::Version2_5 => {
                let name_index = standard_index(name).ok_or(DecodeError::NotFound)?;
                for glyph_id in 0..self.num_glyphs {
                    if self.offset_name_index(glyph_id)? == name_index as i32 {
                        return Ok(glyph_id);
                    }
                }
                Err(DecodeError::NotFound)
            }
            PostVersion::Version3 => Err(DecodeError::NoGlyphNames),
        }
    }

    /// Postscript name of `glyph_id`.
    pub fn glyph_name(&self, glyph_id: u16) -> Result<&'a str, DecodeError> {
        match self.version {
            PostVersion::Version1 => STANDARD_NAMES
                .get(glyph_id as usize)
                .copied()
                .ok_or(DecodeError::InvalidGlyphId),
            PostVersion::Version2 => {
                let name_index = self.name_index(glyph_id)? as usize;
                if let Some(name) = STANDARD_NAMES.get(name_index) {
                    return Ok(name);
                }
                let custom = name_index - NUM_STANDARD_NAMES;
                let Some(name) = self.custom_names().nth(custom) else {
                    bail!();
                };
                std::str::from_utf8(name?).map_err(|_| DecodeError::Malformed)
            }
            PostVersion::Version2_5 => {
                let name_index = self.offset_name_index(glyph_id)?;
                usize::try_from(name_index)
                    .ok()
                    .and_then(|index| STANDARD_NAMES.get(index).copied())
                    .ok_or(DecodeError::Malformed)
            }
            PostVersion::Version3 => Err(DecodeError::NoGlyphNames),
        }
    }

    /// Format 2.0 glyphNameIndex entry
    fn name_index(&self, glyph_id: u16) -> Result<u16, DecodeError> {
        bail_if!(glyph_id >= self.num_glyphs, DecodeError::InvalidGlyphId);
        self.data
            .read_u16(NAME_INDEX_OFFSET + 2 * glyph_id as usize)
    }

    /// Format 2.5 standard index: glyph id plus its signed offset
    fn offset_name_index(&self, glyph_id: u16) -> Result<i32, DecodeError> {
        bail_if!(glyph_id >= self.num_glyphs, DecodeError::InvalidGlyphId);
        let offset = self.data.read_i8(NAME_INDEX_OFFSET + glyph_id as usize)?;
        Ok(glyph_id as i32 + offset as i32)
    }

    /// Position of `name` in the format 2.0 string table.
    fn custom_name_index(&self, name: &str) -> Result<usize, DecodeError> {
        for (index, custom) in self.custom_names().enumerate() {
            if custom? == name.as_bytes() {
                return Ok(index);
            }
        }
        Err(DecodeError::NotFound)
    }

    /// The Pascal strings following the format 2.0 index array.
    fn custom_names(&self) -> PascalStrings<'a> {
        let start = NAME_INDEX_OFFSET + 2 * self.num_glyphs as usize;
        PascalStrings {
            input: self.data.cursor(start).unwrap_or_default(),
        }
    }
}

struct PascalStrings<'a> {
    input: &'a [u8],
}

impl<'a> Iterator for PascalStrings<'a> {
    type Item = Result<&'a [u8], DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.input.split_first()?;
        let len = len as usize;
        if len > rest.len() {
            self.input = &[];
            return Some(Err(DecodeError::Malformed));
        }
        let (string, rest) = rest.split_at(len);
        self.input = rest;
        Some(Ok(string))
    }
}
