//! TrueType Collection (`.ttc`) header
//!
//! <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header>

use bytes::Buf;
use font_types::Tag;

use crate::common::collection_header_size;
use crate::error::{DecodeError, bail_if, bail_with_msg_if};
use crate::table_tags::TTCF;

pub struct CollectionHeader {
    /// 0x00010000 or 0x00020000
    pub version: u32,
    /// Offset of each font's offset table from the start of the file
    pub offsets: Vec<u32>,
}

impl CollectionHeader {
    pub fn parse(file: &[u8]) -> Result<Self, DecodeError> {
        let mut input = file;
        let tag = Tag::from_u32(input.try_get_u32()?);
        bail_if!(tag != TTCF, DecodeError::NotFound);

        let version = input.try_get_u32()?;
        bail_with_msg_if!(
            version != 0x00010000 && version != 0x00020000,
            DecodeError::UnsupportedFormat,
            "unsupported collection version {:#010x}",
            version
        );

        let num_fonts = input.try_get_u32()?;
        bail_if!(num_fonts == 0);
        bail_if!(collection_header_size(version, num_fonts) > file.len());

        let mut offsets = Vec::with_capacity(num_fonts as usize);
        for _ in 0..num_fonts {
            let offset = input.try_get_u32()?;
            bail_if!(offset as usize >= file.len());
            offsets.push(offset);
        }

        Ok(Self { version, offsets })
    }

    /// Whether `file` starts with a collection header.
    pub fn is_collection(file: &[u8]) -> bool {
        file.get(0..4) == Some(TTCF.to_be_bytes().as_slice())
    }

    pub fn num_fonts(&self) -> usize {
        self.offsets.len()
    }

    /// Offset of the `index`th font's offset table.
    pub fn font_offset(&self, index: usize) -> Result<usize, DecodeError> {
        self.offsets
            .get(index)
            .map(|offset| *offset as usize)
            .ok_or(DecodeError::NotFound)
    }
}
