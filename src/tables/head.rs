//! The [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table

use bytes::Buf;

use crate::error::{DecodeError, bail_if};

pub const HEAD_TABLE_SIZE: usize = 54;
pub const HEAD_MAGIC_NUMBER: u32 = 0x5F0F3CF5;

const MAC_STYLE_BOLD: u16 = 1 << 0;
const MAC_STYLE_ITALIC: u16 = 1 << 1;

/// Font header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub version: u32,
    pub font_revision: u32,
    /// Set so that the whole font sums to 0xB1B0AFBA
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    /// Design units per em, 16 to 16384
    pub units_per_em: u16,
    /// Seconds since 1904-01-01, as (high, low) halves
    pub created: (u32, u32),
    pub modified: (u32, u32),
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for 16-bit `loca` offsets, 1 for 32-bit
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    pub fn parse(mut input: &[u8]) -> Result<Self, DecodeError> {
        bail_if!(input.len() < HEAD_TABLE_SIZE);
        Ok(Self {
            version: input.try_get_u32()?,
            font_revision: input.try_get_u32()?,
            checksum_adjustment: input.try_get_u32()?,
            magic_number: input.try_get_u32()?,
            flags: input.try_get_u16()?,
            units_per_em: input.try_get_u16()?,
            created: (input.try_get_u32()?, input.try_get_u32()?),
            modified: (input.try_get_u32()?, input.try_get_u32()?),
            x_min: input.try_get_i16()?,
            y_min: input.try_get_i16()?,
            x_max: input.try_get_i16()?,
            y_max: input.try_get_i16()?,
            mac_style: input.try_get_u16()?,
            lowest_rec_ppem: input.try_get_u16()?,
            font_direction_hint: input.try_get_i16()?,
            index_to_loc_format: input.try_get_i16()?,
            glyph_data_format: input.try_get_i16()?,
        })
    }

    pub fn is_italic(&self) -> bool {
        self.mac_style & MAC_STYLE_ITALIC != 0
    }

    pub fn is_bold(&self) -> bool {
        self.mac_style & MAC_STYLE_BOLD != 0
    }

    /// Whether `loca` stores 32-bit offsets
    pub fn long_loca(&self) -> bool {
        self.index_to_loc_format != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::HeadBuilder;

    #[test]
    fn fields() {
        let data = HeadBuilder {
            units_per_em: 2048,
            index_to_loc_format: 1,
            mac_style: MAC_STYLE_ITALIC,
            checksum_adjustment: 0xdead_beef,
            created: (1, 2),
            modified: (3, 0xffff_ffff),
        }
        .build();
        let head = Head::parse(&data).unwrap();
        assert_eq!(head.version, 0x00010000);
        assert_eq!(head.magic_number, HEAD_MAGIC_NUMBER);
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.checksum_adjustment, 0xdead_beef);
        assert_eq!(head.created, (1, 2));
        assert_eq!(head.modified, (3, 0xffff_ffff));
        assert!(head.is_italic());
        assert!(!head.is_bold());
        assert!(head.long_loca());
    }

    #[test]
    fn short_table() {
        let data = HeadBuilder::default().build();
        assert_eq!(Head::parse(&data[..53]), Err(DecodeError::Malformed));
    }
}
