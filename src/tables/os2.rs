//! The [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2) table
//!
//! Each version appends fields to the previous one, so the minimum table size depends on the
//! version. Fields a version does not carry are left as `None`.

use bytes::Buf;

use crate::error::{DecodeError, bail_with_msg_if};

const FS_SELECTION_ITALIC: u16 = 1 << 0;
const FS_SELECTION_BOLD: u16 = 1 << 5;

/// Minimum size in bytes of an OS/2 table of `version`.
pub fn os2_min_size(version: u16) -> usize {
    match version {
        0 => 78,
        1 => 86,
        2..=4 => 96,
        _ => 100,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub s_family_class: i16,
    pub panose: [u8; 10],
    pub ul_unicode_range: [u32; 4],
    pub ach_vend_id: [u8; 4],
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,
    /// Version 1+
    pub ul_code_page_range: Option<[u32; 2]>,
    /// Version 2+
    pub sx_height: Option<i16>,
    pub s_cap_height: Option<i16>,
    pub us_default_char: Option<u16>,
    pub us_break_char: Option<u16>,
    pub us_max_context: Option<u16>,
}

impl Os2 {
    pub fn parse(mut input: &[u8]) -> Result<Self, DecodeError> {
        let len = input.len();
        let version = input.try_get_u16()?;
        bail_with_msg_if!(
            len < os2_min_size(version),
            DecodeError::Malformed,
            "OS/2 version {} needs {} bytes, have {}",
            version,
            (os2_min_size(version)),
            len
        );

        let x_avg_char_width = input.try_get_i16()?;
        let us_weight_class = input.try_get_u16()?;
        let us_width_class = input.try_get_u16()?;
        let fs_type = input.try_get_u16()?;
        // ySubscript* and ySuperscript* sizes, yStrikeout*
        input.advance(20);
        let s_family_class = input.try_get_i16()?;
        let mut panose = [0u8; 10];
        input.try_copy_to_slice(&mut panose)?;
        let ul_unicode_range = [
            input.try_get_u32()?,
            input.try_get_u32()?,
            input.try_get_u32()?,
            input.try_get_u32()?,
        ];
        let mut ach_vend_id = [0u8; 4];
        input.try_copy_to_slice(&mut ach_vend_id)?;

        let mut os2 = Self {
            version,
            x_avg_char_width,
            us_weight_class,
            us_width_class,
            fs_type,
            s_family_class,
            panose,
            ul_unicode_range,
            ach_vend_id,
            fs_selection: input.try_get_u16()?,
            us_first_char_index: input.try_get_u16()?,
            us_last_char_index: input.try_get_u16()?,
            s_typo_ascender: input.try_get_i16()?,
            s_typo_descender: input.try_get_i16()?,
            s_typo_line_gap: input.try_get_i16()?,
            us_win_ascent: input.try_get_u16()?,
            us_win_descent: input.try_get_u16()?,
            ul_code_page_range: None,
            sx_height: None,
            s_cap_height: None,
            us_default_char: None,
            us_break_char: None,
            us_max_context: None,
        };

        if version >= 1 {
            os2.ul_code_page_range = Some([input.try_get_u32()?, input.try_get_u32()?]);
        }
        if version >= 2 {
            os2.sx_height = Some(input.try_get_i16()?);
            os2.s_cap_height = Some(input.try_get_i16()?);
            os2.us_default_char = Some(input.try_get_u16()?);
            os2.us_break_char = Some(input.try_get_u16()?);
            os2.us_max_context = Some(input.try_get_u16()?);
        }

        Ok(os2)
    }

    /// Ascent used for line layout on Windows
    pub fn ascent(&self) -> u16 {
        self.us_win_ascent
    }

    /// Descent used for line layout on Windows, as a positive distance below the baseline
    pub fn descent(&self) -> u16 {
        self.us_win_descent
    }

    pub fn is_bold(&self) -> bool {
        self.fs_selection & FS_SELECTION_BOLD != 0
    }

    pub fn is_italic(&self) -> bool {
        self.fs_selection & FS_SELECTION_ITALIC != 0
    }
}
