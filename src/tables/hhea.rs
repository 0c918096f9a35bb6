//! The [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table

use bytes::Buf;

use crate::error::{DecodeError, bail_if};

pub const HHEA_TABLE_SIZE: usize = 36;

/// Horizontal header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hhea {
    pub version: u32,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    /// Number of (advance, lsb) pairs in `hmtx`
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub fn parse(mut input: &[u8]) -> Result<Self, DecodeError> {
        bail_if!(input.len() < HHEA_TABLE_SIZE);
        let version = input.try_get_u32()?;
        let ascender = input.try_get_i16()?;
        let descender = input.try_get_i16()?;
        let line_gap = input.try_get_i16()?;
        let advance_width_max = input.try_get_u16()?;
        let min_left_side_bearing = input.try_get_i16()?;
        let min_right_side_bearing = input.try_get_i16()?;
        let x_max_extent = input.try_get_i16()?;
        let caret_slope_rise = input.try_get_i16()?;
        let caret_slope_run = input.try_get_i16()?;
        let caret_offset = input.try_get_i16()?;
        // four reserved int16
        input.advance(8);
        Ok(Self {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format: input.try_get_i16()?,
            number_of_h_metrics: input.try_get_u16()?,
        })
    }
}
