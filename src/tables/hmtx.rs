//! The [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use crate::buffer::TableData;
use crate::error::{DecodeError, bail_if, bail_with_msg_if};
use crate::tables::hhea::Hhea;

const LONG_HOR_METRIC_SIZE: usize = 4;

/// Horizontal metrics of one glyph
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HMetric {
    pub advance_width: u16,
    pub lsb: i16,
}

/// Look up the advance width and left side bearing of `glyph_id`.
///
/// Glyphs past the `numberOfHMetrics` explicit pairs share the last pair's advance width and
/// take their left side bearing from the trailing array. Reads past the end of `hmtx` fail
/// rather than over-read.
pub fn hor_metrics(glyph_id: u16, hmtx: &[u8], hhea: &Hhea) -> Result<HMetric, DecodeError> {
    Hmtx::new(hmtx, hhea.number_of_h_metrics)?.metrics(glyph_id)
}

#[derive(Copy, Clone)]
pub struct Hmtx<'a> {
    data: TableData<'a>,
    num_hmetrics: u16,
}

impl<'a> Hmtx<'a> {
    pub fn new(data: &'a [u8], num_hmetrics: u16) -> Result<Self, DecodeError> {
        // "...only one entry need be in the array, but that entry is required."
        // <https://www.microsoft.com/typography/otspec/hmtx.htm>
        bail_if!(num_hmetrics < 1);

        let data = TableData::new(data);
        bail_with_msg_if!(
            data.check_array(0, num_hmetrics as usize, LONG_HOR_METRIC_SIZE)
                .is_err(),
            DecodeError::Malformed,
            "hmtx too short for {} long metrics",
            num_hmetrics
        );
        Ok(Self { data, num_hmetrics })
    }

    /// Number of glyphs with an explicit left side bearing in the table
    pub fn num_glyphs(&self) -> usize {
        let n = self.num_hmetrics as usize;
        n + (self.data.len() - n * LONG_HOR_METRIC_SIZE) / 2
    }

    pub fn metrics(&self, glyph_id: u16) -> Result<HMetric, DecodeError> {
        let glyph_id = glyph_id as usize;
        let n = self.num_hmetrics as usize;
        if glyph_id < n {
            let offset = glyph_id * LONG_HOR_METRIC_SIZE;
            return Ok(HMetric {
                advance_width: self.data.read_u16(offset)?,
                lsb: self.data.read_i16(offset + 2)?,
            });
        }

        let advance_width = self.data.read_u16((n - 1) * LONG_HOR_METRIC_SIZE)?;
        let lsb_offset = n * LONG_HOR_METRIC_SIZE + (glyph_id - n) * 2;
        bail_if!(lsb_offset + 2 > self.data.len(), DecodeError::InvalidGlyphId);
        Ok(HMetric {
            advance_width,
            lsb: self.data.read_i16(lsb_offset)?,
        })
    }
}
