use bytes::Buf;

use crate::buffer::TableData;
use crate::common::Point;
use crate::error::{DecodeError, bail_if, bail_with_msg_if};
use crate::tables::glyf::{BBox, GLYPH_HEADER_SIZE};

// simple glyph flags
pub(crate) const GLYF_ON_CURVE: u8 = 1 << 0;
pub(crate) const GLYF_X_SHORT: u8 = 1 << 1;
pub(crate) const GLYF_Y_SHORT: u8 = 1 << 2;
pub(crate) const GLYF_REPEAT: u8 = 1 << 3;
pub(crate) const GLYF_THIS_X_IS_SAME: u8 = 1 << 4;
pub(crate) const GLYF_THIS_Y_IS_SAME: u8 = 1 << 5;
pub(crate) const OVERLAP_SIMPLE: u8 = 1 << 6;

/// A glyph described directly by its contours
#[derive(Clone)]
pub struct SimpleGlyph<'a> {
    data: TableData<'a>,
    num_contours: u16,
    bbox: BBox,
}

impl<'a> SimpleGlyph<'a> {
    pub fn new(record: &'a [u8]) -> Result<Self, DecodeError> {
        let mut input = record;
        let num_contours = input.try_get_i16()?;
        bail_if!(num_contours < 0);
        let bbox = BBox::parse(&mut input)?;
        let data = TableData::new(record);
        // endPtsOfContours and instructionLength
        data.check_array(GLYPH_HEADER_SIZE, num_contours as usize + 1, 2)?;
        Ok(Self {
            data,
            num_contours: num_contours as u16,
            bbox,
        })
    }

    pub fn contour_count(&self) -> usize {
        self.num_contours as usize
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Index of the last point of each contour.
    pub fn contour_end_points(&self) -> Result<Vec<u16>, DecodeError> {
        let mut input = self.data.cursor(GLYPH_HEADER_SIZE)?;
        let mut end_points = Vec::with_capacity(self.contour_count());
        for i in 0..self.contour_count() {
            let end_point = input.try_get_u16()?;
            bail_with_msg_if!(
                i > 0 && end_point <= end_points[i - 1],
                DecodeError::Malformed,
                "contour end points not increasing at contour {}",
                i
            );
            end_points.push(end_point);
        }
        Ok(end_points)
    }

    /// Total number of points across all contours.
    pub fn num_points(&self) -> Result<usize, DecodeError> {
        if self.num_contours == 0 {
            return Ok(0);
        }
        let last = GLYPH_HEADER_SIZE + 2 * (self.contour_count() - 1);
        Ok(self.data.read_u16(last)? as usize + 1)
    }

    fn instructions_offset(&self) -> usize {
        GLYPH_HEADER_SIZE + 2 * self.contour_count()
    }

    /// The hinting bytecode of the glyph. Never executed by this crate.
    pub fn instructions(&self) -> Result<&'a [u8], DecodeError> {
        let offset = self.instructions_offset();
        let len = self.data.read_u16(offset)? as usize;
        Ok(self.data.slice(offset + 2..offset + 2 + len)?.as_bytes())
    }

    /// The flag and coordinate streams that follow the instructions.
    fn point_data(&self) -> Result<&'a [u8], DecodeError> {
        let instructions = self.instructions()?;
        self.data
            .cursor(self.instructions_offset() + 2 + instructions.len())
    }

    /// Decode the run-length encoded flags, one byte per point.
    fn decode_flags(input: &mut impl Buf, num_points: usize) -> Result<Vec<u8>, DecodeError> {
        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag = input.try_get_u8()?;
            flags.push(flag);
            if flag & GLYF_REPEAT != 0 {
                let repeat_count = input.try_get_u8()? as usize;
                bail_with_msg_if!(
                    flags.len() + repeat_count > num_points,
                    DecodeError::Malformed,
                    "flag repeat runs past {} points",
                    num_points
                );
                flags.extend(std::iter::repeat_n(flag, repeat_count));
            }
        }
        Ok(flags)
    }

    /// Decode one coordinate stream into relative deltas.
    fn decode_deltas(
        input: &mut impl Buf,
        flags: &[u8],
        short_flag: u8,
        same_flag: u8,
    ) -> Result<Vec<i32>, DecodeError> {
        let mut deltas = Vec::with_capacity(flags.len());
        for &flag in flags {
            let delta = if flag & short_flag != 0 {
                // one byte magnitude, "same" bit is the sign
                let magnitude = input.try_get_u8()? as i32;
                if flag & same_flag != 0 {
                    magnitude
                } else {
                    -magnitude
                }
            } else if flag & same_flag != 0 {
                0
            } else {
                input.try_get_i16()? as i32
            };
            deltas.push(delta);
        }
        Ok(deltas)
    }

    /// The on-disk flag byte of every point, with repeats expanded.
    pub fn flags(&self) -> Result<Vec<u8>, DecodeError> {
        let mut input = self.point_data()?;
        Self::decode_flags(&mut input, self.num_points()?)
    }

    /// Points with coordinates still relative to the previous point.
    ///
    /// Run [`calc_absolute_points`] over the result to get font-unit coordinates.
    pub fn relative_points(&self) -> Result<Vec<Point>, DecodeError> {
        let num_points = self.num_points()?;
        let mut input = self.point_data()?;
        let flags = Self::decode_flags(&mut input, num_points)?;
        let xs = Self::decode_deltas(&mut input, &flags, GLYF_X_SHORT, GLYF_THIS_X_IS_SAME)?;
        let ys = Self::decode_deltas(&mut input, &flags, GLYF_Y_SHORT, GLYF_THIS_Y_IS_SAME)?;

        let on_curve = simplify_flags(&flags);
        Ok((0..num_points)
            .map(|i| Point::new(xs[i], ys[i], on_curve[i]))
            .collect())
    }

    /// Points in font units.
    pub fn points(&self) -> Result<Vec<Point>, DecodeError> {
        let mut points = self.relative_points()?;
        calc_absolute_points(&mut points);
        Ok(points)
    }

    /// Whether the first flag carries OVERLAP_SIMPLE.
    pub fn has_overlaps(&self) -> Result<bool, DecodeError> {
        let flags = self.flags()?;
        Ok(flags.first().is_some_and(|flag| flag & OVERLAP_SIMPLE != 0))
    }
}

/// Turn relative deltas into absolute coordinates with a running sum.
pub fn calc_absolute_points(points: &mut [Point]) {
    let mut x: i32 = 0;
    let mut y: i32 = 0;
    for point in points.iter_mut() {
        x = x.wrapping_add(point.x);
        y = y.wrapping_add(point.y);
        point.x = x;
        point.y = y;
    }
}

/// Reduce on-disk flag bytes to on-curve indicators.
pub fn simplify_flags(flags: &[u8]) -> Vec<bool> {
    flags.iter().map(|flag| flag & GLYF_ON_CURVE != 0).collect()
}
