//! The [glyf](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf) table
//!
//! A glyph id resolves through `loca` to one of four outcomes: an invalid id (an error), an empty
//! record (a glyph such as space with no outline), a simple glyph described directly by contours,
//! or a composite glyph assembled from other glyphs.

mod composite;
mod outline;
mod simple;

pub use composite::{
    Anchor, Component, ComponentIter, CompositeGlyph, Transform, component_glyph_ids,
    component_placement, component_transform,
};
pub use outline::{GlyphOutliner, MAX_COMPOSITE_DEPTH, Outline, OutlineLimits};
pub use simple::{SimpleGlyph, calc_absolute_points, simplify_flags};

use bytes::Buf;

use crate::error::{DecodeError, bail_if};
use crate::tables::head::Head;
use crate::tables::loca::Loca;

/// Size of the header shared by simple and composite glyphs
pub const GLYPH_HEADER_SIZE: usize = 10;

/// Glyph bounding box in font units
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl BBox {
    pub(crate) fn parse(input: &mut impl Buf) -> Result<Self, DecodeError> {
        Ok(Self {
            x_min: input.try_get_i16()?,
            y_min: input.try_get_i16()?,
            x_max: input.try_get_i16()?,
            y_max: input.try_get_i16()?,
        })
    }
}

/// A decoded `glyf` record
#[derive(Clone)]
pub enum Glyph<'a> {
    /// Zero-length record: the glyph has no outline
    Empty,
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> Glyph<'a> {
    /// Decode the header of a glyph record.
    pub fn parse(record: &'a [u8]) -> Result<Self, DecodeError> {
        if record.is_empty() {
            return Ok(Glyph::Empty);
        }
        let mut input = record;
        let num_contours = input.try_get_i16()?;
        if num_contours >= 0 {
            Ok(Glyph::Simple(SimpleGlyph::new(record)?))
        } else {
            Ok(Glyph::Composite(CompositeGlyph::new(record)?))
        }
    }

    /// The contour count field as stored: negative for composites, 0 for empty glyphs.
    pub fn contour_count(&self) -> i16 {
        match self {
            Glyph::Empty => 0,
            Glyph::Simple(simple) => simple.contour_count() as i16,
            Glyph::Composite(_) => -1,
        }
    }

    /// The bounding box stored in the glyph header.
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Glyph::Empty => None,
            Glyph::Simple(simple) => Some(simple.bbox()),
            Glyph::Composite(composite) => Some(composite.bbox()),
        }
    }
}

/// The glyph record starting at `offset` within `glyf`.
///
/// Runs to the end of the table; use [`glyf_lookup_by_id`] to get exactly one record.
pub fn glyf_lookup(glyf: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    glyf.get(offset..).ok_or(DecodeError::Malformed)
}

/// The `glyf` record for `glyph_id`, located through `loca`. Empty for glyphs with no outline.
pub fn glyf_lookup_by_id<'a>(
    glyph_id: u16,
    glyf: &'a [u8],
    loca: &[u8],
    head: &Head,
) -> Result<&'a [u8], DecodeError> {
    let range = Loca::new(loca, head).glyph_range(glyph_id)?;
    bail_if!(range.end > glyf.len());
    Ok(&glyf[range])
}

/// Whether `glyph_id` has an empty `glyf` record.
pub fn is_space(glyph_id: u16, loca: &[u8], head: &Head) -> Result<bool, DecodeError> {
    Loca::new(loca, head).is_space(glyph_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{GlyfBuilder, HeadBuilder, simple_glyph};

    #[test]
    fn lookup_by_id() {
        let head = Head::parse(&HeadBuilder::default().build()).unwrap();
        let square = simple_glyph(&[&[(0, 0, true), (0, 10, true), (10, 10, true), (10, 0, true)]]);
        let (glyf, loca) = GlyfBuilder::default()
            .glyph(&[])
            .glyph(&square)
            .build(false);

        assert_eq!(glyf_lookup_by_id(0, &glyf, &loca, &head), Ok(&[][..]));
        assert!(is_space(0, &loca, &head).unwrap());
        assert!(!is_space(1, &loca, &head).unwrap());

        let record = glyf_lookup_by_id(1, &glyf, &loca, &head).unwrap();
        assert_eq!(&record[..square.len()], &square[..]);
        assert_eq!(
            glyf_lookup_by_id(2, &glyf, &loca, &head),
            Err(DecodeError::InvalidGlyphId)
        );
        assert_eq!(glyf_lookup(&glyf, 0).unwrap().len(), glyf.len());
        assert!(glyf_lookup(&glyf, glyf.len() + 1).is_err());
    }

    #[test]
    fn loca_past_end_of_glyf() {
        let head = Head::parse(&HeadBuilder::default().build()).unwrap();
        let (glyf, loca) = GlyfBuilder::default().glyph(&[0; 12]).build(false);
        assert_eq!(
            glyf_lookup_by_id(0, &glyf[..8], &loca, &head),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn glyph_kinds() {
        assert!(matches!(Glyph::parse(&[]), Ok(Glyph::Empty)));
        let square = simple_glyph(&[&[(0, 0, true), (0, 10, true), (10, 10, true), (10, 0, true)]]);
        let glyph = Glyph::parse(&square).unwrap();
        assert_eq!(glyph.contour_count(), 1);
        assert_eq!(
            glyph.bbox(),
            Some(BBox {
                x_min: 0,
                y_min: 0,
                x_max: 10,
                y_max: 10
            })
        );
        assert_eq!(Glyph::parse(&[0]).err(), Some(DecodeError::Malformed));
    }
}
