use bytes::Buf;

use crate::common::Point;
use crate::endian::f2dot14_to_f32;
use crate::error::{DecodeError, bail_if};
use crate::tables::glyf::{BBox, GLYPH_HEADER_SIZE};

// composite glyph flags
const FLAG_ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
const FLAG_ARGS_ARE_XY_VALUES: u16 = 1 << 1;
const FLAG_ROUND_XY_TO_GRID: u16 = 1 << 2;
const FLAG_WE_HAVE_A_SCALE: u16 = 1 << 3;
const FLAG_MORE_COMPONENTS: u16 = 1 << 5;
const FLAG_WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
const FLAG_WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
const FLAG_WE_HAVE_INSTRUCTIONS: u16 = 1 << 8;
const FLAG_USE_MY_METRICS: u16 = 1 << 9;
const FLAG_OVERLAP_COMPOUND: u16 = 1 << 10;
const FLAG_SCALED_COMPONENT_OFFSET: u16 = 1 << 11;

/// How a component is positioned relative to the components before it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Explicit offset in font units
    Offset { dx: i32, dy: i32 },
    /// Translate so the component's point `component` lands on point `base` of the outline
    /// assembled so far
    Points { base: u16, component: u16 },
}

/// A 2x2 linear transform, applied as
/// `x' = xx * x + yx * y`, `y' = xy * x + yy * y`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub xx: f32,
    pub xy: f32,
    pub yx: f32,
    pub yy: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        xx: 1.0,
        xy: 0.0,
        yx: 0.0,
        yy: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Transform `points` in place, rounding to the nearest font unit.
    pub fn apply(&self, points: &mut [Point]) {
        if self.is_identity() {
            return;
        }
        for point in points {
            let x = point.x as f32;
            let y = point.y as f32;
            point.x = (self.xx * x + self.yx * y).round() as i32;
            point.y = (self.xy * x + self.yy * y).round() as i32;
        }
    }
}

/// One component record of a composite glyph
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Component {
    pub flags: u16,
    pub glyph_id: u16,
    pub anchor: Anchor,
    pub transform: Transform,
}

impl Component {
    fn parse(input: &mut impl Buf) -> Result<Self, DecodeError> {
        let flags = input.try_get_u16()?;
        let glyph_id = input.try_get_u16()?;

        let words = flags & FLAG_ARG_1_AND_2_ARE_WORDS != 0;
        let anchor = if flags & FLAG_ARGS_ARE_XY_VALUES != 0 {
            let (dx, dy) = if words {
                (input.try_get_i16()? as i32, input.try_get_i16()? as i32)
            } else {
                (input.try_get_i8()? as i32, input.try_get_i8()? as i32)
            };
            Anchor::Offset { dx, dy }
        } else {
            let (base, component) = if words {
                (input.try_get_u16()?, input.try_get_u16()?)
            } else {
                (input.try_get_u8()? as u16, input.try_get_u8()? as u16)
            };
            Anchor::Points { base, component }
        };

        let mut transform = Transform::IDENTITY;
        if flags & FLAG_WE_HAVE_A_SCALE != 0 {
            let scale = f2dot14_to_f32(input.try_get_i16()?);
            transform.xx = scale;
            transform.yy = scale;
        } else if flags & FLAG_WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            transform.xx = f2dot14_to_f32(input.try_get_i16()?);
            transform.yy = f2dot14_to_f32(input.try_get_i16()?);
        } else if flags & FLAG_WE_HAVE_A_TWO_BY_TWO != 0 {
            transform.xx = f2dot14_to_f32(input.try_get_i16()?);
            transform.xy = f2dot14_to_f32(input.try_get_i16()?);
            transform.yx = f2dot14_to_f32(input.try_get_i16()?);
            transform.yy = f2dot14_to_f32(input.try_get_i16()?);
        }

        Ok(Self {
            flags,
            glyph_id,
            anchor,
            transform,
        })
    }

    fn more_components(&self) -> bool {
        self.flags & FLAG_MORE_COMPONENTS != 0
    }

    /// The composite should take its advance width and side bearings from this component
    pub fn use_my_metrics(&self) -> bool {
        self.flags & FLAG_USE_MY_METRICS != 0
    }

    pub fn overlap_compound(&self) -> bool {
        self.flags & FLAG_OVERLAP_COMPOUND != 0
    }

    /// The font asks for the offset to be scaled by the transform. The decoder never scales
    /// offsets; this is reported for callers that want to.
    pub fn scaled_component_offset(&self) -> bool {
        self.flags & FLAG_SCALED_COMPONENT_OFFSET != 0
    }

    /// A grid-fitting hint; ignored by the decoder
    pub fn round_xy_to_grid(&self) -> bool {
        self.flags & FLAG_ROUND_XY_TO_GRID != 0
    }

    pub fn has_instructions(&self) -> bool {
        self.flags & FLAG_WE_HAVE_INSTRUCTIONS != 0
    }
}

/// A glyph assembled from other glyphs
#[derive(Clone)]
pub struct CompositeGlyph<'a> {
    components: &'a [u8],
    bbox: BBox,
}

impl<'a> CompositeGlyph<'a> {
    pub fn new(record: &'a [u8]) -> Result<Self, DecodeError> {
        let mut input = record;
        let num_contours = input.try_get_i16()?;
        bail_if!(num_contours >= 0);
        let bbox = BBox::parse(&mut input)?;
        Ok(Self {
            components: &record[GLYPH_HEADER_SIZE..],
            bbox,
        })
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Iterate the component records.
    ///
    /// A chain that runs off the end of the record without clearing MORE_COMPONENTS yields
    /// `DecodeError::Malformed`.
    pub fn components(&self) -> ComponentIter<'a> {
        ComponentIter {
            input: self.components,
            done: false,
        }
    }

    /// Hinting bytecode following the last component, if any.
    pub fn instructions(&self) -> Result<&'a [u8], DecodeError> {
        let mut iter = self.components();
        let mut have_instructions = false;
        for component in iter.by_ref() {
            have_instructions |= component?.has_instructions();
        }
        if !have_instructions {
            return Ok(&[]);
        }
        let mut input = iter.input;
        let len = input.try_get_u16()? as usize;
        bail_if!(len > input.len());
        Ok(&input[..len])
    }
}

pub struct ComponentIter<'a> {
    input: &'a [u8],
    done: bool,
}

impl Iterator for ComponentIter<'_> {
    type Item = Result<Component, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match Component::parse(&mut self.input) {
            Ok(component) => {
                self.done = !component.more_components();
                Some(Ok(component))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Glyph ids of every component, in record order.
pub fn component_glyph_ids(composite: &CompositeGlyph) -> Result<Vec<u16>, DecodeError> {
    composite
        .components()
        .map(|component| component.map(|c| c.glyph_id))
        .collect()
}

fn nth_component(composite: &CompositeGlyph, index: usize) -> Result<Component, DecodeError> {
    composite
        .components()
        .nth(index)
        .unwrap_or(Err(DecodeError::NotFound))
}

/// Placement of the `index`th component.
pub fn component_placement(
    composite: &CompositeGlyph,
    index: usize,
) -> Result<Anchor, DecodeError> {
    Ok(nth_component(composite, index)?.anchor)
}

/// Transform of the `index`th component; identity when the record carries none.
pub fn component_transform(
    composite: &CompositeGlyph,
    index: usize,
) -> Result<Transform, DecodeError> {
    Ok(nth_component(composite, index)?.transform)
}
