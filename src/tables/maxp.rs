//! The [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table

use bytes::Buf;

use crate::error::{DecodeError, bail_if};

/// Size of a version 1.0 maxp table
pub const MAXP_TABLE_SIZE: usize = 32;

/// Maximum profile (version 1.0, TrueType outlines)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    /// Maximum number of components referenced at the top level of a composite glyph
    pub max_component_elements: u16,
    /// Maximum levels of recursion; 1 for simple components
    pub max_component_depth: u16,
}

impl Maxp {
    pub fn parse(mut input: &[u8]) -> Result<Self, DecodeError> {
        bail_if!(input.len() < MAXP_TABLE_SIZE);
        Ok(Self {
            version: input.try_get_u32()?,
            num_glyphs: input.try_get_u16()?,
            max_points: input.try_get_u16()?,
            max_contours: input.try_get_u16()?,
            max_composite_points: input.try_get_u16()?,
            max_composite_contours: input.try_get_u16()?,
            max_zones: input.try_get_u16()?,
            max_twilight_points: input.try_get_u16()?,
            max_storage: input.try_get_u16()?,
            max_function_defs: input.try_get_u16()?,
            max_instruction_defs: input.try_get_u16()?,
            max_stack_elements: input.try_get_u16()?,
            max_size_of_instructions: input.try_get_u16()?,
            max_component_elements: input.try_get_u16()?,
            max_component_depth: input.try_get_u16()?,
        })
    }
}
