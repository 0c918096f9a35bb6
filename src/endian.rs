//! Conversions from the big-endian on-disk representation to host values
//!
//! Every multi-byte field in an sfnt is stored big-endian. The `swap*` functions take a value
//! that was loaded with a native-endian read and return the value the font meant; on big-endian
//! hosts they are the identity. Most of the crate reads through [`bytes::Buf`] instead, which
//! performs the same conversion as part of the read.

use font_types::F2Dot14;

#[inline]
pub fn swap_u16(raw: u16) -> u16 {
    u16::from_be(raw)
}

#[inline]
pub fn swap_i16(raw: i16) -> i16 {
    i16::from_be(raw)
}

#[inline]
pub fn swap_u32(raw: u32) -> u32 {
    u32::from_be(raw)
}

#[inline]
pub fn swap_i32(raw: i32) -> i32 {
    i32::from_be(raw)
}

#[inline]
pub fn be_u16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

#[inline]
pub fn be_i16(bytes: [u8; 2]) -> i16 {
    i16::from_be_bytes(bytes)
}

#[inline]
pub fn be_u32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

#[inline]
pub fn be_i32(bytes: [u8; 4]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// Convert a 2.14 fixed point value (already in host order) to a float.
///
/// Used for the scale values of composite glyph transforms.
#[inline]
pub fn f2dot14_to_f32(bits: i16) -> f32 {
    F2Dot14::from_bits(bits).to_f32()
}
