/* Copyright 2014 Google Inc. All Rights Reserved.

   Distributed under MIT license.
   See file LICENSE for detail or copy at https://opensource.org/licenses/MIT
*/

//! Definitions shared across the table decoders

/// A point of a glyph outline in font units
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

impl Point {
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        Point { x, y, on_curve }
    }
}

/// Size of the collection header. 0 if version indicates this isn't a
/// collection. Ref http://www.microsoft.com/typography/otspec/otff.htm,
/// True Type Collections
pub(crate) fn collection_header_size(header_version: u32, num_fonts: u32) -> usize {
    let mut size: usize = 0;
    if header_version == 0x00020000 {
        size += 12; // ulDsig{Tag,Length,Offset}
    }
    if header_version == 0x00010000 || header_version == 0x00020000 {
        size += 12   // TTCTag, Version, numFonts
      + 4 * (num_fonts as usize); // OffsetTable[numFonts]
    }
    size
}

/// Compute the sfnt checksum of `buf`: the wrapping sum of its big-endian u32 words
pub fn compute_checksum(buf: &[u8]) -> u32 {
    let mut checksum: u32 = 0;
    let mut iter = buf.chunks_exact(4);
    for chunk in &mut iter {
        checksum = checksum.wrapping_add(u32::from_be_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3],
        ]));
    }

    // Treat size not aligned on 4 as if it were padded to 4 with 0's.
    let remainder = iter.remainder();
    let tail = match *remainder {
        [a, b, c] => ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8),
        [a, b] => ((a as u32) << 24) | ((b as u32) << 16),
        [a] => (a as u32) << 24,
        _ => 0,
    };

    checksum.wrapping_add(tail)
}
