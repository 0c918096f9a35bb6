//! Builders for the synthetic big-endian tables the unit tests decode.

use bytes::BufMut;
use font_types::{NameId, Tag};

use crate::common::compute_checksum;
use crate::table_tags::HEAD;
use crate::tables::cmap::SequentialMapGroup;
use crate::tables::glyf::Anchor;
use crate::tables::head::HEAD_MAGIC_NUMBER;

const VERSION_1_0: u32 = 0x00010000;

fn pad_to(data: &mut Vec<u8>, alignment: usize) {
    let len = data.len().next_multiple_of(alignment);
    data.resize(len, 0);
}

/// `(searchRange, entrySelector, rangeShift)` for `count` items of `item_size` bytes
fn binary_search_params(count: u16, item_size: u16) -> (u16, u16, u16) {
    if count == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - count.leading_zeros() as u16;
    let search_range = (1 << entry_selector) * item_size;
    (search_range, entry_selector, count * item_size - search_range)
}

// -----------------------------------------------------------------------------
// sfnt
// -----------------------------------------------------------------------------

/// A TrueType font file with tables sorted by tag and padded to 4 bytes
#[derive(Default)]
pub struct SfntBuilder {
    tables: Vec<(Tag, Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, tag: Tag, data: &[u8]) -> Self {
        self.tables.push((tag, data.to_vec()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.tables.sort_by_key(|(tag, _)| tag.to_be_bytes());
        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = binary_search_params(num_tables, 16);

        let mut font = Vec::new();
        font.put_u32(VERSION_1_0);
        font.put_u16(num_tables);
        font.put_u16(search_range);
        font.put_u16(entry_selector);
        font.put_u16(range_shift);

        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            let mut checksum = compute_checksum(data);
            if *tag == HEAD && data.len() >= 12 {
                let adjustment = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
                checksum = checksum.wrapping_sub(adjustment);
            }
            font.put_slice(&tag.to_be_bytes());
            font.put_u32(checksum);
            font.put_u32(offset as u32);
            font.put_u32(data.len() as u32);
            offset += data.len().next_multiple_of(4);
        }
        for (_, data) in &self.tables {
            font.put_slice(data);
            pad_to(&mut font, 4);
        }
        font
    }
}

// -----------------------------------------------------------------------------
// Fixed-layout tables
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct HeadBuilder {
    pub units_per_em: u16,
    pub index_to_loc_format: i16,
    pub mac_style: u16,
    pub checksum_adjustment: u32,
    pub created: (u32, u32),
    pub modified: (u32, u32),
}

impl HeadBuilder {
    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.put_u32(VERSION_1_0);
        data.put_u32(VERSION_1_0); // fontRevision
        data.put_u32(self.checksum_adjustment);
        data.put_u32(HEAD_MAGIC_NUMBER);
        data.put_u16(0); // flags
        data.put_u16(self.units_per_em);
        data.put_u32(self.created.0);
        data.put_u32(self.created.1);
        data.put_u32(self.modified.0);
        data.put_u32(self.modified.1);
        data.put_bytes(0, 8); // bbox
        data.put_u16(self.mac_style);
        data.put_u16(8); // lowestRecPPEM
        data.put_i16(2); // fontDirectionHint
        data.put_i16(self.index_to_loc_format);
        data.put_i16(0); // glyphDataFormat
        data
    }
}

#[derive(Default)]
pub struct HheaBuilder {
    pub ascender: i16,
    pub descender: i16,
    pub number_of_h_metrics: u16,
}

impl HheaBuilder {
    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.put_u32(VERSION_1_0);
        data.put_i16(self.ascender);
        data.put_i16(self.descender);
        data.put_i16(0); // lineGap
        data.put_u16(0); // advanceWidthMax
        data.put_bytes(0, 6); // min bearings, xMaxExtent
        data.put_i16(1); // caretSlopeRise
        data.put_i16(0);
        data.put_i16(0);
        data.put_bytes(0, 8); // reserved
        data.put_i16(0); // metricDataFormat
        data.put_u16(self.number_of_h_metrics);
        data
    }
}

#[derive(Default)]
pub struct MaxpBuilder {
    pub num_glyphs: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl MaxpBuilder {
    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.put_u32(VERSION_1_0);
        data.put_u16(self.num_glyphs);
        data.put_bytes(0, 8); // max points and contours, simple and composite
        data.put_u16(2); // maxZones
        data.put_bytes(0, 12);
        data.put_u16(self.max_component_elements);
        data.put_u16(self.max_component_depth);
        data
    }
}

/// An OS/2 table of exactly the minimum size for `version`
pub fn os2_table(version: u16, win_ascent: u16, win_descent: u16, fs_selection: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.put_u16(version);
    data.put_i16(500); // xAvgCharWidth
    data.put_u16(400);
    data.put_u16(5);
    data.put_u16(0); // fsType
    data.put_bytes(0, 20); // subscript, superscript, strikeout
    data.put_i16(0); // sFamilyClass
    data.put_bytes(0, 10); // panose
    data.put_bytes(0, 16); // ulUnicodeRange
    data.put_slice(b"NONE");
    data.put_u16(fs_selection);
    data.put_u16(0x20);
    data.put_u16(0x7e);
    data.put_i16(800);
    data.put_i16(-200);
    data.put_i16(0);
    data.put_u16(win_ascent);
    data.put_u16(win_descent);
    if version >= 1 {
        data.put_u32(1);
        data.put_u32(0);
    }
    if version >= 2 {
        data.put_i16(500); // sxHeight
        data.put_i16(700); // sCapHeight
        data.put_u16(0);
        data.put_u16(0x20);
        data.put_u16(1);
    }
    if version >= 5 {
        data.put_u16(0);
        data.put_u16(0xffff);
    }
    data
}

/// `hmtx` with explicit (advance, lsb) pairs followed by lsb-only entries
pub fn hmtx_table(metrics: &[(u16, i16)], lsbs: &[i16]) -> Vec<u8> {
    let mut data = Vec::new();
    for (advance, lsb) in metrics {
        data.put_u16(*advance);
        data.put_i16(*lsb);
    }
    for lsb in lsbs {
        data.put_i16(*lsb);
    }
    data
}

/// `loca` from byte offsets; short tables store offset / 2
pub fn loca_table(offsets: &[u32], long: bool) -> Vec<u8> {
    let mut data = Vec::new();
    for offset in offsets {
        if long {
            data.put_u32(*offset);
        } else {
            data.put_u16((*offset / 2) as u16);
        }
    }
    data
}

// -----------------------------------------------------------------------------
// glyf
// -----------------------------------------------------------------------------

const GLYF_ON_CURVE: u8 = 1 << 0;
const GLYF_X_SHORT: u8 = 1 << 1;
const GLYF_Y_SHORT: u8 = 1 << 2;
const GLYF_REPEAT: u8 = 1 << 3;
const GLYF_THIS_X_IS_SAME: u8 = 1 << 4;
const GLYF_THIS_Y_IS_SAME: u8 = 1 << 5;

fn coordinate_flag(delta: i32, short: u8, same: u8) -> u8 {
    if delta == 0 {
        same
    } else if delta > -256 && delta < 256 {
        short | if delta > 0 { same } else { 0 }
    } else {
        0
    }
}

fn put_coordinate(data: &mut Vec<u8>, delta: i32) {
    if delta == 0 {
        // implied by the flag
    } else if delta > -256 && delta < 256 {
        data.put_u8(delta.unsigned_abs() as u8);
    } else {
        data.put_i16(delta as i16);
    }
}

/// A simple glyph record with no instructions. Points are absolute `(x, y, on_curve)`.
pub fn simple_glyph(contours: &[&[(i16, i16, bool)]]) -> Vec<u8> {
    let points: Vec<(i32, i32, bool)> = contours
        .iter()
        .flat_map(|contour| contour.iter())
        .map(|&(x, y, on_curve)| (x as i32, y as i32, on_curve))
        .collect();

    let mut data = Vec::new();
    data.put_i16(contours.len() as i16);
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);
    for value in [x_min, y_min, x_max, y_max] {
        data.put_i16(value as i16);
    }

    let mut end_point = 0;
    for contour in contours {
        end_point += contour.len();
        data.put_u16(end_point as u16 - 1);
    }
    data.put_u16(0); // instructionLength

    // flags, run-length encoded
    let mut last: Option<(u8, u8)> = None;
    let (mut last_x, mut last_y) = (0, 0);
    for &(x, y, on_curve) in &points {
        let mut flag = if on_curve { GLYF_ON_CURVE } else { 0 };
        flag |= coordinate_flag(x - last_x, GLYF_X_SHORT, GLYF_THIS_X_IS_SAME);
        flag |= coordinate_flag(y - last_y, GLYF_Y_SHORT, GLYF_THIS_Y_IS_SAME);
        (last_x, last_y) = (x, y);

        last = match last {
            Some((last_flag, repeat)) if last_flag == flag && repeat < 255 => {
                Some((flag, repeat + 1))
            }
            Some(run) => {
                put_flag_run(&mut data, run);
                Some((flag, 0))
            }
            None => Some((flag, 0)),
        };
    }
    if let Some(run) = last {
        put_flag_run(&mut data, run);
    }

    let mut last_x = 0;
    for &(x, _, _) in &points {
        put_coordinate(&mut data, x - last_x);
        last_x = x;
    }
    let mut last_y = 0;
    for &(_, y, _) in &points {
        put_coordinate(&mut data, y - last_y);
        last_y = y;
    }
    data
}

fn put_flag_run(data: &mut Vec<u8>, (flag, repeat): (u8, u8)) {
    if repeat > 0 {
        data.put_u8(flag | GLYF_REPEAT);
        data.put_u8(repeat);
    } else {
        data.put_u8(flag);
    }
}

const ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
const ARGS_ARE_XY_VALUES: u16 = 1 << 1;
const WE_HAVE_A_SCALE: u16 = 1 << 3;
const MORE_COMPONENTS: u16 = 1 << 5;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
const WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;

#[derive(Copy, Clone)]
enum TransformSpec {
    Identity,
    Scale(i16),
    XyScale(i16, i16),
    TwoByTwo([i16; 4]),
}

/// One component of a [`composite_glyph`]. Transform values are raw F2Dot14 bits.
#[derive(Copy, Clone)]
pub struct ComponentSpec {
    glyph_id: u16,
    anchor: Anchor,
    flags: u16,
    transform: TransformSpec,
}

impl ComponentSpec {
    pub fn offset(glyph_id: u16, dx: i32, dy: i32) -> Self {
        Self {
            glyph_id,
            anchor: Anchor::Offset { dx, dy },
            flags: 0,
            transform: TransformSpec::Identity,
        }
    }

    pub fn points(glyph_id: u16, base: u16, component: u16) -> Self {
        Self {
            glyph_id,
            anchor: Anchor::Points { base, component },
            flags: 0,
            transform: TransformSpec::Identity,
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }

    pub fn scale(mut self, scale: i16) -> Self {
        self.transform = TransformSpec::Scale(scale);
        self
    }

    pub fn xy_scale(mut self, x_scale: i16, y_scale: i16) -> Self {
        self.transform = TransformSpec::XyScale(x_scale, y_scale);
        self
    }

    pub fn two_by_two(mut self, matrix: [i16; 4]) -> Self {
        self.transform = TransformSpec::TwoByTwo(matrix);
        self
    }
}

/// A composite glyph record with a zero bounding box and no instructions.
pub fn composite_glyph(components: &[ComponentSpec]) -> Vec<u8> {
    let mut data = Vec::new();
    data.put_i16(-1);
    data.put_bytes(0, 8);

    for (index, component) in components.iter().enumerate() {
        let mut flags = component.flags;
        if index + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        let (arg1, arg2, words) = match component.anchor {
            Anchor::Offset { dx, dy } => {
                flags |= ARGS_ARE_XY_VALUES;
                let fits = |v: i32| i8::try_from(v).is_ok();
                (dx, dy, !(fits(dx) && fits(dy)))
            }
            Anchor::Points { base, component } => {
                (base as i32, component as i32, base > 255 || component > 255)
            }
        };
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        flags |= match component.transform {
            TransformSpec::Identity => 0,
            TransformSpec::Scale(_) => WE_HAVE_A_SCALE,
            TransformSpec::XyScale(..) => WE_HAVE_AN_X_AND_Y_SCALE,
            TransformSpec::TwoByTwo(_) => WE_HAVE_A_TWO_BY_TWO,
        };

        data.put_u16(flags);
        data.put_u16(component.glyph_id);
        if words {
            data.put_u16(arg1 as u16);
            data.put_u16(arg2 as u16);
        } else {
            data.put_u8(arg1 as u8);
            data.put_u8(arg2 as u8);
        }
        match component.transform {
            TransformSpec::Identity => {}
            TransformSpec::Scale(scale) => data.put_i16(scale),
            TransformSpec::XyScale(x_scale, y_scale) => {
                data.put_i16(x_scale);
                data.put_i16(y_scale);
            }
            TransformSpec::TwoByTwo(matrix) => {
                for value in matrix {
                    data.put_i16(value);
                }
            }
        }
    }
    data
}

/// A `glyf` table and the matching `loca`
#[derive(Default)]
pub struct GlyfBuilder {
    glyphs: Vec<Vec<u8>>,
}

impl GlyfBuilder {
    pub fn glyph(mut self, record: &[u8]) -> Self {
        self.glyphs.push(record.to_vec());
        self
    }

    /// Returns `(glyf, loca)`. Records are padded to 4 bytes for long `loca`, 2 for short.
    pub fn build(&self, long: bool) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Vec::new();
        let mut offsets = vec![0];
        for record in &self.glyphs {
            glyf.put_slice(record);
            pad_to(&mut glyf, if long { 4 } else { 2 });
            offsets.push(glyf.len() as u32);
        }
        (glyf, loca_table(&offsets, long))
    }
}

// -----------------------------------------------------------------------------
// name
// -----------------------------------------------------------------------------

/// A format 0 `name` table with strings stored in record order
#[derive(Default)]
pub struct NameBuilder {
    records: Vec<(u16, u16, u16, NameId, Vec<u8>)>,
}

impl NameBuilder {
    /// Add a Windows platform record, encoded as UTF-16BE.
    pub fn windows(
        mut self,
        encoding_id: u16,
        language_id: u16,
        name_id: NameId,
        value: &str,
    ) -> Self {
        let bytes = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        self.records.push((3, encoding_id, language_id, name_id, bytes));
        self
    }

    /// Add a Macintosh platform record, one byte per char.
    pub fn mac(
        mut self,
        encoding_id: u16,
        language_id: u16,
        name_id: NameId,
        value: &str,
    ) -> Self {
        let bytes = value.chars().map(|c| c as u8).collect();
        self.records.push((1, encoding_id, language_id, name_id, bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let count = self.records.len();
        let mut data = Vec::new();
        data.put_u16(0);
        data.put_u16(count as u16);
        data.put_u16((6 + 12 * count) as u16);

        let mut offset = 0;
        for (platform_id, encoding_id, language_id, name_id, bytes) in &self.records {
            data.put_u16(*platform_id);
            data.put_u16(*encoding_id);
            data.put_u16(*language_id);
            data.put_u16(name_id.to_u16());
            data.put_u16(bytes.len() as u16);
            data.put_u16(offset as u16);
            offset += bytes.len();
        }
        for (.., bytes) in &self.records {
            data.put_slice(bytes);
        }
        data
    }
}

// -----------------------------------------------------------------------------
// cmap
// -----------------------------------------------------------------------------

/// One format 4 segment
pub struct Segment {
    start: u16,
    end: u16,
    delta: u16,
    glyphs: Option<Vec<u16>>,
}

impl Segment {
    /// Maps `start..=end` to `codepoint + delta`.
    pub fn delta(start: u16, end: u16, delta: u16) -> Self {
        Self {
            start,
            end,
            delta,
            glyphs: None,
        }
    }

    /// Maps consecutive codepoints from `start` through the glyph id array.
    pub fn glyphs(start: u16, glyphs: &[u16]) -> Self {
        Self {
            start,
            end: start + glyphs.len() as u16 - 1,
            delta: 0,
            glyphs: Some(glyphs.to_vec()),
        }
    }
}

pub fn cmap4_subtable(segments: &[Segment]) -> Vec<u8> {
    let seg_count = segments.len();
    let glyph_count: usize = segments
        .iter()
        .filter_map(|segment| segment.glyphs.as_ref())
        .map(Vec::len)
        .sum();
    let length = 16 + 8 * seg_count + 2 * glyph_count;
    let (search_range, entry_selector, range_shift) = binary_search_params(seg_count as u16, 2);

    let mut data = Vec::new();
    data.put_u16(4);
    data.put_u16(length as u16);
    data.put_u16(0); // language
    data.put_u16(2 * seg_count as u16);
    data.put_u16(search_range);
    data.put_u16(entry_selector);
    data.put_u16(range_shift);
    for segment in segments {
        data.put_u16(segment.end);
    }
    data.put_u16(0); // reservedPad
    for segment in segments {
        data.put_u16(segment.start);
    }
    for segment in segments {
        data.put_u16(segment.delta);
    }
    // idRangeOffset counts from its own position to the segment's first glyph
    let mut glyph_index = 0;
    for (i, segment) in segments.iter().enumerate() {
        match &segment.glyphs {
            Some(glyphs) => {
                data.put_u16((2 * (seg_count - i) + 2 * glyph_index) as u16);
                glyph_index += glyphs.len();
            }
            None => data.put_u16(0),
        }
    }
    for glyphs in segments.iter().filter_map(|segment| segment.glyphs.as_ref()) {
        for glyph in glyphs {
            data.put_u16(*glyph);
        }
    }
    data
}

pub fn cmap12_subtable(groups: &[SequentialMapGroup]) -> Vec<u8> {
    let mut data = Vec::new();
    data.put_u16(12);
    data.put_u16(0);
    data.put_u32((16 + 12 * groups.len()) as u32);
    data.put_u32(0); // language
    data.put_u32(groups.len() as u32);
    for group in groups {
        data.put_u32(group.start_char_code);
        data.put_u32(group.end_char_code);
        data.put_u32(group.start_glyph_id);
    }
    data
}

/// A `cmap` with subtables stored in the order they were added
#[derive(Default)]
pub struct CmapBuilder {
    subtables: Vec<(u16, u16, Vec<u8>)>,
}

impl CmapBuilder {
    pub fn subtable(mut self, platform_id: u16, encoding_id: u16, subtable: Vec<u8>) -> Self {
        self.subtables.push((platform_id, encoding_id, subtable));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.put_u16(0);
        data.put_u16(self.subtables.len() as u16);
        let mut offset = 4 + 8 * self.subtables.len();
        for (platform_id, encoding_id, subtable) in &self.subtables {
            data.put_u16(*platform_id);
            data.put_u16(*encoding_id);
            data.put_u32(offset as u32);
            offset += subtable.len();
        }
        for (.., subtable) in &self.subtables {
            data.put_slice(subtable);
        }
        data
    }
}
