//! The [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table
//!
//! Only the two subtable formats needed for Unicode fonts are decoded: format 4 (segment mapping
//! to delta values, BMP only) and format 12 (segmented coverage, full Unicode range).

use bytes::Buf;

use crate::buffer::TableData;
use crate::error::{DecodeError, bail_if, bail_with_msg_if};

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_WINDOWS: u16 = 3;
pub const ENCODING_WINDOWS_UNICODE_BMP: u16 = 1;
pub const ENCODING_WINDOWS_UNICODE_FULL: u16 = 10;

/// Returned by [`Cmap4::next_codepoint`] once there are no further codepoints
pub const CMAP4_END: u32 = 0xFFFF;
/// Returned by [`Cmap12::next_codepoint`] once there are no further codepoints
pub const CMAP12_END: u32 = 0x10FFFF;

const ENCODING_RECORD_SIZE: usize = 8;

/// A platform/encoding record of the cmap header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Offset of the subtable from the start of the cmap table
    pub offset: u32,
}

#[derive(Copy, Clone)]
pub struct Cmap<'a> {
    data: TableData<'a>,
    num_tables: u16,
}

impl<'a> Cmap<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let version = input.try_get_u16()?;
        let num_tables = input.try_get_u16()?;
        bail_if!(version != 0, DecodeError::UnsupportedFormat);

        let data = TableData::new(data);
        data.check_array(4, num_tables as usize, ENCODING_RECORD_SIZE)?;
        Ok(Self { data, num_tables })
    }

    pub fn encoding_records(&self) -> impl Iterator<Item = EncodingRecord> + 'a {
        let mut input = &self.data.as_bytes()[4..];
        // Record array was bounds checked in `new`.
        (0..self.num_tables).map_while(move |_| {
            Some(EncodingRecord {
                platform_id: input.try_get_u16().ok()?,
                encoding_id: input.try_get_u16().ok()?,
                offset: input.try_get_u32().ok()?,
            })
        })
    }

    /// Find the subtable for a platform and encoding.
    ///
    /// With `encoding_id` of `None` the first subtable for the platform is returned. The returned
    /// bytes run from the start of the subtable to the end of the cmap table.
    pub fn find_subtable(
        &self,
        platform_id: u16,
        encoding_id: Option<u16>,
    ) -> Result<&'a [u8], DecodeError> {
        let record = self
            .encoding_records()
            .find(|record| {
                record.platform_id == platform_id
                    && encoding_id.is_none_or(|encoding_id| record.encoding_id == encoding_id)
            })
            .ok_or(DecodeError::NotFound)?;
        Ok(self.data.split_off(record.offset as usize)?.as_bytes())
    }

    /// Find and decode the subtable for a platform and encoding.
    pub fn subtable(
        &self,
        platform_id: u16,
        encoding_id: Option<u16>,
    ) -> Result<Subtable<'a>, DecodeError> {
        Subtable::new(self.find_subtable(platform_id, encoding_id)?)
    }

    /// The best available Unicode subtable: Windows full repertoire, then Windows BMP, then any
    /// Unicode platform subtable.
    pub fn unicode_subtable(&self) -> Result<Subtable<'a>, DecodeError> {
        let candidates = [
            (PLATFORM_WINDOWS, Some(ENCODING_WINDOWS_UNICODE_FULL)),
            (PLATFORM_WINDOWS, Some(ENCODING_WINDOWS_UNICODE_BMP)),
            (PLATFORM_UNICODE, None),
        ];
        for (platform_id, encoding_id) in candidates {
            match self.subtable(platform_id, encoding_id) {
                Err(DecodeError::NotFound) | Err(DecodeError::UnsupportedFormat) => continue,
                result => return result,
            }
        }
        Err(DecodeError::NotFound)
    }
}

/// Find the subtable for `platform_id` and `encoding_id` within raw cmap bytes.
pub fn find_cmap_subtable(
    cmap: &[u8],
    platform_id: u16,
    encoding_id: Option<u16>,
) -> Result<&[u8], DecodeError> {
    Cmap::new(cmap)?.find_subtable(platform_id, encoding_id)
}

/// A decoded cmap subtable of a supported format
#[derive(Copy, Clone)]
pub enum Subtable<'a> {
    Format4(Cmap4<'a>),
    Format12(Cmap12<'a>),
}

impl<'a> Subtable<'a> {
    pub fn new(subtable: &'a [u8]) -> Result<Self, DecodeError> {
        let format = TableData::new(subtable).read_u16(0)?;
        match format {
            4 => Ok(Subtable::Format4(Cmap4::new(subtable)?)),
            12 => Ok(Subtable::Format12(Cmap12::new(subtable)?)),
            _ => {
                log::debug!("unsupported cmap subtable format {format}");
                Err(DecodeError::UnsupportedFormat)
            }
        }
    }

    /// Glyph id for `codepoint`, 0 if unmapped.
    pub fn lookup(&self, codepoint: u32) -> Result<u16, DecodeError> {
        match self {
            Subtable::Format4(cmap4) => cmap4.lookup(codepoint),
            Subtable::Format12(cmap12) => cmap12.lookup(codepoint),
        }
    }

    /// The next mapped codepoint above `prev`; see the per-format methods.
    pub fn next_codepoint(&self, prev: u32, range_key: &mut usize) -> Result<u32, DecodeError> {
        match self {
            Subtable::Format4(cmap4) => cmap4.next_codepoint(prev, range_key),
            Subtable::Format12(cmap12) => cmap12.next_codepoint(prev, range_key),
        }
    }

    /// Value `next_codepoint` returns once the subtable is exhausted
    pub fn end(&self) -> u32 {
        match self {
            Subtable::Format4(_) => CMAP4_END,
            Subtable::Format12(_) => CMAP12_END,
        }
    }
}

// -----------------------------------------------------------------------------
// Format 4
// -----------------------------------------------------------------------------

pub fn check_cmap4_subtable(subtable: &[u8]) -> bool {
    TableData::new(subtable).read_u16(0) == Ok(4)
}

const CMAP4_END_CODES: usize = 14;

/// Format 4: segment mapping to delta values
#[derive(Copy, Clone)]
pub struct Cmap4<'a> {
    data: TableData<'a>,
    seg_count: usize,
}

impl<'a> Cmap4<'a> {
    pub fn new(subtable: &'a [u8]) -> Result<Self, DecodeError> {
        let data = TableData::new(subtable);
        bail_if!(data.read_u16(0)? != 4, DecodeError::UnsupportedFormat);
        let seg_count_x2 = data.read_u16(6)? as usize;
        bail_with_msg_if!(
            seg_count_x2 % 2 != 0,
            DecodeError::Malformed,
            "odd segCountX2 {}",
            seg_count_x2
        );
        let seg_count = seg_count_x2 / 2;
        // endCode, reservedPad, startCode, idDelta, idRangeOffset
        data.check_array(CMAP4_END_CODES, 4 * seg_count + 1, 2)?;
        Ok(Self { data, seg_count })
    }

    pub fn seg_count(&self) -> usize {
        self.seg_count
    }

    fn end_code(&self, segment: usize) -> Result<u16, DecodeError> {
        self.data.read_u16(CMAP4_END_CODES + 2 * segment)
    }

    fn start_code(&self, segment: usize) -> Result<u16, DecodeError> {
        self.data
            .read_u16(self.start_codes_offset() + 2 * segment)
    }

    fn start_codes_offset(&self) -> usize {
        CMAP4_END_CODES + 2 * self.seg_count + 2
    }

    fn id_deltas_offset(&self) -> usize {
        self.start_codes_offset() + 2 * self.seg_count
    }

    fn id_range_offsets_offset(&self) -> usize {
        self.id_deltas_offset() + 2 * self.seg_count
    }

    /// Index of the first segment whose end code is >= `codepoint`, or `seg_count` if none.
    fn find_segment(&self, codepoint: u16) -> Result<usize, DecodeError> {
        let mut lo = 0;
        let mut hi = self.seg_count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.end_code(mid)? < codepoint {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }

    /// Resolve `codepoint`, known to lie within `segment`, to a glyph id.
    fn segment_glyph(
        &self,
        segment: usize,
        start_code: u16,
        codepoint: u16,
    ) -> Result<u16, DecodeError> {
        let delta = self.data.read_u16(self.id_deltas_offset() + 2 * segment)?;
        let range_offset_pos = self.id_range_offsets_offset() + 2 * segment;
        let range_offset = self.data.read_u16(range_offset_pos)? as usize;
        if range_offset == 0 {
            return Ok(codepoint.wrapping_add(delta));
        }
        // idRangeOffset is relative to its own position in the table
        let glyph_pos =
            range_offset_pos + range_offset + 2 * (codepoint - start_code) as usize;
        let glyph = self.data.read_u16(glyph_pos)?;
        if glyph == 0 {
            return Ok(0);
        }
        Ok(glyph.wrapping_add(delta))
    }

    /// Glyph id for `codepoint`, 0 if unmapped.
    pub fn lookup(&self, codepoint: u32) -> Result<u16, DecodeError> {
        let Ok(codepoint) = u16::try_from(codepoint) else {
            return Ok(0);
        };
        let segment = self.find_segment(codepoint)?;
        if segment >= self.seg_count {
            return Ok(0);
        }
        let start_code = self.start_code(segment)?;
        if codepoint < start_code {
            return Ok(0);
        }
        self.segment_glyph(segment, start_code, codepoint)
    }

    /// The smallest mapped codepoint greater than `prev`, or [`CMAP4_END`].
    ///
    /// Pass `prev` of 0 to get the first codepoint. Codepoint 0 itself is never returned, so
    /// check it with [`Cmap4::lookup`] first; [`Cmap4::iter`] does this. `range_key` remembers
    /// the segment the last result came from; start it at 0 and pass it back unchanged to avoid
    /// repeating the segment search on every call.
    pub fn next_codepoint(&self, prev: u32, range_key: &mut usize) -> Result<u32, DecodeError> {
        if prev >= CMAP4_END - 1 {
            return Ok(CMAP4_END);
        }
        let first = (prev + 1) as u16;

        let mut segment = if *range_key < self.seg_count
            && self.start_code(*range_key)? <= first
            && first <= self.end_code(*range_key)?
        {
            *range_key
        } else {
            self.find_segment(first)?
        };

        while segment < self.seg_count {
            let start_code = self.start_code(segment)?;
            let end_code = self.end_code(segment)?;
            if end_code >= first {
                for codepoint in start_code.max(first)..=end_code {
                    if codepoint as u32 >= CMAP4_END {
                        break;
                    }
                    if self.segment_glyph(segment, start_code, codepoint)? != 0 {
                        *range_key = segment;
                        return Ok(codepoint as u32);
                    }
                }
            }
            segment += 1;
        }
        Ok(CMAP4_END)
    }

    /// Iterate all mapped (codepoint, glyph id) pairs in codepoint order.
    pub fn iter(&self) -> CodepointIter<'a> {
        CodepointIter::new(Subtable::Format4(*self))
    }
}

// -----------------------------------------------------------------------------
// Format 12
// -----------------------------------------------------------------------------

pub fn check_cmap12_subtable(subtable: &[u8]) -> bool {
    TableData::new(subtable).read_u16(0) == Ok(12)
}

const CMAP12_GROUPS: usize = 16;
const CMAP12_GROUP_SIZE: usize = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl SequentialMapGroup {
    fn contains(&self, codepoint: u32) -> bool {
        self.start_char_code <= codepoint && codepoint <= self.end_char_code
    }

    /// Glyph for a codepoint inside the group. Ids past 0xFFFF are malformed.
    fn glyph(&self, codepoint: u32) -> Result<u16, DecodeError> {
        let glyph_id = self
            .start_glyph_id
            .checked_add(codepoint - self.start_char_code)
            .and_then(|glyph_id| u16::try_from(glyph_id).ok());
        match glyph_id {
            Some(glyph_id) => Ok(glyph_id),
            None => {
                log::debug!("cmap12 glyph id for {codepoint:#x} does not fit in 16 bits");
                Err(DecodeError::Malformed)
            }
        }
    }
}

/// Format 12: segmented coverage
#[derive(Copy, Clone)]
pub struct Cmap12<'a> {
    data: TableData<'a>,
    num_groups: usize,
}

impl<'a> Cmap12<'a> {
    pub fn new(subtable: &'a [u8]) -> Result<Self, DecodeError> {
        let data = TableData::new(subtable);
        bail_if!(data.read_u16(0)? != 12, DecodeError::UnsupportedFormat);
        let num_groups = data.read_u32(12)? as usize;
        data.check_array(CMAP12_GROUPS, num_groups, CMAP12_GROUP_SIZE)?;
        Ok(Self { data, num_groups })
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn group(&self, index: usize) -> Result<SequentialMapGroup, DecodeError> {
        bail_if!(index >= self.num_groups, DecodeError::NotFound);
        let mut input = self
            .data
            .cursor(CMAP12_GROUPS + index * CMAP12_GROUP_SIZE)?;
        Ok(SequentialMapGroup {
            start_char_code: input.try_get_u32()?,
            end_char_code: input.try_get_u32()?,
            start_glyph_id: input.try_get_u32()?,
        })
    }

    /// Glyph id for `codepoint`, 0 if unmapped.
    pub fn lookup(&self, codepoint: u32) -> Result<u16, DecodeError> {
        for index in 0..self.num_groups {
            let group = self.group(index)?;
            if group.contains(codepoint) {
                return group.glyph(codepoint);
            }
        }
        Ok(0)
    }

    /// The smallest mapped codepoint greater than `prev`, or [`CMAP12_END`].
    ///
    /// Same contract as [`Cmap4::next_codepoint`], with `range_key` holding a group index. As
    /// there, codepoint 0 is never returned and has to be checked with [`Cmap12::lookup`].
    /// Fails with `Malformed` when a group maps past glyph id 0xFFFF.
    pub fn next_codepoint(&self, prev: u32, range_key: &mut usize) -> Result<u32, DecodeError> {
        if prev >= CMAP12_END - 1 {
            return Ok(CMAP12_END);
        }
        let first = prev + 1;

        // groups are sorted, so resume from the hint when it is not past `first`
        let mut index = match self.group(*range_key) {
            Ok(group) if group.start_char_code <= first => *range_key,
            _ => 0,
        };
        while index < self.num_groups {
            let group = self.group(index)?;
            if group.end_char_code >= first {
                let mut codepoint = group.start_char_code.max(first);
                while codepoint <= group.end_char_code && codepoint < CMAP12_END {
                    if group.glyph(codepoint)? != 0 {
                        *range_key = index;
                        return Ok(codepoint);
                    }
                    codepoint += 1;
                }
            }
            index += 1;
        }
        Ok(CMAP12_END)
    }

    /// Iterate all mapped (codepoint, glyph id) pairs in codepoint order.
    pub fn iter(&self) -> CodepointIter<'a> {
        CodepointIter::new(Subtable::Format12(*self))
    }
}

/// Iterator over the mapped (codepoint, glyph id) pairs of a subtable
///
/// A malformed subtable yields one error and then ends.
pub struct CodepointIter<'a> {
    subtable: Subtable<'a>,
    prev: Option<u32>,
    range_key: usize,
    done: bool,
}

impl<'a> CodepointIter<'a> {
    fn new(subtable: Subtable<'a>) -> Self {
        Self {
            subtable,
            prev: None,
            range_key: 0,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<(u32, u16)>, DecodeError> {
        let codepoint = match self.prev {
            // codepoint 0 can't be reached through `next_codepoint`
            None => match self.subtable.lookup(0)? {
                0 => self.subtable.next_codepoint(0, &mut self.range_key)?,
                _ => 0,
            },
            Some(prev) => self.subtable.next_codepoint(prev, &mut self.range_key)?,
        };
        if codepoint >= self.subtable.end() {
            return Ok(None);
        }
        self.prev = Some(codepoint);
        Ok(Some((codepoint, self.subtable.lookup(codepoint)?)))
    }
}

impl Iterator for CodepointIter<'_> {
    type Item = Result<(u32, u16), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
