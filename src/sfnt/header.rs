use std::ops::{Deref, Range};

use bytes::Buf;
use font_types::Tag;

use crate::common::compute_checksum;
use crate::error::{DecodeError, bail_if, bail_with_msg_if, usize_will_overflow};
use crate::table_tags::HEAD;

/// Size of the offset table that starts every sfnt
pub const SFNT_HEADER_SIZE: usize = 12;
/// Size of one table directory entry
pub const SFNT_ENTRY_SIZE: usize = 16;

/// sfntVersion for TrueType outlines (Fixed 1.0)
pub const SFNT_VERSION_TRUETYPE: u32 = 0x00010000;

// Directory scans stop after this many entries even if numTables claims more.
const MAX_TABLES: usize = 256;

/// Byte range of the fixed offset table within an sfnt.
pub fn header_info() -> Range<usize> {
    0..SFNT_HEADER_SIZE
}

/// The offset table at the start of an sfnt
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory>
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OffsetTable {
    /// 0x00010000 for TrueType outlines
    pub sfnt_version: u32,
    /// Number of tables in the directory
    pub num_tables: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl OffsetTable {
    pub fn parse(input: &mut impl Buf) -> Result<Self, DecodeError> {
        Ok(Self {
            sfnt_version: input.try_get_u32()?,
            num_tables: input.try_get_u16()?,
            search_range: input.try_get_u16()?,
            entry_selector: input.try_get_u16()?,
            range_shift: input.try_get_u16()?,
        })
    }
}

/// Parse the offset table at the start of `sfnt` and check its version is 1.0.
pub fn check_header(sfnt: &[u8]) -> Result<OffsetTable, DecodeError> {
    let mut input = sfnt;
    let header = OffsetTable::parse(&mut input)?;
    bail_with_msg_if!(
        header.sfnt_version != SFNT_VERSION_TRUETYPE,
        DecodeError::UnsupportedFormat,
        "unsupported sfnt version {:#010x}",
        (header.sfnt_version)
    );
    Ok(header)
}

/// Byte range of the table directory that follows `header`.
pub fn table_dir_info(header: &OffsetTable) -> Range<usize> {
    let size = SFNT_ENTRY_SIZE * header.num_tables as usize;
    SFNT_HEADER_SIZE..(SFNT_HEADER_SIZE + size)
}

/// One entry of the table directory
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    /// Offset of the table from the start of the sfnt (or collection file)
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    pub fn parse(input: &mut impl Buf) -> Result<Self, DecodeError> {
        Ok(Self {
            tag: Tag::from_u32(input.try_get_u32()?),
            checksum: input.try_get_u32()?,
            offset: input.try_get_u32()?,
            length: input.try_get_u32()?,
        })
    }

    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start.saturating_add(self.length as usize)
    }

    /// The table's bytes within the whole font file.
    pub fn data<'a>(&self, font: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        bail_if!(usize_will_overflow(
            self.offset as usize,
            self.length as usize
        ));
        font.get(self.range()).ok_or(DecodeError::Malformed)
    }

    /// Whether the checksum stored in the directory matches the table's contents.
    ///
    /// The `head` checksum is computed as though `checkSumAdjustment` were zero.
    pub fn verify_checksum(&self, font: &[u8]) -> Result<bool, DecodeError> {
        let data = self.data(font)?;
        let mut checksum = compute_checksum(data);
        if self.tag == HEAD {
            bail_if!(data.len() < 12);
            let mut adjustment = &data[8..12];
            checksum = checksum.wrapping_sub(adjustment.try_get_u32()?);
        }
        Ok(checksum == self.checksum)
    }
}

/// Find the directory entry for `tag`.
///
/// `directory` starts at the first entry; see [`table_dir_info`]. At most 256 entries are
/// scanned.
pub fn table_info(
    tag: Tag,
    header: &OffsetTable,
    directory: &[u8],
) -> Result<TableRecord, DecodeError> {
    let mut input = directory;
    let num_tables = (header.num_tables as usize).min(MAX_TABLES);
    for _ in 0..num_tables {
        let record = TableRecord::parse(&mut input)?;
        if record.tag == tag {
            return Ok(record);
        }
    }
    Err(DecodeError::NotFound)
}

/// The parsed table directory of a single font
#[derive(Clone, Debug)]
pub struct TableDirectory {
    pub header: OffsetTable,
    pub tables: Vec<TableRecord>,
}

impl Deref for TableDirectory {
    type Target = Vec<TableRecord>;
    fn deref(&self) -> &Self::Target {
        &self.tables
    }
}

impl TableDirectory {
    /// Parse the offset table and directory that start at `offset` within `font`.
    pub fn parse(font: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let sfnt = font.get(offset..).ok_or(DecodeError::Malformed)?;
        let header = check_header(sfnt)?;

        let mut input = sfnt.get(table_dir_info(&header)).ok_or(DecodeError::Malformed)?;
        let num_tables = (header.num_tables as usize).min(MAX_TABLES);
        let mut tables = Vec::with_capacity(num_tables);
        for _ in 0..num_tables {
            tables.push(TableRecord::parse(&mut input)?);
        }

        Ok(Self { header, tables })
    }

    /// Size of the offset table plus directory in bytes
    pub fn size(&self) -> usize {
        SFNT_HEADER_SIZE + SFNT_ENTRY_SIZE * self.tables.len()
    }

    pub fn find(&self, tag: Tag) -> Option<&TableRecord> {
        self.tables.iter().find(|table| table.tag == tag)
    }
}
