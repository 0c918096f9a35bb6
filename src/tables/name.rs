//! The [name](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table

use std::ops::Range;

use arrayvec::ArrayVec;
use bytes::Buf;
use font_types::NameId;

use crate::buffer::TableData;
use crate::error::{DecodeError, bail_if};

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_WINDOWS: u16 = 3;

pub const ENCODING_WINDOWS_SYMBOL: u16 = 0;
pub const ENCODING_WINDOWS_UNICODE_BMP: u16 = 1;

/// Windows language id for US English
pub const LANGUAGE_EN_US: u16 = 1033;

/// The most languages [`NameTable::langs_for_names`] collects
pub const MAX_LANGUAGES: usize = 128;

const NAME_HEADER_SIZE: usize = 6;
const NAME_RECORD_SIZE: usize = 12;

/// A located name string
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: NameId,
    /// Offset of the string from the start of the name table
    pub offset: usize,
    /// Length of the string in bytes
    pub length: usize,
}

impl NameRecord {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

#[derive(Copy, Clone)]
pub struct NameTable<'a> {
    data: TableData<'a>,
    format: u16,
    count: u16,
    storage_offset: usize,
}

impl<'a> NameTable<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let format = input.try_get_u16()?;
        let count = input.try_get_u16()?;
        let storage_offset = input.try_get_u16()? as usize;
        bail_if!(format > 1, DecodeError::UnsupportedFormat);
        bail_if!(storage_offset > data.len());

        let data = TableData::new(data);
        data.check_array(NAME_HEADER_SIZE, count as usize, NAME_RECORD_SIZE)?;

        Ok(Self {
            data,
            format,
            count,
            storage_offset,
        })
    }

    pub fn format(&self) -> u16 {
        self.format
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// Iterate the records in table order.
    pub fn records(&self) -> impl Iterator<Item = Result<NameRecord, DecodeError>> + 'a {
        let table = *self;
        (0..self.count as usize).map(move |index| table.record(index))
    }

    fn record(&self, index: usize) -> Result<NameRecord, DecodeError> {
        let mut input = self
            .data
            .cursor(NAME_HEADER_SIZE + index * NAME_RECORD_SIZE)?;
        let platform_id = input.try_get_u16()?;
        let encoding_id = input.try_get_u16()?;
        let language_id = input.try_get_u16()?;
        let name_id = NameId::new(input.try_get_u16()?);
        let length = input.try_get_u16()? as usize;
        let offset = self.storage_offset + input.try_get_u16()? as usize;
        Ok(NameRecord {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            offset,
            length,
        })
    }

    /// Find the first record for the given platform, encoding, language and name id.
    pub fn find(
        &self,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
        name_id: NameId,
    ) -> Result<NameRecord, DecodeError> {
        for record in self.records() {
            let record = record?;
            if record.platform_id == platform_id
                && record.encoding_id == encoding_id
                && record.language_id == language_id
                && record.name_id == name_id
            {
                return Ok(record);
            }
        }
        Err(DecodeError::NotFound)
    }

    /// Distinct language ids, in first-seen order, that have a record for the platform and
    /// encoding with any of `name_ids`.
    ///
    /// Collection stops once [`MAX_LANGUAGES`] languages have been seen.
    pub fn langs_for_names(
        &self,
        platform_id: u16,
        encoding_id: u16,
        name_ids: &[NameId],
    ) -> Result<ArrayVec<u16, MAX_LANGUAGES>, DecodeError> {
        let mut langs = ArrayVec::new();
        for record in self.records() {
            let record = record?;
            if record.platform_id != platform_id
                || record.encoding_id != encoding_id
                || !name_ids.contains(&record.name_id)
                || langs.contains(&record.language_id)
            {
                continue;
            }
            if langs.try_push(record.language_id).is_err() {
                break;
            }
        }
        Ok(langs)
    }

    /// The raw bytes of the string a record points at.
    pub fn string_bytes(&self, record: &NameRecord) -> Result<&'a [u8], DecodeError> {
        Ok(self.data.slice(record.range())?.as_bytes())
    }

    /// Decode the string a record points at.
    ///
    /// Unicode and Windows strings are UTF-16BE. Other platforms are treated as single-byte
    /// Latin-1.
    pub fn string(&self, record: &NameRecord) -> Result<String, DecodeError> {
        let bytes = self.string_bytes(record)?;
        match record.platform_id {
            PLATFORM_UNICODE | PLATFORM_WINDOWS => {
                bail_if!(bytes.len() % 2 != 0);
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                Ok(char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect())
            }
            _ => Ok(bytes.iter().map(|b| *b as char).collect()),
        }
    }

    /// US English family name from the Windows Unicode (3, 1) records
    pub fn unicode_family_name(&self) -> Result<NameRecord, DecodeError> {
        self.windows_name(ENCODING_WINDOWS_UNICODE_BMP, NameId::FAMILY_NAME)
    }

    /// US English full name from the Windows Unicode (3, 1) records
    pub fn unicode_full_name(&self) -> Result<NameRecord, DecodeError> {
        self.windows_name(ENCODING_WINDOWS_UNICODE_BMP, NameId::FULL_NAME)
    }

    /// US English family name from the Windows Symbol (3, 0) records
    pub fn symbol_family_name(&self) -> Result<NameRecord, DecodeError> {
        self.windows_name(ENCODING_WINDOWS_SYMBOL, NameId::FAMILY_NAME)
    }

    /// US English full name from the Windows Symbol (3, 0) records
    pub fn symbol_full_name(&self) -> Result<NameRecord, DecodeError> {
        self.windows_name(ENCODING_WINDOWS_SYMBOL, NameId::FULL_NAME)
    }

    fn windows_name(&self, encoding_id: u16, name_id: NameId) -> Result<NameRecord, DecodeError> {
        self.find(PLATFORM_WINDOWS, encoding_id, LANGUAGE_EN_US, name_id)
    }
}
