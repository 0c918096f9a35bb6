//! A whole font, with its tables located and checked once up front

use font_types::{NameId, Tag};

use crate::error::{DecodeError, bail_if};
use crate::sfnt::{CollectionHeader, TableDirectory, TableRecord, check_table};
use crate::table_tags::{
    CMAP, GLYF, HEAD, HHEA, HMTX, KNOWN_TABLE_TAGS, LOCA, MAXP, NAME, OS2, POST,
};
use crate::tables::cmap::Cmap;
use crate::tables::glyf::GlyphOutliner;
use crate::tables::head::Head;
use crate::tables::hhea::Hhea;
use crate::tables::hmtx::{HMetric, Hmtx};
use crate::tables::loca::Loca;
use crate::tables::maxp::Maxp;
use crate::tables::name::{
    ENCODING_WINDOWS_UNICODE_BMP, LANGUAGE_EN_US, NameRecord, NameTable, PLATFORM_WINDOWS,
};
use crate::tables::os2::Os2;
use crate::tables::post::Post;

/// A TrueType font borrowed from a file buffer.
///
/// `head` and `maxp` are required. Other tables are decoded on request and report
/// `DecodeError::NotFound` when the font lacks them.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: &'a [u8],
    directory: TableDirectory,
    head: Head,
    maxp: Maxp,
}

impl<'a> FontRef<'a> {
    /// Open a font file. For collections this is the first font.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        if CollectionHeader::is_collection(data) {
            return Self::from_collection(data, 0);
        }
        Self::from_offset(data, 0)
    }

    /// Open the `index`th font of a TrueType Collection.
    pub fn from_collection(data: &'a [u8], index: usize) -> Result<Self, DecodeError> {
        let header = CollectionHeader::parse(data)?;
        Self::from_offset(data, header.font_offset(index)?)
    }

    fn from_offset(data: &'a [u8], offset: usize) -> Result<Self, DecodeError> {
        let directory = TableDirectory::parse(data, offset)?;
        for record in directory.iter() {
            if !KNOWN_TABLE_TAGS.contains(&record.tag) {
                continue;
            }
            let table = record.data(data)?;
            if !check_table(record.tag, table) {
                log::debug!("table {} failed its structural check", record.tag);
                return Err(DecodeError::UnsupportedFormat);
            }
        }

        let table = |tag: Tag| -> Result<&'a [u8], DecodeError> {
            directory
                .find(tag)
                .ok_or(DecodeError::NotFound)?
                .data(data)
        };
        let head = Head::parse(table(HEAD)?)?;
        let maxp = Maxp::parse(table(MAXP)?)?;

        Ok(Self {
            data,
            directory,
            head,
            maxp,
        })
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    /// Raw bytes of the table `tag`.
    pub fn table_data(&self, tag: Tag) -> Result<&'a [u8], DecodeError> {
        self.table_record(tag)?.data(self.data)
    }

    fn table_record(&self, tag: Tag) -> Result<&TableRecord, DecodeError> {
        self.directory.find(tag).ok_or(DecodeError::NotFound)
    }

    /// Check every directory checksum against the table contents.
    pub fn checksums_valid(&self) -> Result<bool, DecodeError> {
        for record in self.directory.iter() {
            if !record.verify_checksum(self.data)? {
                log::debug!("checksum mismatch in {}", record.tag);
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn maxp(&self) -> &Maxp {
        &self.maxp
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }

    pub fn hhea(&self) -> Result<Hhea, DecodeError> {
        Hhea::parse(self.table_data(HHEA)?)
    }

    pub fn os2(&self) -> Result<Os2, DecodeError> {
        Os2::parse(self.table_data(OS2)?)
    }

    pub fn cmap(&self) -> Result<Cmap<'a>, DecodeError> {
        Cmap::new(self.table_data(CMAP)?)
    }

    pub fn name(&self) -> Result<NameTable<'a>, DecodeError> {
        NameTable::new(self.table_data(NAME)?)
    }

    pub fn post(&self) -> Result<Post<'a>, DecodeError> {
        Post::new(self.table_data(POST)?, &self.maxp)
    }

    pub fn hmtx(&self) -> Result<Hmtx<'a>, DecodeError> {
        Hmtx::new(self.table_data(HMTX)?, self.hhea()?.number_of_h_metrics)
    }

    pub fn loca(&self) -> Result<Loca<'a>, DecodeError> {
        Ok(Loca::new(self.table_data(LOCA)?, &self.head))
    }

    /// Outline decoder over `glyf` and `loca`, limited by `maxp`.
    pub fn outliner(&self) -> Result<GlyphOutliner<'a>, DecodeError> {
        let loca = self.table_data(LOCA)?;
        let glyf = self.table_data(GLYF)?;
        let outliner = GlyphOutliner::new(glyf, loca, &self.head, &self.maxp);
        if outliner.num_glyphs() != self.maxp.num_glyphs as usize {
            log::warn!(
                "loca covers {} glyphs, maxp declares {}",
                outliner.num_glyphs(),
                self.maxp.num_glyphs
            );
        }
        Ok(outliner)
    }

    /// Glyph for a character through the best Unicode cmap subtable. 0 if unmapped.
    pub fn map_char(&self, c: char) -> Result<u16, DecodeError> {
        self.cmap()?.unicode_subtable()?.lookup(c as u32)
    }

    /// Glyph id for a Postscript glyph name.
    pub fn glyph_by_name(&self, name: &str) -> Result<u16, DecodeError> {
        self.post()?.lookup(name)
    }

    pub fn hor_metrics(&self, glyph_id: u16) -> Result<HMetric, DecodeError> {
        bail_if!(
            glyph_id >= self.maxp.num_glyphs,
            DecodeError::InvalidGlyphId
        );
        self.hmtx()?.metrics(glyph_id)
    }

    /// US English family name, from the Unicode records or else the Symbol ones.
    pub fn family_name(&self) -> Result<String, DecodeError> {
        self.windows_name(NameTable::unicode_family_name, NameTable::symbol_family_name)
    }

    /// US English full name, from the Unicode records or else the Symbol ones.
    pub fn full_name(&self) -> Result<String, DecodeError> {
        self.windows_name(NameTable::unicode_full_name, NameTable::symbol_full_name)
    }

    fn windows_name(
        &self,
        unicode: fn(&NameTable<'a>) -> Result<NameRecord, DecodeError>,
        symbol: fn(&NameTable<'a>) -> Result<NameRecord, DecodeError>,
    ) -> Result<String, DecodeError> {
        let name = self.name()?;
        let record = match unicode(&name) {
            Err(DecodeError::NotFound) => symbol(&name)?,
            result => result?,
        };
        name.string(&record)
    }

    /// Any string for `name_id` in the Windows Unicode records, preferring US English.
    pub fn name_string(&self, name_id: NameId) -> Result<String, DecodeError> {
        let name = self.name()?;
        let mut fallback = None;
        for record in name.records() {
            let record = record?;
            if record.name_id != name_id
                || record.platform_id != PLATFORM_WINDOWS
                || record.encoding_id != ENCODING_WINDOWS_UNICODE_BMP
            {
                continue;
            }
            if record.language_id == LANGUAGE_EN_US {
                return name.string(&record);
            }
            fallback.get_or_insert(record);
        }
        match fallback {
            Some(record) => name.string(&record),
            None => Err(DecodeError::NotFound),
        }
    }

    /// Bold flag from OS/2 `fsSelection`, or `head.macStyle` when there is no OS/2 table.
    pub fn is_bold(&self) -> Result<bool, DecodeError> {
        match self.os2() {
            Ok(os2) => Ok(os2.is_bold()),
            Err(DecodeError::NotFound) => Ok(self.head.is_bold()),
            Err(err) => Err(err),
        }
    }

    /// Italic flag from OS/2 `fsSelection`, or `head.macStyle` when there is no OS/2 table.
    pub fn is_italic(&self) -> Result<bool, DecodeError> {
        match self.os2() {
            Ok(os2) => Ok(os2.is_italic()),
            Err(DecodeError::NotFound) => Ok(self.head.is_italic()),
            Err(err) => Err(err),
        }
    }
}
