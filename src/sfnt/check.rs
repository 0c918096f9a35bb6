//! Minimal per-table structural checks
//!
//! These reject tables that use structural variants this crate cannot decode. Passing a check
//! does not mean the offsets inside the table are consistent; the table decoders still check
//! every read.

use font_types::Tag;

use crate::buffer::TableData;
use crate::table_tags::{CMAP, HEAD, HHEA, MAXP, NAME, OS2, POST};
use crate::tables::head::{HEAD_MAGIC_NUMBER, HEAD_TABLE_SIZE};
use crate::tables::hhea::HHEA_TABLE_SIZE;
use crate::tables::maxp::MAXP_TABLE_SIZE;
use crate::tables::os2::os2_min_size;
use crate::tables::post::{POST_HEADER_SIZE, PostVersion};

const VERSION_1_0: u32 = 0x00010000;

/// Sanity check the table `tag` whose bytes are `table`.
///
/// Always `true` for tables without a defined check.
pub fn check_table(tag: Tag, table: &[u8]) -> bool {
    let data = TableData::new(table);
    match tag {
        HEAD => {
            data.len() >= HEAD_TABLE_SIZE
                && data.read_u32(0) == Ok(VERSION_1_0)
                && data.read_u32(12) == Ok(HEAD_MAGIC_NUMBER)
        }
        HHEA => data.len() >= HHEA_TABLE_SIZE && data.read_u32(0) == Ok(VERSION_1_0),
        MAXP => data.len() >= MAXP_TABLE_SIZE && data.read_u32(0) == Ok(VERSION_1_0),
        POST => {
            data.len() >= POST_HEADER_SIZE
                && data
                    .read_u32(0)
                    .is_ok_and(|version| PostVersion::from_raw(version).is_some())
        }
        OS2 => match data.read_u16(0) {
            Ok(version) => data.len() >= os2_min_size(version),
            Err(_) => false,
        },
        CMAP => check_cmap(data),
        NAME => check_name(data),
        _ => true,
    }
}

fn check_cmap(data: TableData) -> bool {
    let (Ok(version), Ok(num_tables)) = (data.read_u16(0), data.read_u16(2)) else {
        return false;
    };
    version == 0 && data.check_array(4, num_tables as usize, 8).is_ok()
}

fn check_name(data: TableData) -> bool {
    let (Ok(format), Ok(count), Ok(storage_offset)) =
        (data.read_u16(0), data.read_u16(2), data.read_u16(4))
    else {
        return false;
    };
    (format == 0 || format == 1)
        && data.check_array(6, count as usize, 12).is_ok()
        && (storage_offset as usize) <= data.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_tags::{GLYF, LOCA};
    use crate::test_data::{HeadBuilder, HheaBuilder, MaxpBuilder};
    use bytes::BufMut;

    #[test]
    fn head() {
        let head = HeadBuilder::default().build();
        assert!(check_table(HEAD, &head));
        assert!(!check_table(HEAD, &head[..50]));

        let mut bad_magic = head.clone();
        bad_magic[12] ^= 0xff;
        assert!(!check_table(HEAD, &bad_magic));

        let mut bad_version = head;
        bad_version[1] = 2;
        assert!(!check_table(HEAD, &bad_version));
    }

    #[test]
    fn hhea_and_maxp() {
        let hhea = HheaBuilder::default().build();
        assert!(check_table(HHEA, &hhea));
        assert!(!check_table(HHEA, &hhea[..30]));

        let maxp = MaxpBuilder::default().build();
        assert!(check_table(MAXP, &maxp));

        // version 0.5 (CFF fonts) has no component limits
        let mut short = Vec::new();
        short.put_u32(0x00005000);
        short.put_u16(10);
        assert!(!check_table(MAXP, &short));
    }

    #[test]
    fn post_versions() {
        for (version, ok) in [
            (0x00010000, true),
            (0x00020000, true),
            (0x00025000, true),
            (0x00030000, true),
            (0x00040000, false),
        ] {
            let mut post = Vec::new();
            post.put_u32(version);
            post.put_bytes(0, 28);
            assert_eq!(check_table(POST, &post), ok, "version {version:#x}");
        }
        assert!(!check_table(POST, &[0, 3, 0, 0]));
    }

    #[test]
    fn os2_sizes_depend_on_version() {
        for (version, size) in [(0u16, 78usize), (1, 86), (2, 96), (3, 96), (5, 100)] {
            let mut os2 = Vec::new();
            os2.put_u16(version);
            os2.put_bytes(0, size - 2);
            assert!(check_table(OS2, &os2));
            assert!(!check_table(OS2, &os2[..size - 1]));
        }
    }

    #[test]
    fn cmap_and_name() {
        let mut cmap = Vec::new();
        cmap.put_u16(0);
        cmap.put_u16(1);
        cmap.put_bytes(0, 8);
        assert!(check_table(CMAP, &cmap));
        assert!(!check_table(CMAP, &cmap[..10]));
        cmap[1] = 1;
        assert!(!check_table(CMAP, &cmap));

        let mut name = Vec::new();
        name.put_u16(0);
        name.put_u16(1);
        name.put_u16(18);
        name.put_bytes(0, 12);
        assert!(check_table(NAME, &name));
        name[1] = 2;
        assert!(!check_table(NAME, &name));
    }

    #[test]
    fn unchecked_tables_pass() {
        assert!(check_table(GLYF, &[]));
        assert!(check_table(LOCA, &[1, 2, 3]));
    }
}
