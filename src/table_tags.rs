//! Font table tags

use font_types::Tag;

// Tags of the tables this crate decodes.
pub const CMAP: Tag = Tag::new(b"cmap");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const HEAD: Tag = Tag::new(b"head");
pub const HHEA: Tag = Tag::new(b"hhea");
pub const HMTX: Tag = Tag::new(b"hmtx");
pub const LOCA: Tag = Tag::new(b"loca");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const NAME: Tag = Tag::new(b"name");
pub const OS2: Tag = Tag::new(b"OS/2");
pub const POST: Tag = Tag::new(b"post");

/// Collection header tag
pub const TTCF: Tag = Tag::new(b"ttcf");

pub static KNOWN_TABLE_TAGS: [Tag; 10] = [
    CMAP, // 0
    GLYF, // 1
    HEAD, // 2
    HHEA, // 3
    HMTX, // 4
    LOCA, // 5
    MAXP, // 6
    NAME, // 7
    OS2,  // 8
    POST, // 9
];
