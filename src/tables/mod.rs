//! Decoders for the individual sfnt tables
//!
//! Every decoder works on the bytes of a single table, as located by the table directory.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
pub mod post_names;
