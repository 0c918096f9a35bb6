//! The sfnt container: offset table, table directory and collection header

pub mod check;
pub mod collection;
pub mod header;

pub use check::check_table;
pub use collection::CollectionHeader;
pub use header::{
    OffsetTable, SFNT_ENTRY_SIZE, SFNT_HEADER_SIZE, TableDirectory, TableRecord, check_header,
    header_info, table_dir_info, table_info,
};
