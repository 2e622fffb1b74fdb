mod data_types;
mod font_file;
pub(crate) mod parse;
mod parse_gpos;
pub(crate) mod table;

pub use data_types::*;
pub use font_file::FontTables;
pub use table::*;
