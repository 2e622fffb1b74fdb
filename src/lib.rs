pub mod error;
pub mod geometry;
pub mod true_type;

mod font_face;
mod lookups;
mod parse_binary;
mod render;
mod shape;
mod text;

#[cfg(test)]
mod test_font;

pub use error::{ErrorKind, FontError};
pub use font_face::FontFace;
pub use lookups::{prepare_lookups, AtlasLayout, Glyph, Lookups};
pub use render::{edge_width, render_font_atlas, sdf_alpha, AtlasBitmap, AtlasOptions};
pub use shape::{shape_text, Shape};
pub use text::{GlyphBatch, GlyphRecord, TextShape};
pub use true_type::FontTables;
