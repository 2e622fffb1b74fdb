use std::fmt;

use crate::true_type::TableTag;

/// Broad classification of [`FontError`], for callers that only care about
/// whether a load or shaping call can be retried with different input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Bounds,
    UnsupportedFormat,
    MissingGlyph,
}

#[derive(Debug)]
pub enum FontError {
    /// The first four bytes are not `0x00010000` or `true`
    InvalidSfntVersion { found: u32 },

    /// `head.magicNumber` is not `0x5F0F3CF5`
    InvalidMagicNumber { found: u32 },

    MissingTable { tag: TableTag },

    /// Structurally invalid data, e.g. a decreasing `loca` offset
    Malformed {
        table: &'static str,
        reason: &'static str,
    },

    /// A read or an offset reference escapes the buffer
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    UnsupportedFormat { table: &'static str, format: u32 },

    /// The codepoint is absent from `cmap` or was never rasterized into the atlas
    MissingGlyph { codepoint: u32 },

    /// `render_font_atlas` was called twice on the same lookups
    AtlasAlreadyRendered,

    /// A glyph batch cannot take the records of another string
    BatchFull { capacity: usize },

    /// The padded atlas cell of a glyph would exceed `max` pixels on a side
    GlyphTooLarge { codepoint: u32, max: u32 },
}

impl FontError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSfntVersion { .. }
            | Self::InvalidMagicNumber { .. }
            | Self::MissingTable { .. }
            | Self::Malformed { .. }
            | Self::AtlasAlreadyRendered => ErrorKind::Format,
            Self::OutOfBounds { .. } | Self::BatchFull { .. } | Self::GlyphTooLarge { .. } => {
                ErrorKind::Bounds
            }
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::MissingGlyph { .. } => ErrorKind::MissingGlyph,
        }
    }

    /// Classifies an error raised anywhere in this crate, `None` for foreign errors
    pub fn kind_of(err: &anyhow::Error) -> Option<ErrorKind> {
        err.downcast_ref::<FontError>().map(FontError::kind)
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSfntVersion { found } => {
                write!(f, "not a TrueType font: sfnt version {:#010x}", found)
            }
            Self::InvalidMagicNumber { found } => {
                write!(f, "invalid head magic number {:#010x}", found)
            }
            Self::MissingTable { tag } => write!(f, "missing required table {:?}", tag),
            Self::Malformed { table, reason } => write!(f, "malformed {} table: {}", table, reason),
            Self::OutOfBounds {
                offset,
                len,
                buffer_len,
            } => write!(
                f,
                "read of {} bytes at offset {} exceeds buffer of {} bytes",
                len, offset, buffer_len
            ),
            Self::UnsupportedFormat { table, format } => {
                write!(f, "unsupported {} format {}", table, format)
            }
            Self::MissingGlyph { codepoint } => match char::from_u32(*codepoint) {
                Some(c) => write!(f, "missing glyph for {:?} (U+{:04X})", c, codepoint),
                None => write!(f, "missing glyph for U+{:04X}", codepoint),
            },
            Self::AtlasAlreadyRendered => write!(f, "the atlas has already been rendered"),
            Self::BatchFull { capacity } => {
                write!(f, "glyph batch is full ({} glyphs)", capacity)
            }
            Self::GlyphTooLarge { codepoint, max } => write!(
                f,
                "glyph U+{:04X} does not fit a {}x{} atlas cell",
                codepoint, max, max
            ),
        }
    }
}

impl std::error::Error for FontError {}
