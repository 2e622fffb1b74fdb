use std::{fs::File, io::BufWriter, path::Path as FilePath};

use crate::error::FontError;

/// Single channel, 8 bits per pixel, rows top to bottom
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasBitmap {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for AtlasBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl AtlasBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub fn value(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.buffer
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copies a `width x height` cell into the bitmap with its top left
    /// corner at `(x, y)`
    pub(crate) fn blit(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        cell: &[u8],
    ) -> anyhow::Result<()> {
        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).map_or(false, |end| end <= limit)
        };
        let len = width as usize * height as usize;

        if !fits(x, width, self.width) || !fits(y, height, self.height) || cell.len() < len {
            anyhow::bail!(FontError::OutOfBounds {
                offset: y as usize * self.width as usize + x as usize,
                len,
                buffer_len: self.buffer.len(),
            });
        }

        if len == 0 {
            return Ok(());
        }

        for (row, src) in cell.chunks_exact(width as usize).take(height as usize).enumerate() {
            let start = (y as usize + row) * self.width as usize + x as usize;
            self.buffer[start..start + width as usize].copy_from_slice(src);
        }

        Ok(())
    }

    /// White RGBA pixels carrying the field value in alpha
    pub fn to_rgba(&self) -> Vec<u8> {
        self.buffer
            .iter()
            .flat_map(|&value| [0xff, 0xff, 0xff, value])
            .collect()
    }

    pub fn write_png(&self, path: impl AsRef<FilePath>) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let w = &mut BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.buffer)?;

        Ok(())
    }
}
