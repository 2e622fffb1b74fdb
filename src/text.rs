use crate::{
    error::FontError,
    geometry::{Point, Rect},
    lookups::Lookups,
    shape::shape_text,
};

/// Per-glyph instance record, laid out for direct upload to a GPU buffer
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphRecord {
    /// Top left of the quad in pixels
    pub position: [f32; 2],
    /// `y` of the position the string was drawn at
    pub baseline_y: f32,
    pub font_size: f32,
    pub color: [f32; 4],
    pub size: [f32; 2],
    pub uv: [f32; 2],
    pub uv_size: [f32; 2],
    /// Viewport in CSS pixels, i.e. divided by the device pixel ratio
    pub window: [f32; 2],
}

/// What a [`GlyphBatch::text`] call drew
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShape {
    pub bounds: Rect,
    pub position: Point,
    pub font_size: f32,
}

/// Collects glyph records for one frame
#[derive(Debug)]
pub struct GlyphBatch<'a> {
    lookups: &'a Lookups,
    records: Vec<GlyphRecord>,
    viewport_width: f32,
    viewport_height: f32,
    device_pixel_ratio: f32,
    color: [f32; 4],
}

impl<'a> GlyphBatch<'a> {
    pub const CAPACITY: usize = 1000;
    pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub fn new(
        lookups: &'a Lookups,
        viewport_width: f32,
        viewport_height: f32,
        device_pixel_ratio: f32,
    ) -> Self {
        Self {
            lookups,
            records: Vec::with_capacity(Self::CAPACITY),
            viewport_width,
            viewport_height,
            device_pixel_ratio,
            color: Self::DEFAULT_COLOR,
        }
    }

    /// Color used when [`GlyphBatch::text`] is given none
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32, device_pixel_ratio: f32) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.device_pixel_ratio = device_pixel_ratio;
    }

    /// Shapes `text` and appends one record per character. Nothing is
    /// appended if the string does not shape or does not fit
    pub fn text(
        &mut self,
        text: &str,
        position: Point,
        font_size: f32,
        color: Option<[f32; 4]>,
    ) -> anyhow::Result<TextShape> {
        let shape = shape_text(self.lookups, text, font_size)?;

        if self.records.len() + shape.positions.len() > Self::CAPACITY {
            anyhow::bail!(FontError::BatchFull {
                capacity: Self::CAPACITY
            });
        }

        let color = color.unwrap_or(self.color);
        let window = [
            self.viewport_width / self.device_pixel_ratio,
            self.viewport_height / self.device_pixel_ratio,
        ];

        for ((c, offset), size) in text.chars().zip(&shape.positions).zip(&shape.sizes) {
            let uv = self
                .lookups
                .uv(c)
                .ok_or(FontError::MissingGlyph {
                    codepoint: u32::from(c),
                })?;

            self.records.push(GlyphRecord {
                position: [position.x + offset.x, position.y + offset.y],
                baseline_y: position.y,
                font_size,
                color,
                size: [size.width, size.height],
                uv: [uv.x, uv.y],
                uv_size: [uv.width, uv.height],
                window,
            });
        }

        Ok(TextShape {
            bounds: shape.bounding_rectangle,
            position,
            font_size,
        })
    }

    pub fn records(&self) -> &[GlyphRecord] {
        &self.records
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record, e.g. once the frame has been submitted
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
