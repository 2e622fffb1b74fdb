use crate::geometry::{FlatOutline, Point};

/// Maximum distance, in pixels, between a curve and its flattened segments
const FLATTEN_TOLERANCE_PX: f32 = 0.2;

/// Where a glyph's box sits inside its padded atlas cell, and how font units
/// map onto cell pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellMapping {
    /// Glyph box origin in font units (`xMin`, `yMin`)
    pub x: f32,
    pub y: f32,
    /// Glyph box height in font units
    pub height: f32,
    /// Pixels per font unit
    pub scale: f32,
    pub padding: f32,
}

impl CellMapping {
    /// Font-unit position of the center of cell pixel `(px, py)`. Cell rows
    /// go down while font units go up
    pub fn to_font_units(&self, px: f32, py: f32) -> Point {
        Point::new(
            self.x + (px - self.padding) / self.scale,
            self.y + self.height - (py - self.padding) / self.scale,
        )
    }

    pub fn tolerance(&self) -> f32 {
        FLATTEN_TOLERANCE_PX / self.scale
    }
}

/// Largest side, in pixels, of a padded glyph cell
pub(crate) const MAX_CELL_SIDE: u32 = 4096;

/// Pixel size of the padded cell for a glyph box of `width x height` font
/// units, `None` if either side exceeds [`MAX_CELL_SIDE`]
pub(crate) fn cell_size(width: i32, height: i32, scale: f32, padding: u32) -> Option<(u32, u32)> {
    let side = |len: i32| {
        let inner = (len.max(0) as f32 * scale).ceil() as u64;

        u32::try_from(inner + 2 * u64::from(padding))
            .ok()
            .filter(|&side| side <= MAX_CELL_SIDE)
    };

    Some((side(width)?, side(height)?))
}

/// Signed distance field: `0.5 + d / (2 * radius)` per pixel, where `d` is the
/// pixel distance to the nearest edge, positive inside
pub(crate) fn render_sdf(
    outline: &FlatOutline,
    mapping: CellMapping,
    radius: f32,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize);

    for py in 0..height {
        for px in 0..width {
            let p = mapping.to_font_units(px as f32 + 0.5, py as f32 + 0.5);

            let value = if outline.lines().is_empty() {
                0.0
            } else {
                let distance = outline.signed_distance(p) * mapping.scale;
                0.5 + distance / (2.0 * radius)
            };

            pixels.push(to_u8(value));
        }
    }

    pixels
}

/// Plain anti-aliased mask: the fraction of nine sample points inside the
/// outline, one at the pixel center and eight around it
pub(crate) fn render_coverage(
    outline: &FlatOutline,
    mapping: CellMapping,
    width: u32,
    height: u32,
) -> Vec<u8> {
    const SUBPIXEL_STEP: f32 = 0.25;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);

    for py in 0..height {
        for px in 0..width {
            let center = (px as f32 + 0.5, py as f32 + 0.5);

            let count = [-SUBPIXEL_STEP, 0.0, SUBPIXEL_STEP]
                .into_iter()
                .flat_map(|dy| {
                    [-SUBPIXEL_STEP, 0.0, SUBPIXEL_STEP]
                        .into_iter()
                        .map(move |dx| (dx, dy))
                })
                .filter(|&(dx, dy)| {
                    outline.contains_non_zero(mapping.to_font_units(center.0 + dx, center.1 + dy))
                })
                .count();

            pixels.push(to_u8(count as f32 / 9.0));
        }
    }

    pixels
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);

    t * t * (3.0 - 2.0 * t)
}

/// Half-width of the anti-aliased band around the 0.5 iso-line when sampling
/// the atlas: sharper for large text, softer for small text
pub fn edge_width(font_size: f32, device_pixel_ratio: f32) -> f32 {
    mix(0.4, 0.1, font_size.clamp(0.0, 40.0) / 40.0) / device_pixel_ratio
}

/// Opacity of a fragment given its sampled distance-field value
pub fn sdf_alpha(distance: f32, font_size: f32, device_pixel_ratio: f32, alpha: f32) -> f32 {
    let width = edge_width(font_size, device_pixel_ratio);

    alpha * smoothstep(0.5 - width, 0.5 + width, distance)
}
