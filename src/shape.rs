use crate::{
    error::FontError,
    geometry::{BoundingBox, Point, Rect, Size},
    lookups::Lookups,
};

/// Glyph quads for one string, in pixels with y pointing down. Index `i` of
/// `positions` and `sizes` belongs to the `i`-th character
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub positions: Vec<Point>,
    pub sizes: Vec<Size>,
    pub bounding_rectangle: Rect,
}

/// Lays `text` out on a single line at `font_size` pixels per em, applying
/// pair kerning. Fails if any character has no glyph in the atlas
pub fn shape_text(lookups: &Lookups, text: &str, font_size: f32) -> anyhow::Result<Shape> {
    let scale = font_size / f32::from(lookups.units_per_em());
    let cap_height = lookups.cap_height() as f32;

    let mut positions = Vec::new();
    let mut sizes = Vec::new();
    let mut bbox = BoundingBox::new();

    let mut pen = 0.0;
    let mut previous = None;

    for c in text.chars() {
        let glyph = match lookups.glyph(c) {
            Some(glyph) if lookups.uv(c).is_some() => glyph,
            _ => anyhow::bail!(FontError::MissingGlyph {
                codepoint: u32::from(c)
            }),
        };

        if let Some(previous) = previous {
            pen += f32::from(lookups.kern(previous, c)) * scale;
        }

        let position = Point::new(
            pen + glyph.lsb as f32 * scale,
            (cap_height - (glyph.y + glyph.height) as f32) * scale,
        );
        let size = Size::new(glyph.width as f32 * scale, glyph.height as f32 * scale);

        bbox.add_point(position);
        bbox.add_point(Point::new(position.x + size.width, position.y + size.height));

        positions.push(position);
        sizes.push(size);

        pen += glyph.advance_width as f32 * scale;
        previous = Some(c);
    }

    let bounding_rectangle = if bbox.is_empty() {
        Rect::default()
    } else {
        Rect::new(bbox.min.x, bbox.min.y, bbox.width(), bbox.height())
    };

    Ok(Shape {
        positions,
        sizes,
        bounding_rectangle,
    })
}
