use super::{BoundingBox, Line, Path, Point, Transform};

/// A glyph shape: a set of closed contours filled by the non-zero winding rule
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub paths: Vec<Path>,
}

impl Outline {
    pub const fn empty() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|path| path.subpaths.is_empty())
    }

    pub fn apply_transform(&mut self, transformation: Transform) {
        for path in &mut self.paths {
            path.apply_transform(transformation);
        }
    }

    pub fn extend(&mut self, other: Outline) {
        self.paths.extend(other.paths);
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        for path in &self.paths {
            bbox.merge(path.bounding_box());
        }

        bbox
    }

    pub fn flatten(&self, tolerance: f32) -> Vec<Line> {
        let mut lines = Vec::new();

        for path in &self.paths {
            path.flatten(tolerance, &mut lines);
        }

        lines
    }
}

/// Line segments of a flattened [`Outline`], queried per sample point
#[derive(Debug, Clone)]
pub struct FlatOutline {
    lines: Vec<Line>,
}

impl FlatOutline {
    pub fn new(outline: &Outline, tolerance: f32) -> Self {
        Self {
            lines: outline.flatten(tolerance),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn contains_non_zero(&self, p: Point) -> bool {
        self.lines
            .iter()
            .map(|line| line.winding_contribution(p))
            .sum::<i32>()
            != 0
    }

    /// Distance to the nearest edge, `f32::INFINITY` when there are no edges
    pub fn distance_to_edge(&self, p: Point) -> f32 {
        self.lines
            .iter()
            .map(|line| line.distance_to_point(p))
            .fold(f32::INFINITY, f32::min)
    }

    /// Distance to the nearest edge, positive inside the filled area
    pub fn signed_distance(&self, p: Point) -> f32 {
        let distance = self.distance_to_edge(p);

        if self.contains_non_zero(p) {
            distance
        } else {
            -distance
        }
    }
}
