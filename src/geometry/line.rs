use super::{point::Point, BoundingBox, Transform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn apply_transform(&mut self, transformation: Transform) {
        self.start *= transformation;
        self.end *= transformation;
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        bbox.add_point(self.start);
        bbox.add_point(self.end);

        bbox
    }

    /// Shortest distance from `p` to any point on the segment
    pub fn distance_to_point(&self, p: Point) -> f32 {
        let direction = self.end - self.start;
        let len_squared = direction.dot(direction);

        if len_squared == 0.0 {
            return self.start.euclidean_distance(p);
        }

        let t = ((p - self.start).dot(direction) / len_squared).clamp(0.0, 1.0);

        (self.start + direction * t).euclidean_distance(p)
    }

    /// Signed crossing of a ray cast from `p` towards +x: `1` for an upward
    /// edge passing to the right of `p`, `-1` for a downward one, `0` otherwise.
    ///
    /// Edges are half-open in y so a ray through a shared vertex counts once
    pub fn winding_contribution(&self, p: Point) -> i32 {
        let Line { start, end } = *self;

        let side = |p: Point| {
            (end.x - start.x) * (p.y - start.y) - (p.x - start.x) * (end.y - start.y)
        };

        if start.y <= p.y {
            if end.y > p.y && side(p) > 0.0 {
                return 1;
            }
        } else if end.y <= p.y && side(p) < 0.0 {
            return -1;
        }

        0
    }
}
