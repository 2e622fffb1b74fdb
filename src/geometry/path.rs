use super::{BoundingBox, Line, Point, QuadraticBezierCurve, Transform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Subpath {
    Line(Line),
    Quadratic(QuadraticBezierCurve),
}

impl Subpath {
    pub fn apply_transform(&mut self, transformation: Transform) {
        match self {
            Self::Line(line) => line.apply_transform(transformation),
            Self::Quadratic(curve) => curve.apply_transform(transformation),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Line(line) => line.bounding_box(),
            Self::Quadratic(curve) => curve.bounding_box(),
        }
    }
}

/// One closed contour
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
    pub current_point: Point,
    start: Point,
}

impl Path {
    pub const fn new(start: Point) -> Self {
        Self {
            subpaths: Vec::new(),
            current_point: start,
            start,
        }
    }

    pub fn close_path(&mut self) {
        if self.current_point != self.start {
            self.line_to(self.start);
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        for subpath in &self.subpaths {
            bbox.merge(subpath.bounding_box());
        }

        bbox
    }

    pub fn apply_transform(&mut self, transformation: Transform) {
        self.start *= transformation;
        self.current_point *= transformation;

        for subpath in &mut self.subpaths {
            subpath.apply_transform(transformation);
        }
    }

    pub fn line_to(&mut self, p: Point) {
        self.subpaths
            .push(Subpath::Line(Line::new(self.current_point, p)));
        self.current_point = p;
    }

    pub fn quadratic_curve_to(&mut self, control_point: Point, end: Point) {
        self.subpaths.push(Subpath::Quadratic(QuadraticBezierCurve::new(
            self.current_point,
            end,
            control_point,
        )));
        self.current_point = end;
    }

    /// Replaces every curve with line segments no further than `tolerance`
    /// from it
    pub fn flatten(&self, tolerance: f32, lines: &mut Vec<Line>) {
        for subpath in &self.subpaths {
            match subpath {
                Subpath::Line(line) => lines.push(*line),
                Subpath::Quadratic(curve) => lines.extend(curve.subdivide(tolerance)),
            }
        }
    }
}
