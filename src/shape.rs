//! Vector shapes as sequences of path segments.
//!
//! Painters consume shapes by iterating [`Shape::segments`]; a plain
//! [`Shape::Rect`] is kept distinct so painters can use the canvas rect
//! fast path instead of building a path.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use crate::geom::{Point, Rect};

/// Control-point distance for approximating a quarter ellipse with a cubic curve.
const KAPPA: f64 = 0.552_284_749_831;

/// One segment of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier: two control points then the end point.
    CubicTo(Point, Point, Point),
    Close,
}

/// An open or closed path built from [`PathSeg`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segs: Vec<PathSeg>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segs.push(PathSeg::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segs.push(PathSeg::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.segs
            .push(PathSeg::CubicTo(Point::new(c1x, c1y), Point::new(c2x, c2y), Point::new(x, y)));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segs.push(PathSeg::Close);
        self
    }

    pub fn push(&mut self, seg: PathSeg) {
        self.segs.push(seg);
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Bounds of every point in the path, control points included.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let mut pts = self.segs.iter().flat_map(|seg| match *seg {
            PathSeg::MoveTo(p) | PathSeg::LineTo(p) => vec![p],
            PathSeg::CubicTo(c1, c2, p) => vec![c1, c2, p],
            PathSeg::Close => Vec::new(),
        });
        let Some(first) = pts.next() else {
            return Rect::default();
        };
        let (min, max) = pts.fold((first, first), |(min, max), p| {
            (Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
        });
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// A vector shape a painter can fill, stroke or clip to.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Path(Path),
}

impl Shape {
    /// An ellipse inscribed in `rect`, as four cubic curves.
    #[must_use]
    pub fn ellipse(rect: Rect) -> Self {
        let rx = rect.width / 2.0;
        let ry = rect.height / 2.0;
        let cx = rect.x + rx;
        let cy = rect.y + ry;
        let kx = rx * KAPPA;
        let ky = ry * KAPPA;
        let mut path = Path::new();
        path.move_to(cx + rx, cy)
            .cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close();
        Self::Path(path)
    }

    /// Bounding box used to place gradients and patterns.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Path(p) => p.bounds(),
        }
    }

    /// The shape as path segments; a rect becomes a closed four-sided path.
    #[must_use]
    pub fn segments(&self) -> Vec<PathSeg> {
        match self {
            Self::Rect(r) => vec![
                PathSeg::MoveTo(Point::new(r.x, r.y)),
                PathSeg::LineTo(Point::new(r.max_x(), r.y)),
                PathSeg::LineTo(Point::new(r.max_x(), r.max_y())),
                PathSeg::LineTo(Point::new(r.x, r.max_y())),
                PathSeg::Close,
            ],
            Self::Path(p) => p.segments().to_vec(),
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}
