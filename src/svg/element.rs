//! Geometric primitives produced by the path parser

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Samples taken along a Bezier curve
pub const CURVE_STEPS: usize = 100;

/// Vertices of a full ellipse; arcs use a proportional share
pub const ELLIPSE_VERTEX_COUNT: usize = 25;

const TWO_PI: f64 = PI * 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Mirror image of this point through `center`
    pub fn reflected_around(self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Point> for f32 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        Point::new(self * rhs.x, self * rhs.y)
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |bounds, p| bounds.including(p)))
    }

    pub fn including(self, p: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    pub fn union(self, other: BoundingBox) -> Self {
        self.including(other.min).including(other.max)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Elliptical arc in center parameterization.
///
/// Built from the endpoint form used in path data; radii too small to
/// span the endpoints are scaled up.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub start: Point,
    pub end: Point,
    pub rx: f32,
    pub ry: f32,
    pub x_axis_rotation: i32,
    pub large_arc: bool,
    pub sweep: bool,
    center: (f64, f64),
    radii: (f64, f64),
    start_theta: f64,
    theta_delta: f64,
}

impl Arc {
    pub fn new(
        start: Point,
        rx: f32,
        ry: f32,
        x_axis_rotation: i32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) -> Self {
        let angle = (f64::from(x_axis_rotation) % 360.0).to_radians();
        let (sin, cos) = angle.sin_cos();

        let dx2 = f64::from(start.x - end.x) / 2.0;
        let dy2 = f64::from(start.y - end.y) / 2.0;
        let x1 = cos * dx2 + sin * dy2;
        let y1 = -sin * dx2 + cos * dy2;

        let mut radius_x = f64::from(rx.abs());
        let mut radius_y = f64::from(ry.abs());
        let check = (x1 * x1) / (radius_x * radius_x) + (y1 * y1) / (radius_y * radius_y);
        if check > 0.99999 {
            let scale = check.sqrt() * 1.00001;
            radius_x *= scale;
            radius_y *= scale;
        }
        let (srx, sry) = (radius_x * radius_x, radius_y * radius_y);
        let (sx1, sy1) = (x1 * x1, y1 * y1);

        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let sq = ((srx * sry - srx * sy1 - sry * sx1) / (srx * sy1 + sry * sx1)).max(0.0);
        let coefficient = sign * sq.sqrt();
        let cx1 = coefficient * (radius_x * y1 / radius_y);
        let cy1 = coefficient * -(radius_y * x1 / radius_x);

        let mid_x = f64::from(start.x + end.x) / 2.0;
        let mid_y = f64::from(start.y + end.y) / 2.0;
        let center = (mid_x + (cos * cx1 - sin * cy1), mid_y + (sin * cx1 + cos * cy1));

        let ux = (x1 - cx1) / radius_x;
        let uy = (y1 - cy1) / radius_y;
        let vx = (-x1 - cx1) / radius_x;
        let vy = (-y1 - cy1) / radius_y;

        let sign = if uy < 0.0 { -1.0 } else { 1.0 };
        let start_theta = sign * (ux / (ux * ux + uy * uy).sqrt()).clamp(-1.0, 1.0).acos();

        let n = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
        let sign = if ux * vy - uy * vx < 0.0 { -1.0 } else { 1.0 };
        let mut theta_delta = sign * ((ux * vx + uy * vy) / n).clamp(-1.0, 1.0).acos();
        if !sweep && theta_delta > 0.0 {
            theta_delta -= TWO_PI;
        } else if sweep && theta_delta < 0.0 {
            theta_delta += TWO_PI;
        }

        Self {
            start,
            end,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            center,
            radii: (radius_x, radius_y),
            start_theta: start_theta % TWO_PI,
            theta_delta: theta_delta % TWO_PI,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center.0 as f32, self.center.1 as f32)
    }

    /// Signed angle swept, in radians
    pub fn sweep_angle(&self) -> f64 {
        self.theta_delta
    }

    pub fn vertex_count(&self) -> usize {
        (self.theta_delta.abs() / TWO_PI * ELLIPSE_VERTEX_COUNT as f64).ceil() as usize + 1
    }

    fn point_at_angle(&self, theta: f64) -> Point {
        let angle = (f64::from(self.x_axis_rotation) % 360.0).to_radians();
        let (sin, cos) = angle.sin_cos();
        let ex = self.radii.0 * theta.cos();
        let ey = self.radii.1 * theta.sin();
        Point::new(
            (self.center.0 + cos * ex - sin * ey) as f32,
            (self.center.1 + sin * ex + cos * ey) as f32,
        )
    }

    pub fn vertices(&self) -> Vec<Point> {
        let count = self.vertex_count();
        let step = self.theta_delta / (count - 1).max(1) as f64;
        (0..count)
            .map(|i| self.point_at_angle(self.start_theta + step * i as f64))
            .collect()
    }
}

/// One segment of a parsed path
#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    Line {
        from: Point,
        to: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Arc(Arc),
}

impl PathElement {
    pub fn line(from: Point, to: Point) -> Self {
        Self::Line { from, to }
    }

    pub fn start(&self) -> Point {
        match self {
            PathElement::Line { from, .. } => *from,
            PathElement::Quadratic { start, .. } | PathElement::Cubic { start, .. } => *start,
            PathElement::Arc(arc) => arc.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathElement::Line { to, .. } => *to,
            PathElement::Quadratic { end, .. } | PathElement::Cubic { end, .. } => *end,
            PathElement::Arc(arc) => arc.end,
        }
    }

    /// Point at parameter `t` in `[0, 1]`. Arcs interpolate their angle.
    pub fn point_at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        match self {
            PathElement::Line { from, to } => *from + t * (*to - *from),
            PathElement::Quadratic { start, control, end } => {
                (u * u) * *start + (2.0 * t * u) * *control + (t * t) * *end
            }
            PathElement::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                (u * u * u) * *start
                    + (3.0 * t * u * u) * *control1
                    + (3.0 * t * t * u) * *control2
                    + (t * t * t) * *end
            }
            PathElement::Arc(arc) => arc.point_at_angle(arc.start_theta + arc.theta_delta * f64::from(t)),
        }
    }

    /// Polyline approximation including both endpoints
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            PathElement::Line { from, to } => vec![*from, *to],
            PathElement::Quadratic { .. } | PathElement::Cubic { .. } => (0..=CURVE_STEPS)
                .map(|i| self.point_at(i as f32 / CURVE_STEPS as f32))
                .collect(),
            PathElement::Arc(arc) => arc.vertices(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let start = self.start();
        BoundingBox::from_points(self.vertices())
            .unwrap_or(BoundingBox { min: start, max: start })
    }
}

/// Bounds of a whole path, `None` when it has no segments
pub fn bounding_box(elements: &[PathElement]) -> Option<BoundingBox> {
    elements
        .iter()
        .map(PathElement::bounding_box)
        .reduce(BoundingBox::union)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Point, b: Point, tolerance: f32) -> bool {
        (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance
    }

    fn close(a: Point, b: Point) -> bool {
        near(a, b, 1e-3)
    }

    #[test]
    fn test_reflection() {
        assert_eq!(
            Point::new(1.0, 2.0).reflected_around(Point::new(3.0, 3.0)),
            Point::new(5.0, 4.0)
        );
    }

    #[test]
    fn test_curve_endpoints() {
        let curve = PathElement::Cubic {
            start: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 10.0),
            control2: Point::new(10.0, 10.0),
            end: Point::new(10.0, 0.0),
        };
        let vertices = curve.vertices();
        assert_eq!(vertices.len(), CURVE_STEPS + 1);
        assert!(close(vertices[0], Point::new(0.0, 0.0)));
        assert!(close(vertices[CURVE_STEPS], Point::new(10.0, 0.0)));
        assert!(close(curve.point_at(0.5), Point::new(5.0, 7.5)));
    }

    #[test]
    fn test_half_circle_arc() {
        let arc = Arc::new(Point::new(0.0, 0.0), 5.0, 5.0, 0, false, true, Point::new(10.0, 0.0));
        // Radii exactly spanning the endpoints get nudged up, moving the center slightly
        assert!(near(arc.center(), Point::new(5.0, 0.0), 0.05));
        assert!((arc.sweep_angle().abs() - PI).abs() < 0.02);

        let vertices = arc.vertices();
        assert!(close(vertices[0], Point::new(0.0, 0.0)));
        assert!(close(*vertices.last().unwrap(), Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_undersized_radii_are_scaled() {
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 1.0, 0, false, true, Point::new(10.0, 0.0));
        assert!(near(arc.center(), Point::new(5.0, 0.0), 0.05));
        assert!(close(*arc.vertices().last().unwrap(), Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_path_bounds() {
        let path = [
            PathElement::line(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
            PathElement::line(Point::new(10.0, 10.0), Point::new(20.0, -5.0)),
        ];
        let bounds = bounding_box(&path).unwrap();
        assert_eq!(bounds.min, Point::new(0.0, -5.0));
        assert_eq!(bounds.max, Point::new(20.0, 10.0));
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounding_box(&[]), None);
    }
}
