use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Polar angle of `v` in `[0, 2π)`.
pub fn polar_angle(v: &Vector2<f32>) -> f32 {
    normalize_angle(v.y.atan2(v.x))
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

pub fn rotate(v: &Vector2<f32>, angle: f32) -> Vector2<f32> {
    Rotation2::new(angle) * v
}

/// Signed shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(points: &[Point2<f32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x * q.y - q.x * p.y;
    }
    twice_area / 2.0
}

pub fn centroid(points: &[Point2<f32>]) -> Option<Point2<f32>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Some(Point2::from(sum / points.len() as f32))
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to the point distance when `a` and `b` coincide.
pub fn distance_to_line(p: &Point2<f32>, a: &Point2<f32>, b: &Point2<f32>) -> f32 {
    let ab = b - a;
    let len = ab.norm();
    if len == 0.0 {
        return (p - a).norm();
    }
    (ab.x * (p.y - a.y) - ab.y * (p.x - a.x)).abs() / len
}

/// Axis-aligned box used for label extents and bracket placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl BoundingBox {
    pub fn from_point(p: Point2<f32>) -> Self {
        Self { min: p, max: p }
    }

    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point2<f32>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(*first), |mut bb, p| {
            bb.include(p);
            bb
        }))
    }

    pub fn include(&mut self, p: &Point2<f32>) {
        self.min = Point2::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point2::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vector2::new(margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn contains(&self, p: &Point2<f32>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Distance from `origin` along unit direction `dir` to where the ray leaves the box.
    ///
    /// Returns `None` when `origin` is outside the box.
    pub fn exit_distance(&self, origin: &Point2<f32>, dir: &Vector2<f32>) -> Option<f32> {
        if !self.contains(origin) {
            return None;
        }
        let mut t = f32::INFINITY;
        if dir.x > 0.0 {
            t = t.min((self.max.x - origin.x) / dir.x);
        } else if dir.x < 0.0 {
            t = t.min((self.min.x - origin.x) / dir.x);
        }
        if dir.y > 0.0 {
            t = t.min((self.max.y - origin.y) / dir.y);
        } else if dir.y < 0.0 {
            t = t.min((self.min.y - origin.y) / dir.y);
        }
        t.is_finite().then_some(t)
    }
}
