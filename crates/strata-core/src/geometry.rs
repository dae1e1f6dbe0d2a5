use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::math::{linear_partition, Range, Vec2};

/// An axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min = Vec2::splat(f64::MAX);
        let mut max = Vec2::splat(f64::MIN);
        for p in points {
            min = min.zip_map(*p, f64::min);
            max = max.zip_map(*p, f64::max);
        }
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x() >= self.min.x()
            && p.x() <= self.max.x()
            && p.y() >= self.min.y()
            && p.y() <= self.max.y()
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x() <= other.max.x()
            && self.max.x() >= other.min.x()
            && self.min.y() <= other.max.y()
            && self.max.y() >= other.min.y()
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }
}

// ── Anchoring ────────────────────────────────────────────────────────

/// Vertical half of an anchoring such as `top-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

/// Horizontal half of an anchoring such as `top-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Where the anchor point sits on a box built by [`Coords::dim_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchoring {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl Anchoring {
    pub const TOP_LEFT: Self = Self {
        vertical: VerticalAnchor::Top,
        horizontal: HorizontalAnchor::Left,
    };

    pub const CENTER: Self = Self {
        vertical: VerticalAnchor::Center,
        horizontal: HorizontalAnchor::Center,
    };

    /// Split an anchoring string into its halves. Each half is `None` when it
    /// is missing or unrecognised.
    fn halves(text: &str) -> (Option<VerticalAnchor>, Option<HorizontalAnchor>) {
        let mut parts = text.split('-');
        let vertical = match parts.next() {
            Some("top") => Some(VerticalAnchor::Top),
            Some("center") => Some(VerticalAnchor::Center),
            Some("bottom") => Some(VerticalAnchor::Bottom),
            _ => None,
        };
        let horizontal = match parts.next() {
            Some("left") => Some(HorizontalAnchor::Left),
            Some("center") => Some(HorizontalAnchor::Center),
            Some("right") => Some(HorizontalAnchor::Right),
            _ => None,
        };
        (vertical, horizontal)
    }

    /// Strict parse of `"top-left"` … `"bottom-right"`.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        match Self::halves(text) {
            (Some(vertical), Some(horizontal)) if text.split('-').count() == 2 => {
                Ok(Self { vertical, horizontal })
            }
            _ => Err(CoreError::InvalidAnchoring(text.to_string())),
        }
    }
}

impl Default for Anchoring {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

/// Builders for vertex rings.
pub struct Coords;

impl Coords {
    /// An axis-aligned box of size `w × h` placed relative to `anchor`.
    ///
    /// A malformed half of `anchoring` is logged and collapses that axis to
    /// zero, so the caller still gets a (degenerate) ring to draw.
    pub fn dim_box(anchor: Vec2, w: f64, h: f64, anchoring: &str) -> Vec<Vec2> {
        let (vertical, horizontal) = Anchoring::halves(anchoring);
        let (y1, y2) = match vertical {
            Some(VerticalAnchor::Top) => (anchor.y(), anchor.y() + h),
            Some(VerticalAnchor::Center) => (anchor.y() - h * 0.5, anchor.y() + h * 0.5),
            Some(VerticalAnchor::Bottom) => (anchor.y() - h, anchor.y()),
            None => {
                log::warn!("dim_box: '{anchoring}' is not a valid anchoring value");
                (0.0, 0.0)
            }
        };
        let (x1, x2) = match horizontal {
            Some(HorizontalAnchor::Left) => (anchor.x(), anchor.x() + w),
            Some(HorizontalAnchor::Center) => (anchor.x() - w * 0.5, anchor.x() + w * 0.5),
            Some(HorizontalAnchor::Right) => (anchor.x() - w, anchor.x()),
            None => {
                log::warn!("dim_box: '{anchoring}' is not a valid anchoring value");
                (0.0, 0.0)
            }
        };
        vec![
            Vec2::new(x1, y1),
            Vec2::new(x2, y1),
            Vec2::new(x2, y2),
            Vec2::new(x1, y2),
        ]
    }

    /// The box spanned by two opposite corners, starting at `a`.
    pub fn corner_box(a: Vec2, b: Vec2) -> Vec<Vec2> {
        vec![a, Vec2::new(b.x(), a.y()), b, Vec2::new(a.x(), b.y())]
    }

    /// A regular polygon with `vertices` corners on a circle.
    pub fn circle(center: Vec2, radius: f64, vertices: usize) -> Vec<Vec2> {
        linear_partition([0.0, 2.0 * PI], vertices, false)
            .into_iter()
            .map(|theta| Vec2::new(radius * theta.cos(), radius * theta.sin()) + center)
            .collect()
    }
}

// ── Parametric paths ─────────────────────────────────────────────────

/// A parametric curve `p -> (x, y)`.
pub type PathFn = Box<dyn Fn(f64) -> Vec2>;

/// Constructors and combinators for [`PathFn`].
pub struct Path;

impl Path {
    /// Unit circle traversed once over `p ∈ [0, 1)`, then scaled and moved.
    pub fn circle(dilation: Vec2, translation: Vec2) -> PathFn {
        Box::new(move |p| {
            let angle = p * 2.0 * PI;
            Vec2::new(angle.cos(), angle.sin()) * dilation + translation
        })
    }

    pub fn translate(path: PathFn, translation: Vec2) -> PathFn {
        Box::new(move |p| path(p) + translation)
    }

    pub fn dilate(path: PathFn, dilation: Vec2) -> PathFn {
        Box::new(move |p| path(p) * dilation)
    }

    pub fn shift_domain(path: PathFn, shift: f64) -> PathFn {
        Box::new(move |p| path(p + shift))
    }

    /// Sample `vertices` points over the domain, excluding its end.
    pub fn concretize(path: &dyn Fn(f64) -> Vec2, domain: Range, vertices: usize) -> Vec<Vec2> {
        linear_partition(domain, vertices, false)
            .into_iter()
            .map(path)
            .collect()
    }

    pub fn evaluate(path: &dyn Fn(f64) -> Vec2, p: f64) -> Vec2 {
        path(p)
    }
}

// ── Polygons ─────────────────────────────────────────────────────────

/// Area-weighted centroid of a vertex ring. Rings with no area fall back to
/// the vertex mean; an empty ring has its centroid at the origin.
pub fn polygon_centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::ZERO;
    }
    let mut area2 = 0.0;
    let mut acc = Vec2::ZERO;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let cross = a.x() * b.y() - b.x() * a.y();
        area2 += cross;
        acc += (*a + b) * cross;
    }
    if area2.abs() < 1e-12 {
        let sum = vertices.iter().fold(Vec2::ZERO, |s, v| s + *v);
        return sum / vertices.len() as f64;
    }
    acc / (3.0 * area2)
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(vertices: &[Vec2], point: Vec2) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y() > point.y()) != (vj.y() > point.y()) {
            let x_cross = (vj.x() - vi.x()) * (point.y() - vi.y()) / (vj.y() - vi.y()) + vi.x();
            if point.x() < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_bbox_from_points() {
        let b = BBox::from_points(&[Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]).unwrap();
        assert_eq!(b.min, Vec2::new(-2.0, -1.0));
        assert_eq!(b.max, Vec2::new(3.0, 4.0));
        assert!((b.width() - 5.0).abs() < EPS);
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bbox_intersection() {
        let a = BBox::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = BBox::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
        let c = BBox::new(Vec2::new(20.0, 20.0), Vec2::new(30.0, 30.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_dim_box_anchorings() {
        let top_left = Coords::dim_box(Vec2::new(10.0, 10.0), 4.0, 2.0, "top-left");
        assert_eq!(top_left[0], Vec2::new(10.0, 10.0));
        assert_eq!(top_left[2], Vec2::new(14.0, 12.0));
        let centered = Coords::dim_box(Vec2::ZERO, 4.0, 2.0, "center-center");
        assert_eq!(centered[0], Vec2::new(-2.0, -1.0));
        assert_eq!(centered[2], Vec2::new(2.0, 1.0));
        let bottom_right = Coords::dim_box(Vec2::ZERO, 4.0, 2.0, "bottom-right");
        assert_eq!(bottom_right[0], Vec2::new(-4.0, -2.0));
    }

    #[test]
    fn test_dim_box_malformed_axis_collapses() {
        let ring = Coords::dim_box(Vec2::new(5.0, 5.0), 4.0, 2.0, "middle-left");
        for v in &ring {
            assert_eq!(v.y(), 0.0);
        }
        assert_eq!(ring[1].x(), 9.0);
        assert!(Anchoring::parse("middle-left").is_err());
        assert_eq!(Anchoring::parse("center-center").unwrap(), Anchoring::CENTER);
    }

    #[test]
    fn test_corner_box_order() {
        let ring = Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0));
        assert_eq!(
            ring,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 20.0),
                Vec2::new(0.0, 20.0)
            ]
        );
    }

    #[test]
    fn test_circle_vertices_on_radius() {
        let center = Vec2::new(3.0, 4.0);
        let ring = Coords::circle(center, 10.0, 48);
        assert_eq!(ring.len(), 48);
        for v in &ring {
            assert!((v.distance(&center) - 10.0).abs() < EPS);
        }
    }

    #[test]
    fn test_path_combinators() {
        let circle = Path::circle(Vec2::splat(2.0), Vec2::ZERO);
        let path = Path::shift_domain(Path::translate(circle, Vec2::new(1.0, 0.0)), 0.25);
        let p = Path::evaluate(&path, 0.0);
        assert!((p.x() - 1.0).abs() < EPS);
        assert!((p.y() - 2.0).abs() < EPS);
        let ring = Path::concretize(&path, [0.0, 1.0], 4);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_centroid_and_containment() {
        let square = Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let c = polygon_centroid(&square);
        assert!((c.x() - 5.0).abs() < EPS && (c.y() - 5.0).abs() < EPS);
        assert!(polygon_contains(&square, Vec2::new(5.0, 5.0)));
        assert!(!polygon_contains(&square, Vec2::new(15.0, 5.0)));
        let line = vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)];
        assert_eq!(polygon_centroid(&line), Vec2::new(1.0, 0.0));
    }
}
