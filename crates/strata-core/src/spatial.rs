use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::BBox;
use crate::math::Vec2;

/// An entry in the R-tree hover index, referencing a shape by its position
/// in the layer.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the layer's shape vector.
    pub shape_index: usize,
    /// Bounding box of the shape's body.
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x(), self.bbox.min.y()],
            [self.bbox.max.x(), self.bbox.max.y()],
        )
    }
}

/// Broad-phase index over shape bounds, used to narrow hover queries
/// before the exact polygon test.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Shape indices whose bounds contain `point`, in ascending order.
    pub fn query_point(&self, point: Vec2) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .map(|e| e.shape_index)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Shape indices whose bounds intersect `region`, in ascending order.
    pub fn query_region(&self, region: &BBox) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [region.min.x(), region.min.y()],
            [region.max.x(), region.max.y()],
        );
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.shape_index)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(shape_index: usize, min: (f64, f64), max: (f64, f64)) -> SpatialEntry {
        SpatialEntry {
            shape_index,
            bbox: BBox::new(Vec2::new(min.0, min.1), Vec2::new(max.0, max.1)),
        }
    }

    #[test]
    fn test_point_query_sorted() {
        let index = SpatialIndex::build(vec![
            entry(2, (0.0, 0.0), (10.0, 10.0)),
            entry(0, (5.0, 5.0), (15.0, 15.0)),
            entry(1, (20.0, 20.0), (30.0, 30.0)),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.query_point(Vec2::new(7.0, 7.0)), vec![0, 2]);
        assert_eq!(index.query_point(Vec2::new(25.0, 25.0)), vec![1]);
        assert!(index.query_point(Vec2::new(50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_region_query() {
        let index = SpatialIndex::build(vec![
            entry(0, (0.0, 0.0), (10.0, 10.0)),
            entry(1, (20.0, 20.0), (30.0, 30.0)),
        ]);
        let region = BBox::new(Vec2::new(-5.0, -5.0), Vec2::new(15.0, 15.0));
        assert_eq!(index.query_region(&region), vec![0]);
        assert!(SpatialIndex::new().is_empty());
    }
}
