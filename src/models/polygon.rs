// src/models/polygon.rs
//
// Closed polygon used for fills, hatching and shape outlines

use nannou::prelude::*;

use crate::utilities::intersect_lines;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    pub fn from_points(points: &[[f32; 2]]) -> Self {
        Self::new(points.iter().map(|p| pt2(p[0], p[1])).collect())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges as (start, end) pairs, closing back to the first vertex.
    pub fn sides(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Every point where the unbounded line through `a`-`b` crosses a side.
    pub fn intersect(&self, a: Point2, b: Point2) -> Vec<Point2> {
        self.sides()
            .filter_map(|(s1, s2)| intersect_lines(a, b, s1, s2, false))
            .collect()
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        }))
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Point2 {
        if self.vertices.is_empty() {
            return Point2::ZERO;
        }
        self.vertices.iter().fold(Point2::ZERO, |acc, v| acc + *v) / self.vertices.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_points(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]])
    }

    #[test]
    fn test_sides_close_the_loop() {
        let sides: Vec<_> = square().sides().collect();
        assert_eq!(sides.len(), 4);
        assert_eq!(sides[3], (pt2(0.0, 10.0), pt2(0.0, 0.0)));
    }

    #[test]
    fn test_intersect_horizontal_line() {
        let hits = square().intersect(pt2(-100.0, 5.0), pt2(-99.0, 5.0));
        assert_eq!(hits.len(), 2);
        let mut xs: Vec<f32> = hits.iter().map(|p| p.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((xs[0] - 0.0).abs() < 1e-4);
        assert!((xs[1] - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_and_centroid() {
        let (lo, hi) = square().bounds().unwrap();
        assert_eq!(lo, pt2(0.0, 0.0));
        assert_eq!(hi, pt2(10.0, 10.0));
        assert_eq!(square().centroid(), pt2(5.0, 5.0));
        assert!(Polygon::default().bounds().is_none());
    }
}
