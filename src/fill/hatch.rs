// src/fill/hatch.rs
//
// Hatching: families of parallel lines swept across the bounding box of a
// set of polygons and clipped to their interiors.

use nannou::prelude::*;

use crate::models::Polygon;
use crate::utilities::{cos_deg, map, sin_deg, Rand};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HatchOptions {
    /// Endpoint jitter as a fraction of the spacing.
    pub rand: Option<f32>,
    /// Join each line to the end of the previous one.
    pub continuous: bool,
    /// 0..1, widens the spacing line after line.
    pub gradient: Option<f32>,
}

/// Computes the hatch segments for `polygons`, `dist` apart at `angle`
/// degrees.
pub fn hatch_lines(
    polygons: &[Polygon],
    dist: f32,
    angle: f32,
    options: &HatchOptions,
    rand: &mut Rand,
) -> Vec<(Point2, Point2)> {
    if dist <= 0.0 || !dist.is_finite() {
        return Vec::new();
    }
    let Some((min, max)) = polygons
        .iter()
        .filter_map(Polygon::bounds)
        .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    else {
        return Vec::new();
    };

    let angle = angle % 180.0;
    let window = Polygon::new(vec![pt2(min.x, min.y), pt2(max.x, min.y), pt2(max.x, max.y), pt2(min.x, max.y)]);
    let start_y = if (0.0..=90.0).contains(&angle) { min.y } else { max.y };
    let gradient = options.gradient.map_or(1.0, |g| map(g, 0.0, 1.0, 1.0, 1.1, true));

    let offset = vec2(cos_deg(-angle + 90.0), sin_deg(-angle + 90.0));
    let along = vec2(cos_deg(-angle), sin_deg(-angle));

    let mut rows: Vec<Vec<Point2>> = Vec::new();
    let mut spacing = dist;
    let mut i = 0usize;
    loop {
        let a = pt2(min.x, start_y) + offset * (spacing * i as f32);
        let b = a + along;
        if window.intersect(a, b).is_empty() {
            break;
        }
        let mut hits: Vec<Point2> = polygons.iter().flat_map(|p| p.intersect(a, b)).collect();
        hits.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));
        if !hits.is_empty() {
            rows.push(hits);
        }
        spacing *= gradient;
        i += 1;
    }

    let jitter = options.rand.unwrap_or(0.0);
    let mut segments = Vec::new();
    for j in 0..rows.len() {
        let count = rows[j].len();
        let mut k = 0;
        while k + 1 < count {
            if jitter != 0.0 {
                for p in &mut rows[j][k..k + 2] {
                    p.x += jitter * dist * rand.random(-10.0, 10.0);
                    p.y += jitter * dist * rand.random(-10.0, 10.0);
                }
            }
            let (start, end) = (rows[j][k], rows[j][k + 1]);
            segments.push((start, end));
            if options.continuous && j > 0 {
                if let Some(previous) = rows[j - 1].get(1) {
                    segments.push((*previous, start));
                }
            }
            k += 2;
        }
    }
    segments
}
