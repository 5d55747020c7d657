//! Bowyer-Watson Delaunay triangulation over node positions.

use std::collections::{BTreeMap, BTreeSet};

use conquest_core::{NodeId, Position};

const SUPER_TRIANGLE_SCALE: f64 = 20.0;

#[derive(Clone, Copy, Debug)]
struct Point {
    x: f64,
    y: f64,
}

/// Triangle stored with counter-clockwise vertex order.
#[derive(Clone, Copy, Debug)]
struct Triangle {
    vertices: [usize; 3],
}

impl Triangle {
    fn counter_clockwise(points: &[Point], a: usize, b: usize, c: usize) -> Self {
        if cross(points[a], points[b], points[c]) < 0.0 {
            Self {
                vertices: [a, c, b],
            }
        } else {
            Self {
                vertices: [a, b, c],
            }
        }
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }

    fn circumcircle_contains(&self, points: &[Point], point: Point) -> bool {
        let [a, b, c] = self.vertices.map(|index| points[index]);
        let (adx, ady) = (a.x - point.x, a.y - point.y);
        let (bdx, bdy) = (b.x - point.x, b.y - point.y);
        let (cdx, cdy) = (c.x - point.x, c.y - point.y);

        let determinant = (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
            - (bdx * bdx + bdy * bdy) * (adx * cdy - cdx * ady)
            + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady);
        determinant > 0.0
    }
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Unique edges of the Delaunay triangulation of `positions`.
///
/// Fewer than three positions produce no triangles and therefore no edges.
/// Pairs are returned in ascending order.
#[must_use]
pub fn triangulate(positions: &[Position]) -> Vec<(NodeId, NodeId)> {
    let count = positions.len();
    if count < 3 {
        return Vec::new();
    }

    let mut points: Vec<Point> = positions
        .iter()
        .map(|position| Point {
            x: f64::from(position.x()),
            y: f64::from(position.y()),
        })
        .collect();

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in &points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    points.push(Point {
        x: mid_x - SUPER_TRIANGLE_SCALE * span,
        y: mid_y - span,
    });
    points.push(Point {
        x: mid_x,
        y: mid_y + SUPER_TRIANGLE_SCALE * span,
    });
    points.push(Point {
        x: mid_x + SUPER_TRIANGLE_SCALE * span,
        y: mid_y - span,
    });

    let mut triangles = vec![Triangle::counter_clockwise(
        &points,
        count,
        count + 1,
        count + 2,
    )];

    for index in 0..count {
        let point = points[index];
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|triangle| triangle.circumcircle_contains(&points, point));

        let mut edge_uses: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        for triangle in &bad {
            for edge in triangle.edges() {
                *edge_uses.entry(edge).or_insert(0) += 1;
            }
        }

        triangles = good;
        for ((a, b), uses) in edge_uses {
            if uses == 1 {
                triangles.push(Triangle::counter_clockwise(&points, a, b, index));
            }
        }
    }

    let mut edges = BTreeSet::new();
    for triangle in triangles {
        if triangle.vertices.iter().any(|&vertex| vertex >= count) {
            continue;
        }
        for edge in triangle.edges() {
            let _ = edges.insert(edge);
        }
    }

    edges
        .into_iter()
        .map(|(a, b)| (NodeId::from_index(a), NodeId::from_index(b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_triangulates_into_five_edges() {
        let edges = triangulate(&[
            Position::new(0.0, 0.0),
            Position::new(10.0, 0.0),
            Position::new(10.0, 11.0),
            Position::new(0.0, 10.0),
        ]);
        assert_eq!(edges.len(), 5, "four sides plus one diagonal");
    }

    #[test]
    fn too_few_points_yield_no_edges() {
        assert!(triangulate(&[Position::new(0.0, 0.0), Position::new(5.0, 5.0)]).is_empty());
    }

    #[test]
    fn interior_point_joins_every_corner() {
        let edges = triangulate(&[
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(50.0, 90.0),
            Position::new(50.0, 30.0),
        ]);
        let centre = NodeId::new(3);
        let spokes = edges
            .iter()
            .filter(|(a, b)| *a == centre || *b == centre)
            .count();
        assert_eq!(edges.len(), 6);
        assert_eq!(spokes, 3);
    }
}
