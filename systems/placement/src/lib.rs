#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Node placement system that scatters cities across the board.
//!
//! Two samplers are provided. [`NodePlacer`] draws uniformly random positions
//! under a minimum pairwise spacing, degrading to unconstrained placement when
//! its attempt budget runs out. [`LatticeSampler`] picks sites from a square
//! or axial-hex lattice so graph builders can join lattice neighbours.

use conquest_core::Position;
use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

const HEX_ROW_FACTOR: f32 = 0.866_025_4;

const SQUARE_NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const HEX_NEIGHBOURS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

/// Rectangular board area with an inset margin that nodes never enter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
    margin: f32,
}

impl Bounds {
    /// Creates a new bounds descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Total board width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Total board height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Distance kept free along every board edge.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Reports whether the inset area has a positive extent on both axes.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width - 2.0 * self.margin > 0.0 && self.height - 2.0 * self.margin > 0.0
    }

    /// Reports whether the position lies inside the inset area.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= self.margin
            && position.x() <= self.width - self.margin
            && position.y() >= self.margin
            && position.y() <= self.height - self.margin
    }

    /// Draws a uniformly random position from the inset area.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let span_x = (self.width - 2.0 * self.margin).max(0.0);
        let span_y = (self.height - 2.0 * self.margin).max(0.0);
        Position::new(
            rng.gen::<f32>() * span_x + self.margin,
            rng.gen::<f32>() * span_y + self.margin,
        )
    }
}

/// Position chosen for a node by one of the samplers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Location of the node.
    pub position: Position,
    /// Set when the node was placed without honouring the spacing constraint.
    pub fallback: bool,
    /// Lattice site occupied by the node, for lattice placements.
    pub lattice: Option<LatticeCoord>,
}

impl Placement {
    fn scattered(position: Position, fallback: bool) -> Self {
        Self {
            position,
            fallback,
            lattice: None,
        }
    }
}

/// Rejection sampler enforcing a minimum pairwise distance.
#[derive(Clone, Copy, Debug)]
pub struct NodePlacer {
    min_distance: f32,
    max_attempts: u32,
}

impl NodePlacer {
    /// Creates a placer with the given spacing and attempt budget.
    #[must_use]
    pub const fn new(min_distance: f32, max_attempts: u32) -> Self {
        Self {
            min_distance,
            max_attempts,
        }
    }

    /// Minimum distance enforced between non-fallback nodes.
    #[must_use]
    pub const fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Places `count` nodes inside `bounds`.
    ///
    /// Candidates are accepted only when they keep `min_distance` to every
    /// node placed so far. Once the attempt budget is spent, the remaining
    /// nodes are placed without the check and flagged as fallbacks.
    pub fn place<R: Rng + ?Sized>(
        &self,
        count: usize,
        bounds: Bounds,
        rng: &mut R,
    ) -> Vec<Placement> {
        let mut placements: Vec<Placement> = Vec::with_capacity(count);
        let mut attempts = 0;

        while placements.len() < count && attempts < self.max_attempts {
            attempts += 1;
            let candidate = bounds.sample(rng);
            let spaced = placements
                .iter()
                .all(|placed| placed.position.distance(candidate) >= self.min_distance);
            if spaced {
                placements.push(Placement::scattered(candidate, false));
            }
        }

        let fallback_count = count - placements.len();
        if fallback_count > 0 {
            warn!(
                "node placement exhausted {} attempts; placing {fallback_count} of {count} nodes without spacing",
                self.max_attempts
            );
        }

        while placements.len() < count {
            placements.push(Placement::scattered(bounds.sample(rng), true));
        }

        debug!("placed {count} nodes after {attempts} attempts");
        placements
    }
}

/// Regular lattice used by lattice placements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatticeShape {
    /// Square grid with four neighbours per site.
    #[default]
    Square,
    /// Pointy-top hexagonal grid in axial coordinates with six neighbours per site.
    Hex,
}

impl LatticeShape {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Square => &SQUARE_NEIGHBOURS,
            Self::Hex => &HEX_NEIGHBOURS,
        }
    }
}

/// Lattice site expressed as `(q, r)`. For hex lattices these are axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeCoord {
    q: i32,
    r: i32,
}

impl LatticeCoord {
    /// Creates a new lattice coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column (square) or axial `q` (hex) component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row (square) or axial `r` (hex) component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Sites adjacent to this one on the given lattice.
    pub fn neighbors(self, shape: LatticeShape) -> impl Iterator<Item = LatticeCoord> {
        shape
            .offsets()
            .iter()
            .map(move |(dq, dr)| Self::new(self.q + dq, self.r + dr))
    }
}

/// Every lattice site fitting inside the inset area, in row-major order.
#[must_use]
pub fn lattice_sites(
    bounds: Bounds,
    spacing: f32,
    shape: LatticeShape,
) -> Vec<(LatticeCoord, Position)> {
    let mut sites = Vec::new();
    if spacing <= 0.0 || !bounds.is_usable() {
        return sites;
    }

    let row_step = match shape {
        LatticeShape::Square => spacing,
        LatticeShape::Hex => spacing * HEX_ROW_FACTOR,
    };
    let max_x = bounds.width() - bounds.margin();
    let max_y = bounds.height() - bounds.margin();

    let mut row = 0_i32;
    loop {
        let y = bounds.margin() + row as f32 * row_step;
        if y > max_y {
            break;
        }
        let (offset, q_shift) = match shape {
            LatticeShape::Square => (0.0, 0),
            LatticeShape::Hex => (
                if row % 2 == 0 { 0.0 } else { spacing / 2.0 },
                (row - (row & 1)) / 2,
            ),
        };

        let mut column = 0_i32;
        loop {
            let x = bounds.margin() + offset + column as f32 * spacing;
            if x > max_x {
                break;
            }
            sites.push((LatticeCoord::new(column - q_shift, row), Position::new(x, y)));
            column += 1;
        }
        row += 1;
    }

    sites
}

/// Sampler that draws distinct sites from a lattice.
#[derive(Clone, Copy, Debug)]
pub struct LatticeSampler {
    spacing: f32,
    shape: LatticeShape,
}

impl LatticeSampler {
    /// Creates a sampler for the given lattice spacing and shape.
    #[must_use]
    pub const fn new(spacing: f32, shape: LatticeShape) -> Self {
        Self { spacing, shape }
    }

    /// Lattice shape the sampler draws from.
    #[must_use]
    pub const fn shape(&self) -> LatticeShape {
        self.shape
    }

    /// Picks `count` random lattice sites, ordered by lattice coordinate.
    ///
    /// When the lattice holds fewer sites than requested, the shortfall is
    /// placed at random without a lattice site and flagged as fallback.
    pub fn place<R: Rng + ?Sized>(
        &self,
        count: usize,
        bounds: Bounds,
        rng: &mut R,
    ) -> Vec<Placement> {
        let mut sites = lattice_sites(bounds, self.spacing, self.shape);
        sites.shuffle(rng);
        sites.truncate(count);
        sites.sort_by_key(|(coord, _)| (coord.r(), coord.q()));

        let mut placements: Vec<Placement> = sites
            .into_iter()
            .map(|(coord, position)| Placement {
                position,
                fallback: false,
                lattice: Some(coord),
            })
            .collect();

        let shortfall = count - placements.len();
        if shortfall > 0 {
            warn!("lattice holds only {} sites; placing {shortfall} nodes off-lattice", placements.len());
        }
        while placements.len() < count {
            placements.push(Placement::scattered(bounds.sample(rng), true));
        }

        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn samples_stay_inside_inset_area() {
        let bounds = Bounds::new(900.0, 700.0, 80.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            assert!(bounds.contains(bounds.sample(&mut rng)));
        }
    }

    #[test]
    fn bounds_smaller_than_margin_are_unusable() {
        assert!(!Bounds::new(100.0, 700.0, 50.0).is_usable());
        assert!(Bounds::new(101.0, 700.0, 50.0).is_usable());
    }

    #[test]
    fn square_lattice_rows_align() {
        let sites = lattice_sites(Bounds::new(300.0, 300.0, 50.0), 100.0, LatticeShape::Square);
        assert_eq!(sites.len(), 9);
        assert_eq!(sites[0].0, LatticeCoord::new(0, 0));
        assert_eq!(sites[4].1, Position::new(150.0, 150.0));
    }

    #[test]
    fn hex_neighbours_sit_one_spacing_apart() {
        let sites = lattice_sites(Bounds::new(700.0, 600.0, 50.0), 100.0, LatticeShape::Hex);
        for (coord, position) in &sites {
            for neighbour in coord.neighbors(LatticeShape::Hex) {
                if let Some((_, other)) = sites.iter().find(|(site, _)| *site == neighbour) {
                    assert!((position.distance(*other) - 100.0).abs() < 0.01);
                }
            }
        }
    }
}
