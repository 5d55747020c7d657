#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ownership assignment that partitions cities between players.
//!
//! Both policies guarantee that player node counts differ by at most one.

use std::f32::consts::TAU;

use conquest_core::{Owner, PlayerId, Position};
use log::debug;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Strategy used to partition nodes between players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPolicy {
    /// Shuffle the nodes and deal them out round-robin.
    #[default]
    Shuffle,
    /// Split the board along a random line, then rebalance.
    Geometric,
}

/// System that assigns an owner to every node.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnershipAssigner {
    policy: OwnershipPolicy,
}

impl OwnershipAssigner {
    /// Creates an assigner for the given policy.
    #[must_use]
    pub const fn new(policy: OwnershipPolicy) -> Self {
        Self { policy }
    }

    /// Assigns one of `players` to every position, indexed like `positions`.
    ///
    /// Every node stays neutral when `players` is empty.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        positions: &[Position],
        players: &[PlayerId],
        rng: &mut R,
    ) -> Vec<Owner> {
        if players.is_empty() {
            return vec![Owner::Neutral; positions.len()];
        }

        let owners = match self.policy {
            OwnershipPolicy::Shuffle => shuffled(positions.len(), players, rng),
            OwnershipPolicy::Geometric if players.len() == 2 => {
                split_by_line(positions, players[0], players[1], rng)
            }
            OwnershipPolicy::Geometric => banded(positions, players, rng),
        };

        debug!(
            "assigned {} nodes with {:?}: {:?}",
            positions.len(),
            self.policy,
            node_counts(&owners, players)
        );
        owners
    }
}

/// Number of nodes held by each player, in roster order.
#[must_use]
pub fn node_counts(owners: &[Owner], players: &[PlayerId]) -> Vec<usize> {
    players
        .iter()
        .map(|player| owners.iter().filter(|owner| owner.is(*player)).count())
        .collect()
}

/// Reports whether player node counts differ by at most one.
#[must_use]
pub fn is_balanced(owners: &[Owner], players: &[PlayerId]) -> bool {
    let counts = node_counts(owners, players);
    match (counts.iter().min(), counts.iter().max()) {
        (Some(min), Some(max)) => max - min <= 1,
        _ => true,
    }
}

fn shuffled<R: Rng + ?Sized>(count: usize, players: &[PlayerId], rng: &mut R) -> Vec<Owner> {
    let mut order: Vec<usize> = (0..count).collect();
    order.shuffle(rng);

    let mut owners = vec![Owner::Neutral; count];
    for (rank, node) in order.into_iter().enumerate() {
        owners[node] = Owner::Player(players[rank % players.len()]);
    }
    owners
}

fn centroid(positions: &[Position]) -> Position {
    if positions.is_empty() {
        return Position::default();
    }
    let (sum_x, sum_y) = positions
        .iter()
        .fold((0.0, 0.0), |(x, y), position| (x + position.x(), y + position.y()));
    let count = positions.len() as f32;
    Position::new(sum_x / count, sum_y / count)
}

fn projections<R: Rng + ?Sized>(positions: &[Position], rng: &mut R) -> Vec<f32> {
    let angle = rng.gen::<f32>() * TAU;
    let (normal_x, normal_y) = (angle.cos(), angle.sin());
    let centre = centroid(positions);
    positions
        .iter()
        .map(|position| {
            (position.x() - centre.x()) * normal_x + (position.y() - centre.y()) * normal_y
        })
        .collect()
}

/// Two-way split by the side of a random line through the centroid.
fn split_by_line<R: Rng + ?Sized>(
    positions: &[Position],
    first: PlayerId,
    second: PlayerId,
    rng: &mut R,
) -> Vec<Owner> {
    let mut near = Vec::new();
    let mut far = Vec::new();
    for (node, projection) in projections(positions, rng).into_iter().enumerate() {
        if projection >= 0.0 {
            near.push(node);
        } else {
            far.push(node);
        }
    }

    while near.len() > far.len() + 1 {
        far.push(near.remove(0));
    }
    while far.len() > near.len() + 1 {
        near.push(far.remove(0));
    }

    let mut owners = vec![Owner::Neutral; positions.len()];
    for node in near {
        owners[node] = Owner::Player(first);
    }
    for node in far {
        owners[node] = Owner::Player(second);
    }
    owners
}

/// Split into equal bands along a random direction, one band per player.
fn banded<R: Rng + ?Sized>(positions: &[Position], players: &[PlayerId], rng: &mut R) -> Vec<Owner> {
    let projections = projections(positions, rng);
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|a, b| projections[*a].total_cmp(&projections[*b]));

    let count = positions.len();
    let mut owners = vec![Owner::Neutral; count];
    for (rank, node) in order.into_iter().enumerate() {
        owners[node] = Owner::Player(players[rank * players.len() / count]);
    }
    owners
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn players(count: u32) -> Vec<PlayerId> {
        (0..count).map(PlayerId::new).collect()
    }

    #[test]
    fn no_players_leaves_everything_neutral() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let owners = OwnershipAssigner::default().assign(&[Position::default(); 3], &[], &mut rng);
        assert_eq!(owners, vec![Owner::Neutral; 3]);
    }

    #[test]
    fn single_player_owns_every_node() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let roster = players(1);
        let owners = OwnershipAssigner::new(OwnershipPolicy::Geometric).assign(
            &[Position::new(0.0, 0.0), Position::new(4.0, 1.0)],
            &roster,
            &mut rng,
        );
        assert_eq!(node_counts(&owners, &roster), vec![2]);
    }

    #[test]
    fn line_split_keeps_sides_together_when_already_balanced() {
        let positions = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(101.0, 0.0),
        ];
        let roster = players(2);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let owners = split_by_line(&positions, roster[0], roster[1], &mut rng);

        assert!(is_balanced(&owners, &roster));
        assert_eq!(owners[0], owners[1]);
        assert_eq!(owners[2], owners[3]);
        assert_ne!(owners[0], owners[2]);
    }
}
