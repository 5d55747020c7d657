#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Road network synthesis over placed nodes.
//!
//! Every [`GraphStrategy`] produces a connected, non-crossing road network:
//!
//! * `SpanningTree` joins nodes with a random crossing-free spanning tree and
//!   then tops up short roads until each node reaches `min_connections`.
//! * `Triangulation` starts from the Delaunay triangulation and prunes a
//!   fraction of its roads without stranding any city from its allies.
//! * `Lattice` joins lattice neighbours and prunes the same way.
//!
//! Pruning strategies depend on node ownership, so owners must be assigned
//! before the network is built.

pub mod delaunay;
pub mod prune;

use std::collections::HashMap;

use conquest_core::{Graph, NodeId, Owner};
use conquest_system_connectivity::{ConnectivityRepairer, RepairError};
use conquest_system_placement::{LatticeCoord, LatticeShape, Placement};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of roads removed by pruning strategies unless configured otherwise.
pub const DEFAULT_PRUNE_FRACTION: f32 = 1.0 / 3.0;

const DEFAULT_MIN_CONNECTIONS: usize = 2;
const DEFAULT_MAX_DISTANCE: f32 = 220.0;
const JOIN_ATTEMPTS: u32 = 64;

fn default_min_connections() -> usize {
    DEFAULT_MIN_CONNECTIONS
}

fn default_max_distance() -> f32 {
    DEFAULT_MAX_DISTANCE
}

fn default_prune_fraction() -> f32 {
    DEFAULT_PRUNE_FRACTION
}

/// Interchangeable road synthesis strategies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphStrategy {
    /// Random spanning tree augmented with short roads.
    SpanningTree {
        /// Degree a node must reach before augmentation stops adding its roads.
        #[serde(default = "default_min_connections")]
        min_connections: usize,
        /// Roads must be strictly shorter than this to be added by augmentation.
        #[serde(default = "default_max_distance")]
        max_distance: f32,
    },
    /// Delaunay triangulation with friendly-preserving pruning.
    Triangulation {
        /// Fraction of triangulation roads targeted for removal.
        #[serde(default = "default_prune_fraction")]
        prune_fraction: f32,
    },
    /// Lattice adjacency with friendly-preserving pruning.
    Lattice {
        /// Lattice the nodes were placed on.
        #[serde(default)]
        shape: LatticeShape,
        /// Fraction of lattice roads targeted for removal.
        #[serde(default = "default_prune_fraction")]
        prune_fraction: f32,
    },
}

impl Default for GraphStrategy {
    fn default() -> Self {
        Self::SpanningTree {
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl GraphStrategy {
    /// Fraction of roads pruned by the strategy, if it prunes at all.
    #[must_use]
    pub fn prune_fraction(&self) -> Option<f32> {
        match self {
            Self::SpanningTree { .. } => None,
            Self::Triangulation { prune_fraction } | Self::Lattice { prune_fraction, .. } => {
                Some(*prune_fraction)
            }
        }
    }
}

/// Builds connected road networks using the configured strategy.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    strategy: GraphStrategy,
    repairer: ConnectivityRepairer,
}

impl GraphBuilder {
    /// Creates a builder for the given strategy.
    #[must_use]
    pub fn new(strategy: GraphStrategy) -> Self {
        Self {
            strategy,
            repairer: ConnectivityRepairer::new(),
        }
    }

    /// Strategy used by the builder.
    #[must_use]
    pub const fn strategy(&self) -> GraphStrategy {
        self.strategy
    }

    /// Builds a connected road network over the placed nodes.
    ///
    /// `owners` is indexed by node and only consulted by pruning strategies.
    pub fn build<R: Rng + ?Sized>(
        &self,
        placements: &[Placement],
        owners: &[Owner],
        rng: &mut R,
    ) -> Result<Graph, RepairError> {
        let mut graph = Graph::new(placements.iter().map(|placement| placement.position).collect());

        match self.strategy {
            GraphStrategy::SpanningTree {
                min_connections,
                max_distance,
            } => {
                join_spanning_tree(&mut graph, rng);
                augment_short_roads(&mut graph, min_connections, max_distance);
            }
            GraphStrategy::Triangulation { prune_fraction } => {
                for (a, b) in delaunay::triangulate(graph.positions()) {
                    let _ = graph.insert_edge(a, b);
                }
                self.prune(&mut graph, owners, prune_fraction, rng);
            }
            GraphStrategy::Lattice {
                shape,
                prune_fraction,
            } => {
                join_lattice_neighbours(&mut graph, placements, shape);
                self.prune(&mut graph, owners, prune_fraction, rng);
            }
        }

        let bridges = self.repairer.repair(&mut graph)?;
        debug!(
            "built {} roads over {} nodes ({} bridges)",
            graph.edges().len(),
            graph.node_count(),
            bridges.len()
        );
        Ok(graph)
    }

    fn prune<R: Rng + ?Sized>(
        &self,
        graph: &mut Graph,
        owners: &[Owner],
        fraction: f32,
        rng: &mut R,
    ) {
        let before = graph.edges().len();
        let removed = prune::prune_friendly(graph, owners, fraction, rng);
        let attached = self.repairer.attach_isolated(graph);
        debug!(
            "pruned {} of {before} roads, attached {} isolated nodes",
            removed.len(),
            attached.len()
        );
    }
}

/// Grows a random spanning tree, avoiding roads that cross the tree.
fn join_spanning_tree<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) {
    if graph.node_count() < 2 {
        return;
    }

    let mut connected = vec![NodeId::new(0)];
    let mut remaining: Vec<NodeId> = graph.node_ids().skip(1).collect();

    while !remaining.is_empty() {
        let (from, slot) = pick_join(graph, &connected, &remaining, rng);
        let to = remaining.remove(slot);
        let _ = graph.insert_edge(from, to);
        connected.push(to);
    }
}

/// Chooses a connected node and the slot of a remaining node to join.
///
/// Random pairs are tried first. When every try crosses the tree, the shortest
/// crossing-free pair is used, and failing that the shortest pair overall.
fn pick_join<R: Rng + ?Sized>(
    graph: &Graph,
    connected: &[NodeId],
    remaining: &[NodeId],
    rng: &mut R,
) -> (NodeId, usize) {
    for _ in 0..JOIN_ATTEMPTS {
        let from = connected[rng.gen_range(0..connected.len())];
        let slot = rng.gen_range(0..remaining.len());
        if !graph.would_cross(from, remaining[slot]) {
            return (from, slot);
        }
    }

    let mut clear: Option<(f32, NodeId, usize)> = None;
    let mut any: Option<(f32, NodeId, usize)> = None;
    for &from in connected {
        for (slot, &to) in remaining.iter().enumerate() {
            let length = graph.distance(from, to);
            if any.map_or(true, |(best, _, _)| length < best) {
                any = Some((length, from, slot));
            }
            if clear.map_or(true, |(best, _, _)| length < best) && !graph.would_cross(from, to) {
                clear = Some((length, from, slot));
            }
        }
    }

    match clear.or(any) {
        Some((_, from, slot)) => {
            if clear.is_none() {
                warn!("spanning tree join crosses an existing road");
            }
            (from, slot)
        }
        None => (connected[0], 0),
    }
}

/// Adds short crossing-free roads until nodes reach `min_connections`.
///
/// Nodes are visited in index order and candidates by increasing index, so
/// lower index pairs win ties.
fn augment_short_roads(graph: &mut Graph, min_connections: usize, max_distance: f32) {
    for from in graph.node_ids() {
        for to in graph.node_ids() {
            if from == to || graph.contains_edge(from, to) {
                continue;
            }
            if graph.distance(from, to) < max_distance
                && graph.degree(from) < min_connections
                && !graph.would_cross(from, to)
            {
                let _ = graph.insert_edge(from, to);
            }
        }
    }
}

fn join_lattice_neighbours(graph: &mut Graph, placements: &[Placement], shape: LatticeShape) {
    let sites: HashMap<LatticeCoord, NodeId> = placements
        .iter()
        .enumerate()
        .filter_map(|(index, placement)| {
            placement
                .lattice
                .map(|coord| (coord, NodeId::from_index(index)))
        })
        .collect();

    for (index, placement) in placements.iter().enumerate() {
        let Some(coord) = placement.lattice else {
            continue;
        };
        for neighbour in coord.neighbors(shape) {
            if let Some(&other) = sites.get(&neighbour) {
                let _ = graph.insert_edge(NodeId::from_index(index), other);
            }
        }
    }
}
