#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connectivity repair for road networks fragmented by pruning.
//!
//! The repairer greedily merges connected components: while more than one
//! component remains it adds the shortest road joining two different
//! components, preferring roads that cross no existing road.

use conquest_core::{Edge, Graph, NodeId};
use log::{debug, warn};
use thiserror::Error;

/// Failures that indicate a broken graph rather than a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RepairError {
    /// No pair of nodes from different components could be joined.
    #[error("no bridging road found while {components} components remain")]
    NoBridge {
        /// Number of components left when repair gave up.
        components: usize,
    },
}

/// Candidate road ranked by length.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    from: NodeId,
    to: NodeId,
    length: f32,
}

#[derive(Debug, Default)]
struct Best {
    clear: Option<Candidate>,
    any: Option<Candidate>,
}

impl Best {
    fn offer(&mut self, candidate: Candidate, crosses: bool) {
        if self.any.map_or(true, |best| candidate.length < best.length) {
            self.any = Some(candidate);
        }
        if !crosses && self.clear.map_or(true, |best| candidate.length < best.length) {
            self.clear = Some(candidate);
        }
    }

    fn pick(self, graph_edges: usize) -> Option<Candidate> {
        if self.clear.is_none() {
            if let Some(candidate) = self.any {
                warn!(
                    "every bridge crosses one of {graph_edges} roads; adding {}-{} anyway",
                    candidate.from.get(),
                    candidate.to.get()
                );
            }
        }
        self.clear.or(self.any)
    }
}

/// Greedy nearest-component merger.
#[derive(Debug, Default)]
pub struct ConnectivityRepairer;

impl ConnectivityRepairer {
    /// Creates a new repairer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Joins components until the graph is connected.
    ///
    /// Returns the bridging roads in the order they were added. Ties between
    /// equally short candidates resolve to the lowest node pair.
    pub fn repair(&self, graph: &mut Graph) -> Result<Vec<Edge>, RepairError> {
        let mut bridges = Vec::new();

        loop {
            let components = graph.components();
            if components.len() <= 1 {
                return Ok(bridges);
            }

            let mut labels = vec![0_usize; graph.node_count()];
            for (label, component) in components.iter().enumerate() {
                for node in component {
                    labels[node.index()] = label;
                }
            }

            let mut best = Best::default();
            for from in graph.node_ids() {
                for to in graph.node_ids().skip(from.index() + 1) {
                    if labels[from.index()] == labels[to.index()] {
                        continue;
                    }
                    let candidate = Candidate {
                        from,
                        to,
                        length: graph.distance(from, to),
                    };
                    best.offer(candidate, graph.would_cross(from, to));
                }
            }

            let Some(bridge) = best.pick(graph.edges().len()) else {
                return Err(RepairError::NoBridge {
                    components: components.len(),
                });
            };
            if !graph.insert_edge(bridge.from, bridge.to) {
                return Err(RepairError::NoBridge {
                    components: components.len(),
                });
            }
            debug!(
                "bridged components with road {}-{} ({:.1} units, {} components left)",
                bridge.from.get(),
                bridge.to.get(),
                bridge.length,
                components.len() - 1
            );
            bridges.extend(Edge::new(bridge.from, bridge.to));
        }
    }

    /// Joins every node without roads to its nearest other node.
    ///
    /// Returns the roads that were added.
    pub fn attach_isolated(&self, graph: &mut Graph) -> Vec<Edge> {
        let mut added = Vec::new();

        for node in graph.node_ids() {
            if graph.degree(node) > 0 {
                continue;
            }

            let mut best = Best::default();
            for other in graph.node_ids().filter(|other| *other != node) {
                let candidate = Candidate {
                    from: node,
                    to: other,
                    length: graph.distance(node, other),
                };
                best.offer(candidate, graph.would_cross(node, other));
            }

            if let Some(nearest) = best.pick(graph.edges().len()) {
                if graph.insert_edge(nearest.from, nearest.to) {
                    added.extend(Edge::new(nearest.from, nearest.to));
                }
            }
        }

        added
    }
}
