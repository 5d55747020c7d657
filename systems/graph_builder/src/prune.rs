//! Random road pruning that never strands a city from its allies.

use conquest_core::{Edge, Graph, NodeId, Owner};
use rand::{seq::SliceRandom, Rng};

fn owner_of(owners: &[Owner], node: NodeId) -> Owner {
    owners.get(node.index()).copied().unwrap_or_default()
}

/// Number of roads from `node` to a same-owner neighbour, ignoring `excluded`.
#[must_use]
pub fn friendly_degree(
    graph: &Graph,
    owners: &[Owner],
    node: NodeId,
    excluded: Option<Edge>,
) -> usize {
    let owner = owner_of(owners, node);
    graph
        .edges()
        .iter()
        .filter(|edge| Some(**edge) != excluded)
        .filter_map(|edge| edge.other(node))
        .filter(|neighbour| owner_of(owners, *neighbour) == owner)
        .count()
}

/// Reports whether removing `edge` leaves both endpoints a friendly road.
#[must_use]
pub fn is_removable(graph: &Graph, owners: &[Owner], edge: Edge) -> bool {
    [edge.a(), edge.b()]
        .into_iter()
        .all(|endpoint| friendly_degree(graph, owners, endpoint, Some(edge)) > 0)
}

/// Removes up to `fraction` of the roads in random order.
///
/// A road is only removed while both of its endpoints keep at least one
/// other road to a same-owner neighbour. Returns the removed roads.
pub fn prune_friendly<R: Rng + ?Sized>(
    graph: &mut Graph,
    owners: &[Owner],
    fraction: f32,
    rng: &mut R,
) -> Vec<Edge> {
    let target = (graph.edges().len() as f32 * fraction.clamp(0.0, 1.0)).floor() as usize;
    let mut candidates = graph.edges().to_vec();
    candidates.shuffle(rng);

    let mut removed = Vec::with_capacity(target);
    for edge in candidates {
        if removed.len() >= target {
            break;
        }
        if is_removable(graph, owners, edge) && graph.remove_edge(edge) {
            removed.push(edge);
        }
    }

    removed
}
