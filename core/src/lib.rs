#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Conquest engine.
//!
//! This crate defines the data model and message surface that connects the
//! generation systems, the authoritative world, and adapters. Generation
//! systems produce a [`Graph`] of cities and roads, adapters submit
//! [`Command`] values describing desired actions, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what changed. Rendering adapters only ever observe a
//! [`BoardView`] snapshot.

use serde::{Deserialize, Serialize};

/// Display colors assigned to players in roster order.
pub const PLAYER_COLORS: [PlayerColor; 4] = [
    PlayerColor::from_rgb(0x3b, 0x82, 0xf6),
    PlayerColor::from_rgb(0xef, 0x44, 0x44),
    PlayerColor::from_rgb(0x22, 0xc5, 0x5e),
    PlayerColor::from_rgb(0xea, 0xb3, 0x08),
];

/// Commands that express every permissible gameplay action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Selects a node, or resolves a pending selection into a move.
    SelectNode {
        /// Node targeted by the selection.
        node: NodeId,
        /// Units to send when the selection resolves into a move. `None` sends
        /// every unit allowed to leave the source.
        amount: Option<u32>,
    },
    /// Moves units between adjacent nodes, attacking when the target is hostile.
    AttemptMove {
        /// Node the units depart from.
        from: NodeId,
        /// Node the units travel to.
        to: NodeId,
        /// Requested number of units, clamped to what may leave the source.
        amount: u32,
    },
    /// Finishes the current player's turn.
    EndTurn,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A node became the active move source.
    NodeSelected {
        /// Node that is now selected.
        node: NodeId,
    },
    /// The active selection was cleared.
    SelectionCleared,
    /// A selection request was rejected without changing any state.
    SelectionRejected {
        /// Node named by the rejected request.
        node: NodeId,
        /// Specific reason the selection failed.
        reason: RejectionReason,
    },
    /// Units moved between two nodes held by the same player.
    UnitsMoved {
        /// Node the units left.
        from: NodeId,
        /// Node the units joined.
        to: NodeId,
        /// Number of units that moved.
        amount: u32,
    },
    /// Units attacked a hostile node.
    NodeAttacked {
        /// Node the attackers came from.
        from: NodeId,
        /// Node under attack.
        to: NodeId,
        /// Combat units committed by the attacker.
        attackers: u32,
        /// Combat units defending the node.
        defenders: u32,
        /// Combat units the attacker lost.
        attacker_losses: u32,
        /// Combat units the defender lost.
        defender_losses: u32,
    },
    /// A node changed hands after a successful attack.
    NodeCaptured {
        /// Node that was captured.
        node: NodeId,
        /// Owner before the capture.
        previous_owner: Owner,
        /// Owner after the capture.
        new_owner: PlayerId,
        /// Units occupying the node after the capture.
        garrison: u32,
    },
    /// A move request was rejected without changing any state.
    MoveRejected {
        /// Source named by the rejected request.
        from: NodeId,
        /// Target named by the rejected request.
        to: NodeId,
        /// Specific reason the move failed.
        reason: RejectionReason,
    },
    /// A node produced fresh units at the start of its owner's turn.
    UnitsProduced {
        /// Node that produced units.
        node: NodeId,
        /// Number of units produced.
        amount: u32,
    },
    /// The active player finished their turn.
    TurnEnded {
        /// Player whose turn ended.
        player: PlayerId,
        /// Player whose turn begins.
        next_player: PlayerId,
        /// Turn number after advancing.
        turn: u32,
    },
}

/// Reasons a selection or move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The request named a node that does not exist.
    UnknownNode,
    /// The source node is not owned by the current player.
    NotOwned,
    /// The source node has no unit that may leave this turn.
    NoMovableUnits,
    /// The target node is not connected to the source by a road.
    NotAdjacent,
    /// Source and target are the same node.
    SameNode,
    /// The requested amount was zero.
    NonPositiveAmount,
    /// The attacking party contains no combat units.
    NoCombatUnits,
}

/// Whether a move may empty its source node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFloor {
    /// Every unit may leave, emptying the source.
    #[default]
    AllowEmpty,
    /// One unit always stays behind.
    KeepOne,
}

impl SourceFloor {
    /// Number of units that must stay at the source.
    #[must_use]
    pub const fn reserved(self) -> u32 {
        match self {
            Self::AllowEmpty => 0,
            Self::KeepOne => 1,
        }
    }
}

/// Unique identifier assigned to a node. Identifiers index the node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new node identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates a node identifier from a position in the node list.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the node within the node list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Holder of a node or unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Held by no player.
    #[default]
    Neutral,
    /// Held by the given player.
    Player(PlayerId),
}

impl Owner {
    /// Returns the owning player, if any.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Self::Neutral => None,
            Self::Player(player) => Some(player),
        }
    }

    /// Reports whether the given player is the owner.
    #[must_use]
    pub fn is(self, player: PlayerId) -> bool {
        self == Self::Player(player)
    }
}

/// Visual appearance applied to a player's nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PlayerColor {
    /// Creates a new player color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Participant in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    /// Identifier of the player.
    pub id: PlayerId,
    /// Color used when presenting the player's nodes.
    pub color: PlayerColor,
}

impl Player {
    /// Builds a roster of `count` players with sequential identifiers.
    #[must_use]
    pub fn roster(count: usize) -> Vec<Self> {
        (0..count)
            .map(|index| Self {
                id: PlayerId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                color: PLAYER_COLORS[index % PLAYER_COLORS.len()],
            })
            .collect()
    }
}

/// Location of a node on the board, measured in board units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Signed area test: positive when `a`, `b`, `c` turn counter-clockwise,
/// negative when clockwise and zero when collinear.
#[must_use]
pub fn orientation(a: Position, b: Position, c: Position) -> f64 {
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (cx, cy) = (f64::from(c.x), f64::from(c.y));
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

/// Reports whether segments `p1p2` and `p3p4` intersect, touching included.
#[must_use]
pub fn segments_intersect(p1: Position, p2: Position, p3: Position, p4: Position) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_box(p3, p4, p1))
        || (d2 == 0.0 && within_box(p3, p4, p2))
        || (d3 == 0.0 && within_box(p1, p2, p3))
        || (d4 == 0.0 && within_box(p1, p2, p4))
}

fn within_box(a: Position, b: Position, point: Position) -> bool {
    point.x >= a.x.min(b.x)
        && point.x <= a.x.max(b.x)
        && point.y >= a.y.min(b.y)
        && point.y <= a.y.max(b.y)
}

/// Unordered road between two distinct nodes.
///
/// Endpoints are stored in ascending order so equal roads compare equal
/// regardless of the order they were named in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: NodeId,
    b: NodeId,
}

impl Edge {
    /// Creates an edge between two nodes, or `None` for a self-loop.
    #[must_use]
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { a, b }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Lower endpoint of the edge.
    #[must_use]
    pub const fn a(&self) -> NodeId {
        self.a
    }

    /// Higher endpoint of the edge.
    #[must_use]
    pub const fn b(&self) -> NodeId {
        self.b
    }

    /// Reports whether the node is one of the endpoints.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Returns the opposite endpoint when `node` is one of the endpoints.
    #[must_use]
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }

    /// Reports whether both edges have an endpoint in common.
    #[must_use]
    pub fn shares_endpoint(&self, other: &Edge) -> bool {
        self.touches(other.a) || self.touches(other.b)
    }
}

/// Node positions joined by roads.
///
/// Node identifiers index the position list. The graph never stores a
/// self-loop or a duplicate road.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    positions: Vec<Position>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates a graph without roads over the provided positions.
    #[must_use]
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            edges: Vec::new(),
        }
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterator over every node identifier in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.positions.len()).map(NodeId::from_index)
    }

    /// Position of the node, if it exists.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.positions.get(node.index()).copied()
    }

    /// Positions of every node in identifier order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Roads in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Reports whether a road joins the two nodes.
    #[must_use]
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        Edge::new(a, b).map_or(false, |edge| self.edges.contains(&edge))
    }

    /// Adds a road between two existing nodes.
    ///
    /// Returns `false` without changing the graph for self-loops, unknown
    /// nodes, and roads that already exist.
    pub fn insert_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a.index() >= self.positions.len() || b.index() >= self.positions.len() {
            return false;
        }
        let Some(edge) = Edge::new(a, b) else {
            return false;
        };
        if self.edges.contains(&edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Removes a road, reporting whether it existed.
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        match self.edges.iter().position(|existing| *existing == edge) {
            Some(index) => {
                let _ = self.edges.remove(index);
                true
            }
            None => false,
        }
    }

    /// Iterator over the nodes joined to `node` by a road.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(move |edge| edge.other(node))
    }

    /// Number of roads touching the node.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges.iter().filter(|edge| edge.touches(node)).count()
    }

    /// Length of the segment joining two nodes.
    #[must_use]
    pub fn distance(&self, a: NodeId, b: NodeId) -> f32 {
        match (self.position(a), self.position(b)) {
            (Some(first), Some(second)) => first.distance(second),
            _ => f32::INFINITY,
        }
    }

    /// Reports whether a road from `a` to `b` would cross an existing road.
    ///
    /// Roads sharing an endpoint with the candidate never count as crossing.
    #[must_use]
    pub fn would_cross(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(start), Some(end)) = (self.position(a), self.position(b)) else {
            return false;
        };
        self.edges.iter().any(|edge| {
            if edge.touches(a) || edge.touches(b) {
                return false;
            }
            match (self.position(edge.a), self.position(edge.b)) {
                (Some(c), Some(d)) => segments_intersect(start, end, c, d),
                _ => false,
            }
        })
    }

    /// Reports whether two roads without a shared endpoint cross each other.
    #[must_use]
    pub fn edges_cross(&self, first: &Edge, second: &Edge) -> bool {
        if first.shares_endpoint(second) {
            return false;
        }
        match (
            self.position(first.a),
            self.position(first.b),
            self.position(second.a),
            self.position(second.b),
        ) {
            (Some(p1), Some(p2), Some(p3), Some(p4)) => segments_intersect(p1, p2, p3, p4),
            _ => false,
        }
    }

    /// Reports whether no two roads cross.
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.edges.iter().enumerate().all(|(index, first)| {
            self.edges[index + 1..]
                .iter()
                .all(|second| !self.edges_cross(first, second))
        })
    }

    /// Adjacency lists indexed by node.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<NodeId>> {
        let mut adjacency = vec![Vec::new(); self.positions.len()];
        for edge in &self.edges {
            adjacency[edge.a.index()].push(edge.b);
            adjacency[edge.b.index()].push(edge.a);
        }
        adjacency
    }

    /// Connected components, each listed in ascending node order.
    ///
    /// Components are ordered by their lowest node. Traversal uses an explicit
    /// stack so the result does not depend on recursion depth.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let adjacency = self.adjacency();
        let mut visited = vec![false; self.positions.len()];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for start in 0..self.positions.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push(NodeId::from_index(start));
            let mut component = Vec::new();

            while let Some(node) = stack.pop() {
                component.push(node);
                for &neighbor in &adjacency[node.index()] {
                    if !visited[neighbor.index()] {
                        visited[neighbor.index()] = true;
                        stack.push(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// Reports whether every node can reach every other node.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.components().len() <= 1
    }
}

/// Movement and combat statistics of a combat unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Roads the unit may travel per turn.
    pub movement: u32,
    /// Strength added to attack rolls.
    pub attack: u32,
    /// Strength added to defense rolls.
    pub defense: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            movement: 1,
            attack: 2,
            defense: 2,
        }
    }
}

/// Statistics of a spy. Spies never fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpyStats {
    /// Roads the unit may travel per turn.
    pub movement: u32,
}

impl Default for SpyStats {
    fn default() -> Self {
        Self { movement: 2 }
    }
}

/// Kind of unit together with the statistics that kind carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Unit that attacks and defends.
    Combat(CombatStats),
    /// Unit that travels with armies but takes no part in battles.
    Spy(SpyStats),
}

/// Single unit stationed at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Holder of the unit.
    pub owner: Owner,
    /// Kind and statistics of the unit.
    pub kind: UnitKind,
    /// Roads travelled during the current turn.
    pub moves_made: u32,
}

impl Unit {
    /// Reports whether the unit takes part in battles.
    #[must_use]
    pub const fn is_combat(&self) -> bool {
        matches!(self.kind, UnitKind::Combat(_))
    }

    /// Combat statistics of the unit, if it fights.
    #[must_use]
    pub const fn combat_stats(&self) -> Option<CombatStats> {
        match self.kind {
            UnitKind::Combat(stats) => Some(stats),
            UnitKind::Spy(_) => None,
        }
    }

    /// Roads the unit may travel per turn.
    #[must_use]
    pub const fn movement_allowance(&self) -> u32 {
        match self.kind {
            UnitKind::Combat(stats) => stats.movement,
            UnitKind::Spy(stats) => stats.movement,
        }
    }

    /// Reports whether the unit moved at all during the current turn.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.moves_made > 0
    }

    /// Reports whether the unit may still travel another road this turn.
    #[must_use]
    pub const fn can_move(&self) -> bool {
        self.moves_made < self.movement_allowance()
    }
}

/// Immutable representation of a single node used for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSnapshot {
    /// Identifier of the node.
    pub id: NodeId,
    /// Location of the node on the board.
    pub position: Position,
    /// Current holder of the node.
    pub owner: Owner,
    /// Units stationed at the node. Hidden unless the current player owns it.
    pub garrison: Option<u32>,
    /// Units that may still move this turn. Hidden unless the current player owns it.
    pub movable: Option<u32>,
    /// Indicates whether the node is the active move source.
    pub selected: bool,
    /// Indicates whether placement ignored the spacing constraint for the node.
    pub fallback: bool,
}

/// Read-only snapshot describing the board for the current player.
#[derive(Clone, Debug, Default)]
pub struct BoardView {
    nodes: Vec<NodeSnapshot>,
    edges: Vec<Edge>,
    current_player: Option<PlayerId>,
    turn: u32,
    selection: Option<NodeId>,
}

impl BoardView {
    /// Creates a new board view from the provided snapshots.
    #[must_use]
    pub fn from_parts(
        mut nodes: Vec<NodeSnapshot>,
        mut edges: Vec<Edge>,
        current_player: Option<PlayerId>,
        turn: u32,
        selection: Option<NodeId>,
    ) -> Self {
        nodes.sort_by_key(|snapshot| snapshot.id);
        edges.sort_unstable();
        Self {
            nodes,
            edges,
            current_player,
            turn,
            selection,
        }
    }

    /// Iterator over the node snapshots in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes.iter()
    }

    /// Snapshot of a single node, if it exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.nodes[index])
    }

    /// Roads in ascending endpoint order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Player whose turn is active.
    #[must_use]
    pub const fn current_player(&self) -> Option<PlayerId> {
        self.current_player
    }

    /// Number of the active turn, starting at zero.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Node currently selected as move source.
    #[must_use]
    pub const fn selection(&self) -> Option<NodeId> {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CombatStats, Edge, Graph, NodeId, Owner, PlayerId, Position, RejectionReason, SourceFloor,
        SpyStats, Unit, UnitId, UnitKind,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn node(value: u32) -> NodeId {
        NodeId::new(value)
    }

    fn square() -> Graph {
        Graph::new(vec![
            Position::new(0.0, 0.0),
            Position::new(10.0, 0.0),
            Position::new(10.0, 10.0),
            Position::new(0.0, 10.0),
        ])
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn edge_normalizes_endpoint_order() {
        let forward = Edge::new(node(1), node(4)).expect("distinct endpoints");
        let backward = Edge::new(node(4), node(1)).expect("distinct endpoints");
        assert_eq!(forward, backward);
        assert_eq!(forward.a(), node(1));
        assert_eq!(forward.other(node(4)), Some(node(1)));
        assert_eq!(forward.other(node(2)), None);
    }

    #[test]
    fn edge_rejects_self_loop() {
        assert!(Edge::new(node(3), node(3)).is_none());
    }

    #[test]
    fn graph_refuses_duplicate_and_unknown_edges() {
        let mut graph = square();
        assert!(graph.insert_edge(node(0), node(1)));
        assert!(!graph.insert_edge(node(1), node(0)));
        assert!(!graph.insert_edge(node(0), node(9)));
        assert!(!graph.insert_edge(node(2), node(2)));
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn diagonals_of_a_square_cross() {
        let mut graph = square();
        assert!(graph.insert_edge(node(0), node(2)));
        assert!(graph.would_cross(node(1), node(3)));
        assert!(!graph.would_cross(node(0), node(1)));
        assert!(graph.insert_edge(node(1), node(3)));
        assert!(!graph.is_planar());
    }

    #[test]
    fn shared_endpoints_never_cross() {
        let mut graph = square();
        assert!(graph.insert_edge(node(0), node(1)));
        assert!(graph.insert_edge(node(0), node(2)));
        assert!(graph.insert_edge(node(0), node(3)));
        assert!(graph.is_planar());
    }

    #[test]
    fn collinear_disjoint_segments_do_not_intersect() {
        assert!(!super::segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(3.0, 0.0),
        ));
        assert!(super::segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(3.0, 0.0),
        ));
    }

    #[test]
    fn components_follow_roads() {
        let mut graph = square();
        assert_eq!(graph.components().len(), 4);
        assert!(graph.insert_edge(node(0), node(2)));
        assert!(graph.insert_edge(node(3), node(1)));
        assert_eq!(
            graph.components(),
            vec![vec![node(0), node(2)], vec![node(1), node(3)]]
        );
        assert!(graph.insert_edge(node(2), node(3)));
        assert!(graph.is_connected());
    }

    #[test]
    fn empty_graph_counts_as_connected() {
        assert!(Graph::default().is_connected());
    }

    #[test]
    fn source_floor_reserves_units() {
        assert_eq!(SourceFloor::AllowEmpty.reserved(), 0);
        assert_eq!(SourceFloor::KeepOne.reserved(), 1);
    }

    #[test]
    fn spies_outrun_combat_units() {
        let mut soldier = Unit {
            id: UnitId::new(0),
            owner: Owner::Player(PlayerId::new(0)),
            kind: UnitKind::Combat(CombatStats::default()),
            moves_made: 0,
        };
        let mut spy = Unit {
            id: UnitId::new(1),
            kind: UnitKind::Spy(SpyStats::default()),
            ..soldier
        };

        soldier.moves_made += 1;
        spy.moves_made += 1;

        assert!(soldier.has_moved() && !soldier.can_move());
        assert!(spy.has_moved() && spy.can_move());
        assert_eq!(soldier.combat_stats(), Some(CombatStats::default()));
        assert_eq!(spy.combat_stats(), None);
    }

    #[test]
    fn owner_round_trips_through_bincode() {
        assert_round_trip(&Owner::Player(PlayerId::new(1)));
        assert_round_trip(&RejectionReason::NotAdjacent);
    }
}
