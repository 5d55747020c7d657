#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Conquest.
//!
//! The [`World`] owns the road network, every node's garrison and the turn
//! state machine. Adapters mutate it exclusively through [`apply`] and observe
//! it through the [`query`] module. Every rejected request is reported as an
//! event and leaves the world untouched.

use conquest_core::{
    CombatStats, Command, Event, Graph, NodeId, Owner, Player, PlayerId, RejectionReason,
    SourceFloor, SpyStats, Unit, UnitId, UnitKind,
};
use conquest_system_skirmish::{Resolution, Skirmish};
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const COMBAT_STREAM: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Rules that govern movement and combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineRules {
    /// Whether a move may empty its source node.
    pub source_floor: SourceFloor,
    /// Rule used to settle attacks.
    pub resolution: Resolution,
    /// Statistics given to every new combat unit.
    pub combat_stats: CombatStats,
    /// Roads a spy may travel per turn.
    pub spy_movement: u32,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            source_floor: SourceFloor::default(),
            resolution: Resolution::default(),
            combat_stats: CombatStats::default(),
            spy_movement: SpyStats::default().movement,
        }
    }
}

/// Initial state of a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeSeed {
    /// Holder of the node.
    pub owner: Owner,
    /// Combat units stationed at the node.
    pub garrison: u32,
    /// Spies stationed at the node.
    pub spies: u32,
    /// Combat units produced at the start of each of the owner's turns.
    pub production_rate: u32,
    /// Whether placement ignored the spacing constraint for the node.
    pub fallback: bool,
}

impl NodeSeed {
    /// Creates a seed holding `garrison` combat units and nothing else.
    #[must_use]
    pub const fn new(owner: Owner, garrison: u32) -> Self {
        Self {
            owner,
            garrison,
            spies: 0,
            production_rate: 0,
            fallback: false,
        }
    }
}

/// Stage of the selection state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No node is selected.
    #[default]
    AwaitingSelection,
    /// The node is the source of the next move.
    SourceSelected(NodeId),
}

/// Represents the authoritative Conquest world state.
#[derive(Debug)]
pub struct World {
    graph: Graph,
    nodes: Vec<NodeState>,
    players: Vec<Player>,
    current: usize,
    turn: u32,
    phase: Phase,
    rules: EngineRules,
    skirmish: Skirmish,
    rng: ChaCha8Rng,
    next_unit: u32,
}

impl World {
    /// Creates a world over a finished board.
    ///
    /// `seeds` is indexed by node. Nodes without a seed start neutral and
    /// empty, and surplus seeds are ignored. The first player in `players`
    /// moves first. `seed` drives every combat roll.
    #[must_use]
    pub fn from_board(
        graph: Graph,
        seeds: &[NodeSeed],
        players: Vec<Player>,
        rules: EngineRules,
        seed: u64,
    ) -> Self {
        let node_count = graph.node_count();
        let mut world = Self {
            graph,
            nodes: Vec::with_capacity(node_count),
            players,
            current: 0,
            turn: 0,
            phase: Phase::AwaitingSelection,
            skirmish: Skirmish::new(rules.resolution),
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed ^ COMBAT_STREAM),
            next_unit: 0,
        };

        let (combat, spy) = (world.combat_kind(), world.spy_kind());
        for index in 0..node_count {
            let node = seeds.get(index).copied().unwrap_or_default();
            world.nodes.push(NodeState {
                owner: node.owner,
                units: Vec::new(),
                production_rate: node.production_rate,
                fallback: node.fallback,
            });
            world.recruit(index, combat, node.garrison);
            world.recruit(index, spy, node.spies);
        }

        world
    }

    fn combat_kind(&self) -> UnitKind {
        UnitKind::Combat(self.rules.combat_stats)
    }

    fn spy_kind(&self) -> UnitKind {
        UnitKind::Spy(SpyStats {
            movement: self.rules.spy_movement,
        })
    }

    fn recruit(&mut self, node: usize, kind: UnitKind, count: u32) {
        let owner = self.nodes[node].owner;
        for _ in 0..count {
            let id = UnitId::new(self.next_unit);
            self.next_unit = self.next_unit.wrapping_add(1);
            self.nodes[node].units.push(Unit {
                id,
                owner,
                kind,
                moves_made: 0,
            });
        }
    }

    fn current_player(&self) -> Option<PlayerId> {
        self.players.get(self.current).map(|player| player.id)
    }

    fn node(&self, id: NodeId) -> Option<&NodeState> {
        self.nodes.get(id.index())
    }

    fn select_node(&mut self, node: NodeId, amount: Option<u32>, out_events: &mut Vec<Event>) {
        match self.phase {
            Phase::SourceSelected(source) => {
                if node != source {
                    self.attempt_move(source, node, amount.unwrap_or(u32::MAX), out_events);
                }
                self.phase = Phase::AwaitingSelection;
                out_events.push(Event::SelectionCleared);
            }
            Phase::AwaitingSelection => match self.validate_selection(node) {
                Ok(()) => {
                    self.phase = Phase::SourceSelected(node);
                    out_events.push(Event::NodeSelected { node });
                }
                Err(reason) => out_events.push(Event::SelectionRejected { node, reason }),
            },
        }
    }

    fn validate_selection(&self, node: NodeId) -> Result<(), RejectionReason> {
        let state = self.node(node).ok_or(RejectionReason::UnknownNode)?;
        let player = self.current_player().ok_or(RejectionReason::NotOwned)?;
        if !state.owner.is(player) {
            return Err(RejectionReason::NotOwned);
        }
        if state.movable(self.rules.source_floor) == 0 {
            return Err(RejectionReason::NoMovableUnits);
        }
        Ok(())
    }

    /// Checks a move and returns the indices of the units that would leave.
    fn validate_move(
        &self,
        from: NodeId,
        to: NodeId,
        amount: u32,
    ) -> Result<Vec<usize>, RejectionReason> {
        let (Some(source), Some(target)) = (self.node(from), self.node(to)) else {
            return Err(RejectionReason::UnknownNode);
        };
        if from == to {
            return Err(RejectionReason::SameNode);
        }
        let player = self.current_player().ok_or(RejectionReason::NotOwned)?;
        if !source.owner.is(player) {
            return Err(RejectionReason::NotOwned);
        }
        if !self.graph.contains_edge(from, to) {
            return Err(RejectionReason::NotAdjacent);
        }
        if amount == 0 {
            return Err(RejectionReason::NonPositiveAmount);
        }

        let available = source.movable(self.rules.source_floor);
        if available == 0 {
            return Err(RejectionReason::NoMovableUnits);
        }

        let movers = source.mover_indices(amount.min(available));
        let hostile = !target.owner.is(player);
        if hostile && !movers.iter().any(|&index| source.units[index].is_combat()) {
            return Err(RejectionReason::NoCombatUnits);
        }
        Ok(movers)
    }

    fn attempt_move(&mut self, from: NodeId, to: NodeId, amount: u32, out_events: &mut Vec<Event>) {
        let indices = match self.validate_move(from, to, amount) {
            Ok(indices) => indices,
            Err(reason) => {
                out_events.push(Event::MoveRejected { from, to, reason });
                return;
            }
        };
        let Some(player) = self.current_player() else {
            return;
        };

        let mut movers = self.nodes[from.index()].take(&indices);
        for unit in &mut movers {
            unit.moves_made = unit.moves_made.saturating_add(1);
        }

        let target = &mut self.nodes[to.index()];
        if target.owner.is(player) {
            let amount = count(movers.len());
            target.units.extend(movers);
            out_events.push(Event::UnitsMoved { from, to, amount });
            return;
        }

        self.assault(from, to, player, movers, out_events);
    }

    fn assault(
        &mut self,
        from: NodeId,
        to: NodeId,
        player: PlayerId,
        movers: Vec<Unit>,
        out_events: &mut Vec<Event>,
    ) {
        let (soldiers, spies): (Vec<Unit>, Vec<Unit>) =
            movers.into_iter().partition(Unit::is_combat);
        let attacking: Vec<CombatStats> = soldiers.iter().filter_map(Unit::combat_stats).collect();
        let defending: Vec<CombatStats> = self.nodes[to.index()]
            .units
            .iter()
            .filter_map(Unit::combat_stats)
            .collect();

        let outcome = self.skirmish.resolve(&attacking, &defending, &mut self.rng);
        out_events.push(Event::NodeAttacked {
            from,
            to,
            attackers: outcome.attackers,
            defenders: outcome.defenders,
            attacker_losses: outcome.attacker_losses,
            defender_losses: outcome.defender_losses,
        });

        let target = &mut self.nodes[to.index()];
        target.remove_defenders(outcome.defender_losses);
        if !outcome.captured() {
            debug!("attack from {from:?} on {to:?} repelled");
            return;
        }

        let previous_owner = target.owner;
        target.owner = Owner::Player(player);
        target.units.clear();
        target
            .units
            .extend(soldiers.into_iter().skip(outcome.attacker_losses as usize));
        target.units.extend(spies);
        let garrison = target.garrison();

        debug!("{player:?} captured {to:?} from {previous_owner:?} with {garrison} units");
        out_events.push(Event::NodeCaptured {
            node: to,
            previous_owner,
            new_owner: player,
            garrison,
        });
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        for node in &mut self.nodes {
            for unit in &mut node.units {
                unit.moves_made = 0;
            }
        }
        if let Phase::SourceSelected(_) = self.phase {
            self.phase = Phase::AwaitingSelection;
            out_events.push(Event::SelectionCleared);
        }
        self.turn = self.turn.saturating_add(1);

        let Some(player) = self.current_player() else {
            return;
        };
        self.current = (self.current + 1) % self.players.len();
        let next_player = self.players[self.current].id;

        debug!("turn {} passes from {player:?} to {next_player:?}", self.turn);
        out_events.push(Event::TurnEnded {
            player,
            next_player,
            turn: self.turn,
        });
        self.produce(next_player, out_events);
    }

    fn produce(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let kind = self.combat_kind();
        for index in 0..self.nodes.len() {
            let state = &self.nodes[index];
            if !state.owner.is(player) || state.production_rate == 0 {
                continue;
            }
            let amount = state.production_rate;
            self.recruit(index, kind, amount);
            out_events.push(Event::UnitsProduced {
                node: NodeId::from_index(index),
                amount,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectNode { node, amount } => world.select_node(node, amount, out_events),
        Command::AttemptMove { from, to, amount } => {
            world.attempt_move(from, to, amount, out_events);
        }
        Command::EndTurn => world.end_turn(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{count, EngineRules, Phase, World};
    use conquest_core::{BoardView, Graph, NodeId, NodeSnapshot, Owner, Player, PlayerId, Unit};

    /// Captures the board as seen by the current player.
    ///
    /// Garrison sizes are only reported for nodes the current player owns.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView {
        let viewer = world.current_player();
        let selection = selection(world);
        let floor = world.rules.source_floor;

        let snapshots = world
            .nodes
            .iter()
            .enumerate()
            .map(|(index, state)| {
                let id = NodeId::from_index(index);
                let visible = viewer.map_or(false, |player| state.owner.is(player));
                NodeSnapshot {
                    id,
                    position: world.graph.position(id).unwrap_or_default(),
                    owner: state.owner,
                    garrison: visible.then(|| state.garrison()),
                    movable: visible.then(|| state.movable(floor)),
                    selected: selection == Some(id),
                    fallback: state.fallback,
                }
            })
            .collect();

        BoardView::from_parts(
            snapshots,
            world.graph.edges().to_vec(),
            viewer,
            world.turn,
            selection,
        )
    }

    /// Provides read-only access to the road network.
    #[must_use]
    pub fn graph(world: &World) -> &Graph {
        &world.graph
    }

    /// Players in turn order.
    #[must_use]
    pub fn players(world: &World) -> &[Player] {
        &world.players
    }

    /// Player whose turn is active, if the roster is not empty.
    #[must_use]
    pub fn current_player(world: &World) -> Option<PlayerId> {
        world.current_player()
    }

    /// Number of completed turns.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Stage of the selection state machine.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Node currently selected as move source.
    #[must_use]
    pub fn selection(world: &World) -> Option<NodeId> {
        match world.phase {
            Phase::SourceSelected(node) => Some(node),
            Phase::AwaitingSelection => None,
        }
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &EngineRules {
        &world.rules
    }

    /// Holder of the node.
    #[must_use]
    pub fn owner(world: &World, node: NodeId) -> Option<Owner> {
        world.node(node).map(|state| state.owner)
    }

    /// Units stationed at the node, regardless of who is looking.
    #[must_use]
    pub fn garrison(world: &World, node: NodeId) -> Option<u32> {
        world.node(node).map(|state| state.garrison())
    }

    /// Units that may still leave the node this turn.
    #[must_use]
    pub fn movable(world: &World, node: NodeId) -> Option<u32> {
        world
            .node(node)
            .map(|state| state.movable(world.rules.source_floor))
    }

    /// Units stationed at the node.
    #[must_use]
    pub fn units(world: &World, node: NodeId) -> Option<&[Unit]> {
        world.node(node).map(|state| state.units.as_slice())
    }

    /// Number of nodes held by each player, in turn order.
    #[must_use]
    pub fn player_node_counts(world: &World) -> Vec<(PlayerId, u32)> {
        world
            .players
            .iter()
            .map(|player| {
                let held = world
                    .nodes
                    .iter()
                    .filter(|state| state.owner.is(player.id))
                    .count();
                (player.id, count(held))
            })
            .collect()
    }

    /// The single player holding every node, if there is one.
    ///
    /// The world keeps accepting commands either way.
    #[must_use]
    pub fn sole_owner(world: &World) -> Option<PlayerId> {
        let first = world.nodes.first()?.owner.player()?;
        world
            .nodes
            .iter()
            .all(|state| state.owner.is(first))
            .then_some(first)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[derive(Clone, Debug)]
struct NodeState {
    owner: Owner,
    units: Vec<Unit>,
    production_rate: u32,
    fallback: bool,
}

impl NodeState {
    fn garrison(&self) -> u32 {
        count(self.units.len())
    }

    fn movable(&self, floor: SourceFloor) -> u32 {
        let ready = self.units.iter().filter(|unit| unit.can_move()).count();
        count(ready).min(self.garrison().saturating_sub(floor.reserved()))
    }

    /// Indices of up to `amount` units that may still move, combat units first.
    fn mover_indices(&self, amount: u32) -> Vec<usize> {
        let ready = |combat: bool| {
            self.units
                .iter()
                .enumerate()
                .filter(move |(_, unit)| unit.can_move() && unit.is_combat() == combat)
                .map(|(index, _)| index)
        };
        ready(true).chain(ready(false)).take(amount as usize).collect()
    }

    fn take(&mut self, indices: &[usize]) -> Vec<Unit> {
        let movers = indices.iter().map(|&index| self.units[index]).collect();
        let mut descending = indices.to_vec();
        descending.sort_unstable_by(|a, b| b.cmp(a));
        for index in descending {
            let _ = self.units.remove(index);
        }
        movers
    }

    fn remove_defenders(&mut self, losses: u32) {
        let mut remaining = losses;
        self.units.retain(|unit| {
            if remaining > 0 && unit.is_combat() {
                remaining -= 1;
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_core::Position;

    fn pair(first: NodeSeed, second: NodeSeed) -> World {
        let mut graph = Graph::new(vec![Position::new(0.0, 0.0), Position::new(100.0, 0.0)]);
        assert!(graph.insert_edge(NodeId::new(0), NodeId::new(1)));
        World::from_board(
            graph,
            &[first, second],
            Player::roster(2),
            EngineRules::default(),
            7,
        )
    }

    fn ours(garrison: u32) -> NodeSeed {
        NodeSeed::new(Owner::Player(PlayerId::new(0)), garrison)
    }

    #[test]
    fn movers_put_combat_units_first() {
        let mut world = pair(
            NodeSeed {
                spies: 2,
                ..ours(1)
            },
            ours(0),
        );
        let state = &world.nodes[0];
        assert_eq!(state.mover_indices(2), vec![0, 1]);
        assert!(state.units[0].is_combat());

        let taken = world.nodes[0].take(&[0, 2]);
        assert_eq!(taken.len(), 2);
        assert_eq!(world.nodes[0].units.len(), 1);
    }

    #[test]
    fn floor_reserves_one_unit() {
        let world = pair(ours(3), ours(0));
        let state = &world.nodes[0];
        assert_eq!(state.movable(SourceFloor::AllowEmpty), 3);
        assert_eq!(state.movable(SourceFloor::KeepOne), 2);
    }

    #[test]
    fn defenders_fall_before_spies() {
        let mut world = pair(
            ours(0),
            NodeSeed {
                spies: 1,
                ..NodeSeed::new(Owner::Neutral, 3)
            },
        );
        world.nodes[1].remove_defenders(2);
        let remaining = &world.nodes[1].units;
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining.iter().filter(|unit| unit.is_combat()).count(), 1);
    }

    #[test]
    fn missing_seeds_leave_nodes_neutral() {
        let graph = Graph::new(vec![Position::new(0.0, 0.0); 3]);
        let world = World::from_board(graph, &[ours(2)], Player::roster(2), EngineRules::default(), 0);
        assert_eq!(query::owner(&world, NodeId::new(2)), Some(Owner::Neutral));
        assert_eq!(query::garrison(&world, NodeId::new(2)), Some(0));
        assert_eq!(query::garrison(&world, NodeId::new(0)), Some(2));
    }

    #[test]
    fn empty_roster_still_counts_turns() {
        let graph = Graph::new(vec![Position::new(0.0, 0.0)]);
        let mut world = World::from_board(graph, &[], Vec::new(), EngineRules::default(), 0);
        let mut events = Vec::new();

        apply(&mut world, Command::EndTurn, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::turn(&world), 1);
        assert_eq!(query::current_player(&world), None);
    }
}
