#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board generation pipeline that prepares a playable Conquest world.
//!
//! Generation runs once, start to finish: nodes are placed, partitioned
//! between players, joined by roads and repaired into a single component.
//! Every random draw comes from one stream seeded by
//! [`GeneratorConfig::seed`], so a seed reproduces the board exactly.

use conquest_core::{Graph, Owner, Player, PlayerId, Position};
use conquest_system_connectivity::RepairError;
use conquest_system_graph_builder::{GraphBuilder, GraphStrategy};
use conquest_system_ownership::{node_counts, OwnershipAssigner, OwnershipPolicy};
use conquest_system_placement::{Bounds, LatticeSampler, NodePlacer, Placement};
use conquest_world::{EngineRules, NodeSeed, World};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when no seed is configured.
pub const DEFAULT_SEED: u64 = 0x6a09_e667_f3bc_c908;

/// Knobs that shape a generated board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed of the generation and combat random streams.
    pub seed: u64,
    /// Number of nodes on the board.
    pub node_count: usize,
    /// Number of players sharing the nodes.
    pub player_count: usize,
    /// Width of the board.
    pub width: f32,
    /// Height of the board.
    pub height: f32,
    /// Distance kept between nodes and the board edge.
    pub margin: f32,
    /// Minimum distance between nodes. Doubles as the lattice spacing.
    pub min_distance: f32,
    /// Candidate positions drawn before placement gives up on spacing.
    pub max_attempts: u32,
    /// Road synthesis strategy.
    pub strategy: GraphStrategy,
    /// Ownership partition policy.
    pub ownership: OwnershipPolicy,
    /// Combat units stationed at every node.
    pub initial_garrison: u32,
    /// Spies stationed at every node.
    pub spies_per_node: u32,
    /// Combat units every node produces at the start of its owner's turn.
    pub production_rate: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            node_count: 15,
            player_count: 2,
            width: 900.0,
            height: 700.0,
            margin: 80.0,
            min_distance: 130.0,
            max_attempts: 5_000,
            strategy: GraphStrategy::default(),
            ownership: OwnershipPolicy::default(),
            initial_garrison: 1,
            spies_per_node: 0,
            production_rate: 0,
        }
    }
}

impl GeneratorConfig {
    /// Area nodes are placed in.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height, self.margin)
    }

    /// Rejects configurations that cannot produce a board.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.node_count == 0 {
            return Err(GenerationError::NoNodes);
        }
        if self.player_count == 0 {
            return Err(GenerationError::NoPlayers);
        }
        if !self.bounds().is_usable() {
            return Err(GenerationError::BoundsTooSmall {
                width: self.width,
                height: self.height,
                margin: self.margin,
            });
        }
        if let Some(fraction) = self.strategy.prune_fraction() {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(GenerationError::PruneFraction(fraction));
            }
        }
        Ok(())
    }
}

/// Complete configuration: how the board is generated and how it is played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board generation settings.
    pub generator: GeneratorConfig,
    /// Movement and combat rules.
    pub rules: EngineRules,
}

/// Failures that abort board generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The configuration asked for an empty board.
    #[error("a board needs at least one node")]
    NoNodes,
    /// The configuration asked for nobody to play.
    #[error("a board needs at least one player")]
    NoPlayers,
    /// The margin swallows the whole board.
    #[error("a {width}x{height} board leaves no room inside a margin of {margin}")]
    BoundsTooSmall {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
        /// Configured margin.
        margin: f32,
    },
    /// A pruning strategy was asked to remove an impossible share of roads.
    #[error("prune fraction {0} lies outside [0, 1]")]
    PruneFraction(f32),
    /// The road network could not be repaired.
    #[error(transparent)]
    Repair(#[from] RepairError),
    /// The road network came out fragmented.
    #[error("generated board is split into {components} components")]
    Disconnected {
        /// Number of components in the generated network.
        components: usize,
    },
}

/// Generated board prior to play.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    /// Where each node was placed, indexed by node.
    pub placements: Vec<Placement>,
    /// Initial holder of each node, indexed by node.
    pub owners: Vec<Owner>,
    /// Connected road network.
    pub graph: Graph,
    /// Players in turn order.
    pub players: Vec<Player>,
}

impl Board {
    /// Initial node states for a board generated with `config`.
    #[must_use]
    pub fn node_seeds(&self, config: &GeneratorConfig) -> Vec<NodeSeed> {
        self.placements
            .iter()
            .zip(&self.owners)
            .map(|(placement, owner)| NodeSeed {
                owner: *owner,
                garrison: config.initial_garrison,
                spies: config.spies_per_node,
                production_rate: config.production_rate,
                fallback: placement.fallback,
            })
            .collect()
    }

    /// Number of nodes held by each player, in turn order.
    #[must_use]
    pub fn node_counts(&self) -> Vec<usize> {
        let players: Vec<PlayerId> = self.players.iter().map(|player| player.id).collect();
        node_counts(&self.owners, &players)
    }
}

/// Runs the generation pipeline for a configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    /// Creates a pipeline for the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration driving the pipeline.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Generates a connected board.
    pub fn generate_board(&self) -> Result<Board, GenerationError> {
        let generator = &self.config.generator;
        generator.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(generator.seed);
        let bounds = generator.bounds();

        let placements = match generator.strategy {
            GraphStrategy::Lattice { shape, .. } => LatticeSampler::new(generator.min_distance, shape)
                .place(generator.node_count, bounds, &mut rng),
            GraphStrategy::SpanningTree { .. } | GraphStrategy::Triangulation { .. } => {
                NodePlacer::new(generator.min_distance, generator.max_attempts).place(
                    generator.node_count,
                    bounds,
                    &mut rng,
                )
            }
        };

        let players = Player::roster(generator.player_count);
        let player_ids: Vec<PlayerId> = players.iter().map(|player| player.id).collect();
        let positions: Vec<Position> = placements.iter().map(|placement| placement.position).collect();
        let owners = OwnershipAssigner::new(generator.ownership).assign(&positions, &player_ids, &mut rng);

        let graph = GraphBuilder::new(generator.strategy).build(&placements, &owners, &mut rng)?;
        let components = graph.components().len();
        if components > 1 {
            return Err(GenerationError::Disconnected { components });
        }

        let board = Board {
            placements,
            owners,
            graph,
            players,
        };
        info!(
            "generated {} nodes, {} roads, {} fallback placements, ownership {:?} (seed {:#x})",
            board.graph.node_count(),
            board.graph.edges().len(),
            board.placements.iter().filter(|placement| placement.fallback).count(),
            board.node_counts(),
            generator.seed
        );
        Ok(board)
    }

    /// Generates a board and wraps it in a world ready for play.
    pub fn build_world(&self) -> Result<World, GenerationError> {
        let board = self.generate_board()?;
        Ok(self.world_from(board))
    }

    /// Wraps an already generated board in a world ready for play.
    #[must_use]
    pub fn world_from(&self, board: Board) -> World {
        let seeds = board.node_seeds(&self.config.generator);
        World::from_board(
            board.graph,
            &seeds,
            board.players,
            self.config.rules,
            self.config.generator.seed,
        )
    }
}
