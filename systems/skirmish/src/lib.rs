#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves a single attack on a hostile node.
//!
//! The system only counts losses. Callers decide which units leave the board:
//! losses are always taken from the front of each line, in the order the
//! stats were supplied.

use conquest_core::CombatStats;
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest random bonus added to each roll unless configured otherwise.
pub const DEFAULT_DICE_BONUS: u32 = 3;

fn default_dice_bonus() -> u32 {
    DEFAULT_DICE_BONUS
}

/// Rule used to settle an attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Attackers and defenders cancel out one for one.
    #[default]
    Attrition,
    /// Units duel one at a time with randomized rolls.
    Dice {
        /// Largest bonus added to a unit's stat on each roll.
        #[serde(default = "default_dice_bonus")]
        bonus: u32,
    },
}

/// Result of a single attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkirmishOutcome {
    /// Combat units committed by the attacker.
    pub attackers: u32,
    /// Combat units defending the node.
    pub defenders: u32,
    /// Attacking units removed, counted from the front of the line.
    pub attacker_losses: u32,
    /// Defending units removed, counted from the front of the line.
    pub defender_losses: u32,
}

impl SkirmishOutcome {
    /// Attacking units left standing.
    #[must_use]
    pub const fn surviving_attackers(&self) -> u32 {
        self.attackers - self.attacker_losses
    }

    /// Defending units left standing.
    #[must_use]
    pub const fn surviving_defenders(&self) -> u32 {
        self.defenders - self.defender_losses
    }

    /// Reports whether the attacker takes the node.
    #[must_use]
    pub const fn captured(&self) -> bool {
        self.surviving_attackers() > 0 && self.surviving_defenders() == 0
    }
}

/// Combat system that settles attacks using the configured [`Resolution`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Skirmish {
    resolution: Resolution,
}

impl Skirmish {
    /// Creates a combat system for the given rule.
    #[must_use]
    pub const fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Rule applied by the system.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Settles an attack between the given lines of combat units.
    ///
    /// Attrition never consumes randomness.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        attackers: &[CombatStats],
        defenders: &[CombatStats],
        rng: &mut R,
    ) -> SkirmishOutcome {
        let attacking = count(attackers);
        let defending = count(defenders);
        match self.resolution {
            Resolution::Attrition => attrition(attacking, defending),
            Resolution::Dice { bonus } => duel(attackers, defenders, bonus, rng),
        }
    }
}

fn count(units: &[CombatStats]) -> u32 {
    u32::try_from(units.len()).unwrap_or(u32::MAX)
}

fn attrition(attackers: u32, defenders: u32) -> SkirmishOutcome {
    let (attacker_losses, defender_losses) = if attackers > defenders {
        (defenders, defenders)
    } else {
        (attackers, attackers)
    };
    SkirmishOutcome {
        attackers,
        defenders,
        attacker_losses,
        defender_losses,
    }
}

fn duel<R: Rng + ?Sized>(
    attackers: &[CombatStats],
    defenders: &[CombatStats],
    bonus: u32,
    rng: &mut R,
) -> SkirmishOutcome {
    let mut outcome = SkirmishOutcome {
        attackers: count(attackers),
        defenders: count(defenders),
        ..SkirmishOutcome::default()
    };

    let mut attacker = attackers.iter();
    let mut defender = defenders.iter();
    let mut front = (attacker.next(), defender.next());
    while let (Some(attacking), Some(defending)) = front {
        let attack_roll = attacking.attack + rng.gen_range(0..=bonus);
        let defense_roll = defending.defense + rng.gen_range(0..=bonus);
        trace!("duel roll {attack_roll} against {defense_roll}");

        // Ties hold the node.
        if attack_roll > defense_roll {
            outcome.defender_losses += 1;
            front.1 = defender.next();
        } else {
            outcome.attacker_losses += 1;
            front.0 = attacker.next();
        }
    }

    outcome
}
