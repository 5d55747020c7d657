//! Loss accounting properties of attack resolution.

use conquest_core::CombatStats;
use conquest_system_skirmish::{Resolution, Skirmish};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn resolution() -> impl Strategy<Value = Resolution> {
    prop_oneof![
        Just(Resolution::Attrition),
        (0u32..6).prop_map(|bonus| Resolution::Dice { bonus }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// One side is always wiped out and losses never exceed the lines.
    #[test]
    fn prop_losses_stay_within_lines(
        attackers in 1usize..30,
        defenders in 0usize..30,
        seed in any::<u64>(),
        resolution in resolution(),
    ) {
        let attacking = vec![CombatStats::default(); attackers];
        let defending = vec![CombatStats::default(); defenders];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let outcome = Skirmish::new(resolution).resolve(&attacking, &defending, &mut rng);

        prop_assert!(outcome.attacker_losses <= outcome.attackers);
        prop_assert!(outcome.defender_losses <= outcome.defenders);
        prop_assert!(outcome.surviving_attackers() == 0 || outcome.surviving_defenders() == 0);
        prop_assert_eq!(outcome.captured(), outcome.surviving_attackers() > 0);
    }

    /// Attrition matches the scalar capture rule.
    #[test]
    fn prop_attrition_matches_scalar_rule(attackers in 1usize..50, defenders in 0usize..50) {
        let attacking = vec![CombatStats::default(); attackers];
        let defending = vec![CombatStats::default(); defenders];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = Skirmish::new(Resolution::Attrition).resolve(&attacking, &defending, &mut rng);

        if attackers > defenders {
            prop_assert!(outcome.captured());
            prop_assert_eq!(outcome.surviving_attackers() as usize, attackers - defenders);
        } else {
            prop_assert!(!outcome.captured());
            prop_assert_eq!(outcome.surviving_defenders() as usize, defenders - attackers);
        }
    }
}

#[test]
fn dice_rolls_repeat_for_the_same_seed() {
    let skirmish = Skirmish::new(Resolution::Dice { bonus: 3 });
    let attacking = vec![CombatStats::default(); 12];
    let defending = vec![CombatStats::default(); 9];

    let first = skirmish.resolve(&attacking, &defending, &mut ChaCha8Rng::seed_from_u64(99));
    let second = skirmish.resolve(&attacking, &defending, &mut ChaCha8Rng::seed_from_u64(99));

    assert_eq!(first, second);
}

#[derive(Debug, serde::Deserialize)]
struct Rules {
    resolution: Resolution,
}

#[test]
fn dice_bonus_defaults_when_omitted() {
    let rules: Rules =
        toml::from_str("[resolution]\nkind = \"dice\"\n").expect("dice resolution parses");
    assert_eq!(rules.resolution, Resolution::Dice { bonus: 3 });

    let rules: Rules =
        toml::from_str("[resolution]\nkind = \"attrition\"\n").expect("attrition parses");
    assert_eq!(rules.resolution, Resolution::Attrition);
}
