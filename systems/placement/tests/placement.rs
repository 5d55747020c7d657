use conquest_system_placement::{Bounds, LatticeSampler, LatticeShape, NodePlacer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn default_board_places_fifteen_spaced_nodes() {
    let placer = NodePlacer::new(130.0, 5_000);
    let bounds = Bounds::new(900.0, 700.0, 80.0);

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let placements = placer.place(15, bounds, &mut rng);
        assert_eq!(placements.len(), 15);

        for (index, first) in placements.iter().enumerate() {
            assert!(bounds.contains(first.position));
            for second in &placements[index + 1..] {
                let spaced = first.position.distance(second.position) >= 130.0;
                assert!(
                    spaced || first.fallback || second.fallback,
                    "seed {seed}: unspaced pair without fallback flag"
                );
            }
        }
    }
}

#[test]
fn exhausted_budget_flags_remaining_nodes() {
    let placer = NodePlacer::new(500.0, 200);
    let bounds = Bounds::new(900.0, 700.0, 80.0);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let placements = placer.place(10, bounds, &mut rng);

    assert_eq!(placements.len(), 10, "placement must never under-fill");
    let fallbacks = placements.iter().filter(|placement| placement.fallback).count();
    assert!(fallbacks > 0, "a 500 unit spacing cannot fit ten nodes");
    assert!(
        placements
            .iter()
            .skip_while(|placement| !placement.fallback)
            .all(|placement| placement.fallback),
        "fallback nodes are placed after every spaced node"
    );
}

#[test]
fn zero_nodes_yield_empty_placement() {
    let placer = NodePlacer::new(130.0, 5_000);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(placer
        .place(0, Bounds::new(900.0, 700.0, 80.0), &mut rng)
        .is_empty());
}

#[test]
fn lattice_sampler_uses_distinct_sites() {
    let sampler = LatticeSampler::new(130.0, LatticeShape::Hex);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let placements = sampler.place(15, Bounds::new(900.0, 700.0, 80.0), &mut rng);

    assert_eq!(placements.len(), 15);
    let mut coords: Vec<_> = placements
        .iter()
        .map(|placement| placement.lattice.expect("lattice site"))
        .collect();
    coords.dedup();
    assert_eq!(coords.len(), 15, "sites are sorted so duplicates would be adjacent");
}

#[test]
fn lattice_shortfall_falls_back_to_scatter() {
    let sampler = LatticeSampler::new(200.0, LatticeShape::Square);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let placements = sampler.place(10, Bounds::new(500.0, 500.0, 50.0), &mut rng);

    assert_eq!(placements.len(), 10);
    let on_lattice = placements
        .iter()
        .filter(|placement| placement.lattice.is_some())
        .count();
    assert_eq!(on_lattice, 9);
    assert!(placements[9].fallback);
}
