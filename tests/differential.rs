use lanewise::{
    ElementKind, Shape, SpeciesDescriptor,
    differential::{SweepInputs, sweep, sweep_descriptor},
    species::Species,
    statistics::DifferentialStats,
};
use rand::{SeedableRng, rngs::StdRng};

fn test_seed() -> u64 {
    std::env::var("LANEWISE_TEST_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1337)
}

#[test]
fn test_all_species_agree() {
    let mut rng = StdRng::seed_from_u64(test_seed());
    let mut stats = DifferentialStats::new();
    let shapes = Shape::FIXED
        .into_iter()
        .chain([64, 192, 384, 512].map(|bits| Shape::scalable(bits).unwrap()));

    for shape in shapes {
        for kind in ElementKind::ALL {
            let desc = SpeciesDescriptor::new(kind, shape);
            for _ in 0..25 {
                sweep_descriptor(desc, &mut rng, &mut stats).unwrap();
            }
        }
    }

    assert_eq!(stats.get_mismatched(), 0, "{:?}", stats.mismatched_ops());
    assert!(stats.get_checked() > stats.get_cases());
}

#[test]
fn test_special_float_operands_agree() {
    let species = Species::<f32>::of(Shape::S256Bit);
    let mut rng = StdRng::seed_from_u64(test_seed());
    let nan_row = [f32::NAN, -0.0, 0.0, f32::INFINITY, f32::NEG_INFINITY, 1.0, -1.0, f32::MIN_POSITIVE];
    let mut reversed = nan_row;
    reversed.reverse();

    let inputs = SweepInputs::from_rows(species, [&nan_row[..], &reversed[..], &[0.5][..]], &mut rng);
    let mut stats = DifferentialStats::new();
    assert_eq!(sweep(&inputs, &mut stats), 0);
}
