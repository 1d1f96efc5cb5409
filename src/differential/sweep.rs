use std::fmt::{Debug, Display};

use rand::Rng;
use tracing::{trace, warn};

use crate::dispatch::compare_backends;
use crate::error::Result;
use crate::mask::MaskOp;
use crate::numerics::{Element, ElementKind};
use crate::species::{Species, SpeciesDescriptor};
use crate::statistics::DifferentialStats;
use crate::vector::{BinaryOp, Comparison, LaneOperator, ReductionOp, TernaryOp, UnaryOp};

use super::SweepInputs;

/// Runs `f` under both backends and records whether the results agree.
fn check<R: PartialEq + Debug>(
    species: &impl Display,
    label: &str,
    stats: &mut DifferentialStats,
    f: impl Fn() -> R,
) -> bool {
    let (scalar, portable) = compare_backends(f);
    let agreed = scalar == portable;
    let op = format!("{species}/{label}");
    if !agreed {
        warn!(%op, ?scalar, ?portable, "backends disagree");
    }
    stats.record(&op, agreed);
    agreed
}

/// Compares every supported operation of the vector API on one set of inputs.
/// Returns the number of disagreeing operations.
pub fn sweep<E: Element>(inputs: &SweepInputs<E>, stats: &mut DifferentialStats) -> usize {
    let species = inputs.species();
    let kind = E::KIND;
    let SweepInputs {
        a,
        b,
        c,
        mask,
        other_mask,
        shuffle,
        origin,
    } = inputs;
    let mut agreed = Vec::new();
    stats.bump_cases();

    for op in UnaryOp::ALL.into_iter().filter(|op| op.supports(kind)) {
        agreed.push(check(&species, op.name(), stats, || a.lanewise_unary(op)));
        let label = format!("{}_masked", op.name());
        agreed.push(check(&species, &label, stats, || {
            a.lanewise_unary_masked(op, mask)
        }));
    }

    for op in BinaryOp::ALL.into_iter().filter(|op| op.supports(kind)) {
        agreed.push(check(&species, op.name(), stats, || a.lanewise(op, b)));
        let label = format!("{}_masked", op.name());
        agreed.push(check(&species, &label, stats, || {
            a.lanewise_masked(op, b, mask)
        }));
    }

    for op in TernaryOp::ALL.into_iter().filter(|op| op.supports(kind)) {
        agreed.push(check(&species, op.name(), stats, || {
            a.lanewise_ternary(op, b, c)
        }));
    }

    for op in Comparison::ALL.into_iter().filter(|op| op.supports(kind)) {
        agreed.push(check(&species, op.name(), stats, || a.compare(op, b)));
        let label = format!("{}_masked", op.name());
        agreed.push(check(&species, &label, stats, || {
            a.compare_masked(op, b, mask)
        }));
    }

    for op in ReductionOp::ALL.into_iter().filter(|op| op.supports(kind)) {
        // NaN results only agree bitwise.
        agreed.push(check(&species, op.name(), stats, || {
            a.reduce_lanes(op).map(Element::to_bits)
        }));
        let label = format!("{}_masked", op.name());
        agreed.push(check(&species, &label, stats, || {
            a.reduce_lanes_masked(op, mask).map(Element::to_bits)
        }));
    }

    agreed.push(check(&species, "blend", stats, || a.blend(b, mask)));
    agreed.push(check(&species, "rearrange", stats, || {
        a.rearrange(&shuffle.wrap_indexes())
    }));
    agreed.push(check(&species, "rearrange_masked", stats, || {
        a.rearrange_masked(shuffle, mask)
    }));
    agreed.push(check(&species, "rearrange_with", stats, || {
        a.rearrange_with(shuffle, b)
    }));
    agreed.push(check(&species, "slice", stats, || a.slice(*origin, b)));
    agreed.push(check(&species, "compress", stats, || a.compress(mask)));
    agreed.push(check(&species, "expand", stats, || a.expand(mask)));

    for op in MaskOp::ALL {
        let label = format!("mask_{op:?}").to_lowercase();
        agreed.push(check(&species, &label, stats, || {
            mask.combine(op, other_mask)
        }));
    }
    agreed.push(check(&species, "mask_not", stats, || mask.not()));

    let mismatches = agreed.iter().filter(|ok| !**ok).count();
    trace!(%species, checked = agreed.len(), mismatches, "swept case");
    mismatches
}

/// Sweeps one random case at the species named by `desc`.
pub fn sweep_descriptor(
    desc: SpeciesDescriptor,
    rng: &mut impl Rng,
    stats: &mut DifferentialStats,
) -> Result<usize> {
    fn run<E: Element>(
        desc: SpeciesDescriptor,
        rng: &mut impl Rng,
        stats: &mut DifferentialStats,
    ) -> Result<usize> {
        let species = Species::<E>::from_descriptor(desc)?;
        Ok(sweep(&SweepInputs::random(species, rng), stats))
    }

    match desc.kind() {
        ElementKind::I8 => run::<i8>(desc, rng, stats),
        ElementKind::I16 => run::<i16>(desc, rng, stats),
        ElementKind::I32 => run::<i32>(desc, rng, stats),
        ElementKind::I64 => run::<i64>(desc, rng, stats),
        ElementKind::F32 => run::<f32>(desc, rng, stats),
        ElementKind::F64 => run::<f64>(desc, rng, stats),
    }
}

/// Sweeps one case whose vector operands come from recorded rows.
pub fn replay_descriptor(
    desc: SpeciesDescriptor,
    rows: [&[f32]; 3],
    rng: &mut impl Rng,
    stats: &mut DifferentialStats,
) -> Result<usize> {
    fn run<E: Element>(
        desc: SpeciesDescriptor,
        rows: [&[f32]; 3],
        rng: &mut impl Rng,
        stats: &mut DifferentialStats,
    ) -> Result<usize> {
        let species = Species::<E>::from_descriptor(desc)?;
        Ok(sweep(&SweepInputs::from_rows(species, rows, rng), stats))
    }

    match desc.kind() {
        ElementKind::I8 => run::<i8>(desc, rows, rng, stats),
        ElementKind::I16 => run::<i16>(desc, rows, rng, stats),
        ElementKind::I32 => run::<i32>(desc, rows, rng, stats),
        ElementKind::I64 => run::<i64>(desc, rows, rng, stats),
        ElementKind::F32 => run::<f32>(desc, rows, rng, stats),
        ElementKind::F64 => run::<f64>(desc, rows, rng, stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Shape;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_backends_agree_on_every_kind() {
        let mut rng = StdRng::seed_from_u64(1337);
        let mut stats = DifferentialStats::new();
        for kind in ElementKind::ALL {
            for shape in [Shape::S128Bit, Shape::S512Bit, Shape::scalable(320).unwrap()] {
                let desc = SpeciesDescriptor::new(kind, shape);
                for _ in 0..4 {
                    assert_eq!(sweep_descriptor(desc, &mut rng, &mut stats), Ok(0));
                }
            }
        }
        assert_eq!(stats.get_cases(), 6 * 3 * 4);
        assert_eq!(stats.get_mismatched(), 0);
        assert!(stats.mismatched_ops().is_empty());
    }

    #[test]
    fn test_labels_name_species_and_op() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stats = DifferentialStats::new();
        let desc = SpeciesDescriptor::new(ElementKind::I32, Shape::S128Bit);
        sweep_descriptor(desc, &mut rng, &mut stats).unwrap();
        assert_eq!(stats.get_tally("i32x4 (128-bit)/add").checked, 1);
        assert_eq!(stats.get_tally("i32x4 (128-bit)/mask_andnot").checked, 1);
        // sqrt is floating only
        assert_eq!(stats.get_tally("i32x4 (128-bit)/sqrt").checked, 0);
    }

    #[test]
    fn test_replay_rows() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut stats = DifferentialStats::new();
        let row: &[f32] = &[1.5, f32::NAN, -0.0, 7.25];
        let desc = SpeciesDescriptor::new(ElementKind::F64, Shape::S256Bit);
        assert_eq!(replay_descriptor(desc, [row, row, row], &mut rng, &mut stats), Ok(0));
        assert_eq!(stats.get_cases(), 1);
    }
}
