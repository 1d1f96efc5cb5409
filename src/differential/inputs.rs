use rand::Rng;
use rand_distr::StandardNormal;

use crate::mask::Mask;
use crate::numerics::{Element, ScalarValue};
use crate::shuffle::Shuffle;
use crate::species::Species;
use crate::vector::Vector;

/// Floating values that stress ordering, sign and propagation rules.
const FLOATING_SPECIALS: [f64; 6] = [
    f64::NAN,
    0.0,
    -0.0,
    f64::INFINITY,
    f64::NEG_INFINITY,
    1.0,
];

/// Odds that a lane is drawn from the special values instead.
const SPECIAL_PROBABILITY: f64 = 0.1;

/// One random lane. Floating lanes are Gaussian (scaled to exercise rounding)
/// with occasional specials, integral lanes are uniform over all bit patterns
/// with occasional small values so that zero divisors and tiny shift counts show up.
pub fn random_lane<E: Element>(rng: &mut impl Rng) -> E {
    let special = rng.random_bool(SPECIAL_PROBABILITY);
    if E::KIND.is_floating() {
        let value = if special {
            FLOATING_SPECIALS[rng.random_range(0..FLOATING_SPECIALS.len())]
        } else {
            rng.sample::<f64, _>(StandardNormal) * 1000.0
        };
        E::from_scalar(ScalarValue::Floating(value))
    } else if special {
        E::from_index(rng.random_range(-2..=2))
    } else {
        E::from_bits(rng.random())
    }
}

pub fn random_vector<E: Element>(species: Species<E>, rng: &mut impl Rng) -> Vector<E> {
    Vector::from_fn(species, |_| random_lane(rng))
}

pub fn random_mask<E: Element>(species: Species<E>, rng: &mut impl Rng) -> Mask<E> {
    Mask::from_bits(species, rng.random())
}

/// Entries drawn from `[-lane_count, lane_count)`, half of them exceptional on average.
pub fn random_shuffle<E: Element>(species: Species<E>, rng: &mut impl Rng) -> Shuffle<E> {
    let n = species.lane_count() as i32;
    Shuffle::from_fn(species, |_| rng.random_range(-n..n))
}

/// A vector whose lanes are read cyclically from a recorded row.
pub fn vector_from_row<E: Element>(species: Species<E>, row: &[f32]) -> Vector<E> {
    if row.is_empty() {
        return Vector::zero(species);
    }
    Vector::from_fn(species, |i| {
        E::from_scalar(ScalarValue::Floating(row[i % row.len()] as f64))
    })
}

/// Operands for one differential case.
#[derive(Debug, Clone)]
pub struct SweepInputs<E: Element> {
    pub a: Vector<E>,
    pub b: Vector<E>,
    pub c: Vector<E>,
    pub mask: Mask<E>,
    pub other_mask: Mask<E>,
    pub shuffle: Shuffle<E>,
    pub origin: usize,
}

impl<E: Element> SweepInputs<E> {
    pub fn random(species: Species<E>, rng: &mut impl Rng) -> Self {
        let a = random_vector(species, rng);
        let b = random_vector(species, rng);
        let c = random_vector(species, rng);
        SweepInputs::with_vectors(a, b, c, rng)
    }

    /// Vector operands from three recorded rows, masks and shuffles still random.
    pub fn from_rows(species: Species<E>, rows: [&[f32]; 3], rng: &mut impl Rng) -> Self {
        let [a, b, c] = rows.map(|row| vector_from_row(species, row));
        SweepInputs::with_vectors(a, b, c, rng)
    }

    fn with_vectors(a: Vector<E>, b: Vector<E>, c: Vector<E>, rng: &mut impl Rng) -> Self {
        let species = a.species();
        SweepInputs {
            a,
            b,
            c,
            mask: random_mask(species, rng),
            other_mask: random_mask(species, rng),
            shuffle: random_shuffle(species, rng),
            origin: rng.random_range(0..=species.lane_count()),
        }
    }

    pub fn species(&self) -> Species<E> {
        self.a.species()
    }
}
