//! Deterministic public parameters.
//!
//! Every generator is `hash_to_point_from_index(DOMAIN, i)`: the Pedersen bases at `0` and `1`,
//! the inner-product base `u` at `2`, the transcript seed `cs` at `3`, then the `g` vector and
//! the `h` vector (`MAX_EXP * MAX_OUTPUT_COIN` points each). Prover and verifier must derive
//! identical parameters.

use super::{
    curve::{hash_to_point_from_index, Point, Scalar},
    MAX_EXP, MAX_OUTPUT_COIN,
};
use ark_bn254::G1Affine;
use ark_ec::CurveGroup;
use rayon::prelude::*;
use std::sync::OnceLock;
use tracing::debug;

/// Domain separation tag of the generator family.
pub const DOMAIN: &[u8] = b"PRIVCORE_BULLETPROOFS_GENERATORS";

/// Number of points in each of the `g` and `h` vectors.
pub const VECTOR_LENGTH: usize = MAX_EXP * MAX_OUTPUT_COIN;

const INDEX_B: u64 = 0;
const INDEX_B_BLINDING: u64 = 1;
const INDEX_U: u64 = 2;
const INDEX_CS: u64 = 3;
const INDEX_VECTORS: u64 = 4;

/// The public parameters of the range proof.
pub struct Generators {
    /// Pedersen base for values.
    pub b: Point,
    /// Pedersen base for blinding factors.
    pub b_blinding: Point,
    /// Base of the inner product term.
    pub u: Point,
    /// Seed point of every transcript.
    pub cs: Point,

    g: Vec<G1Affine>,
    h: Vec<G1Affine>,
}

impl Generators {
    fn derive() -> Self {
        let vector = |offset: u64| -> Vec<G1Affine> {
            let points: Vec<Point> = (0..VECTOR_LENGTH as u64)
                .into_par_iter()
                .map(|k| hash_to_point_from_index(DOMAIN, offset + k))
                .collect();
            Point::normalize_batch(&points)
        };
        let generators = Self {
            b: hash_to_point_from_index(DOMAIN, INDEX_B),
            b_blinding: hash_to_point_from_index(DOMAIN, INDEX_B_BLINDING),
            u: hash_to_point_from_index(DOMAIN, INDEX_U),
            cs: hash_to_point_from_index(DOMAIN, INDEX_CS),
            g: vector(INDEX_VECTORS),
            h: vector(INDEX_VECTORS + VECTOR_LENGTH as u64),
        };
        debug!(vector_length = VECTOR_LENGTH, "derived generators");
        generators
    }

    /// Returns the first `n` points of the `g` vector.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [VECTOR_LENGTH].
    pub fn g(&self, n: usize) -> &[G1Affine] {
        &self.g[..n]
    }

    /// Returns the first `n` points of the `h` vector.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [VECTOR_LENGTH].
    pub fn h(&self, n: usize) -> &[G1Affine] {
        &self.h[..n]
    }

    /// Computes the Pedersen commitment `value * B + blinding * B~`.
    pub fn commit(&self, value: u64, blinding: &Scalar) -> Point {
        self.b * Scalar::from(value) + self.b_blinding * blinding
    }
}

/// Returns the process-wide parameters, deriving them on first use.
pub fn generators() -> &'static Generators {
    static GENERATORS: OnceLock<Generators> = OnceLock::new();
    GENERATORS.get_or_init(Generators::derive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulletproofs::curve::compress;
    use ark_ec::AffineRepr;
    use std::collections::HashSet;

    #[test]
    fn test_generators_deterministic() {
        let gens = generators();
        assert_eq!(gens.b, hash_to_point_from_index(DOMAIN, 0));
        assert_eq!(gens.cs, hash_to_point_from_index(DOMAIN, 3));
        assert_eq!(
            gens.g(1)[0].into_group(),
            hash_to_point_from_index(DOMAIN, 4)
        );
        assert_eq!(
            gens.h(VECTOR_LENGTH)[VECTOR_LENGTH - 1].into_group(),
            hash_to_point_from_index(DOMAIN, 4 + 2 * VECTOR_LENGTH as u64 - 1)
        );
    }

    #[test]
    fn test_generators_distinct() {
        let gens = generators();
        let mut seen = HashSet::new();
        for p in [gens.b, gens.b_blinding, gens.u, gens.cs] {
            assert!(seen.insert(*compress(&p).as_bytes()));
        }
        for p in gens.g(VECTOR_LENGTH).iter().chain(gens.h(VECTOR_LENGTH)) {
            assert!(p.is_on_curve());
            assert!(seen.insert(*compress(&p.into_group()).as_bytes()));
        }
        assert_eq!(seen.len(), 4 + 2 * VECTOR_LENGTH);
    }

    #[test]
    fn test_commit_homomorphic() {
        let gens = generators();
        let (r1, r2) = (Scalar::from(5u64), Scalar::from(9u64));
        let sum = gens.commit(3, &r1) + gens.commit(4, &r2);
        assert_eq!(sum, gens.commit(7, &(r1 + r2)));
    }
}
