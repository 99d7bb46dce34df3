//! Vector helpers shared by the prover and verifiers.

use super::{
    curve::{Point, Scalar},
    Error,
};
use ark_bn254::G1Affine;
use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::{One, Zero};
use rayon::prelude::*;

fn check_lengths(expected: usize, actual: usize) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::VectorLengthMismatch { expected, actual });
    }
    Ok(())
}

/// Computes `<a, b>`.
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Result<Scalar, Error> {
    check_lengths(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(a, b)| *a * b).sum())
}

/// Computes powers of a scalar: `[1, s, s^2, ..., s^(n-1)]`.
pub fn powers(s: &Scalar, n: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(n);
    let mut current = Scalar::one();
    for _ in 0..n {
        powers.push(current);
        current *= s;
    }
    powers
}

/// Computes `sum_i scalars[i] * bases[i]`.
pub fn msm(bases: &[G1Affine], scalars: &[Scalar]) -> Result<Point, Error> {
    check_lengths(bases.len(), scalars.len())?;
    Ok(Point::msm_unchecked(bases, scalars))
}

/// Computes `sum_i scalars[i] * points[i]` over projective points.
pub fn msm_projective(points: &[Point], scalars: &[Scalar]) -> Result<Point, Error> {
    check_lengths(points.len(), scalars.len())?;
    Ok(Point::msm_unchecked(&Point::normalize_batch(points), scalars))
}

/// Computes `lo[i] * x_lo + hi[i] * x_hi` for every `i`.
pub fn fold_points(
    lo: &[Point],
    hi: &[Point],
    x_lo: &Scalar,
    x_hi: &Scalar,
) -> Result<Vec<Point>, Error> {
    check_lengths(lo.len(), hi.len())?;
    Ok(lo
        .par_iter()
        .zip(hi.par_iter())
        .map(|(lo, hi)| *lo * x_lo + *hi * x_hi)
        .collect())
}

/// Computes `lo[i] * x_lo + hi[i] * x_hi` for every `i`.
pub fn fold_scalars(
    lo: &[Scalar],
    hi: &[Scalar],
    x_lo: &Scalar,
    x_hi: &Scalar,
) -> Result<Vec<Scalar>, Error> {
    check_lengths(lo.len(), hi.len())?;
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(lo, hi)| *lo * x_lo + *hi * x_hi)
        .collect())
}

/// Returns whether `n` is a non-zero power of two.
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Returns `sum_i points[i]`.
pub fn sum(points: &[G1Affine]) -> Point {
    points.iter().fold(Point::zero(), |acc, p| acc + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::Group;

    fn scalars(values: &[u64]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::from(*v)).collect()
    }

    #[test]
    fn test_inner_product() {
        let a = scalars(&[1, 2, 3]);
        let b = scalars(&[4, 5, 6]);
        assert_eq!(inner_product(&a, &b).unwrap(), Scalar::from(32u64));
        assert!(matches!(
            inner_product(&a, &b[..2]),
            Err(Error::VectorLengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(inner_product(&[], &[]).unwrap(), Scalar::zero());
    }

    #[test]
    fn test_powers() {
        assert_eq!(powers(&Scalar::from(3u64), 4), scalars(&[1, 3, 9, 27]));
        assert!(powers(&Scalar::from(3u64), 0).is_empty());
    }

    #[test]
    fn test_msm() {
        let g = Point::generator();
        let points = vec![g, g.double(), g * Scalar::from(5u64)];
        let coefficients = scalars(&[1, 2, 3]);

        // 1 + 4 + 15 = 20
        let expected = g * Scalar::from(20u64);
        assert_eq!(msm_projective(&points, &coefficients).unwrap(), expected);
        let affine = Point::normalize_batch(&points);
        assert_eq!(msm(&affine, &coefficients).unwrap(), expected);
        assert_eq!(sum(&affine), g * Scalar::from(8u64));

        assert!(msm(&affine[..2], &coefficients).is_err());
    }

    #[test]
    fn test_fold() {
        let g = Point::generator();
        let (x, y) = (Scalar::from(2u64), Scalar::from(3u64));
        let folded = fold_points(&[g, g], &[g.double(), g], &x, &y).unwrap();
        assert_eq!(folded, vec![g * Scalar::from(8u64), g * Scalar::from(5u64)]);
        assert!(fold_points(&[g], &[], &x, &y).is_err());

        let folded = fold_scalars(&scalars(&[1]), &scalars(&[4]), &x, &y).unwrap();
        assert_eq!(folded, scalars(&[14]));
    }

    #[test]
    fn test_is_power_of_two() {
        assert!(!is_power_of_two(0));
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(64));
        assert!(!is_power_of_two(96));
    }
}
