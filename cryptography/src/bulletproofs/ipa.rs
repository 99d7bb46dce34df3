//! Inner-product argument.
//!
//! Proves knowledge of `a`, `b` (length `n`, a power of two) such that
//! `P = <a, G> + <b, H> + <a, b> * U` in `log2(n)` rounds. Each round commits to the cross terms
//!
//! ```text
//! L = <a_lo, G_hi> + <b_hi, H_lo> + <a_lo, b_hi> * U
//! R = <a_hi, G_lo> + <b_lo, H_hi> + <a_hi, b_lo> * U
//! ```
//!
//! draws a challenge `x` and folds
//!
//! ```text
//! a' = a_lo * x + a_hi * x^-1     G' = G_lo * x^-1 + G_hi * x
//! b' = b_lo * x^-1 + b_hi * x     H' = H_lo * x + H_hi * x^-1
//! P' = x^2 * L + P + x^-2 * R
//! ```
//!
//! until a single pair `(a, b)` remains, which must satisfy `a * G + b * H + ab * U = P'`.
//!
//! [InnerProductProof::verify_faster] checks the same equation without folding the generators:
//! after all rounds the folded `G` is `sum_i s_i * G_i` with `s_i = prod_j x_j^(+1 or -1)` chosen
//! by the bits of `i`, and the folded `H` uses `s_(n-1-i)`.

use super::{
    curve::{read_point, read_scalar, write_point, write_scalar, Point, Scalar, POINT_LENGTH},
    transcript::Transcript,
    util::{fold_points, fold_scalars, inner_product, is_power_of_two, msm_projective},
    Error, MAX_EXP, MAX_OUTPUT_COIN,
};
use crate::field::SCALAR_LENGTH;
use ark_ff::{Field, One, Zero};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, ReadExt, Write};

/// Maximum number of rounds (for vectors of `MAX_EXP * MAX_OUTPUT_COIN` elements).
pub const MAX_ROUNDS: usize = (MAX_EXP * MAX_OUTPUT_COIN).trailing_zeros() as usize;

/// A proof of a correct inner product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InnerProductProof {
    /// Left cross-term commitments, one per round.
    pub l: Vec<Point>,
    /// Right cross-term commitments, one per round.
    pub r: Vec<Point>,
    /// Final folded `a`.
    pub a: Scalar,
    /// Final folded `b`.
    pub b: Scalar,
    /// Commitment `P` the argument was produced for.
    pub p: Point,
}

/// Per-round challenge data needed to check an argument in a single multi-scalar multiplication.
pub struct VerificationScalars {
    /// `x_j^2` for every round `j`.
    pub x_sq: Vec<Scalar>,
    /// `x_j^-2` for every round `j`.
    pub x_inv_sq: Vec<Scalar>,
    /// Coefficient of `G_i` in the fully folded `G`.
    pub s: Vec<Scalar>,
}

impl VerificationScalars {
    /// Coefficient of `H_i` in the fully folded `H`.
    pub fn s_inv(&self, i: usize) -> Scalar {
        self.s[self.s.len() - 1 - i]
    }
}

fn check_vector_length(n: usize) -> Result<(), Error> {
    if !is_power_of_two(n) {
        return Err(Error::VectorLengthMismatch {
            expected: n.next_power_of_two(),
            actual: n,
        });
    }
    Ok(())
}

fn check_equal(expected: usize, actual: usize) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::VectorLengthMismatch { expected, actual });
    }
    Ok(())
}

impl InnerProductProof {
    /// Produces an argument for `P = <a, g> + <b, h> + <a, b> * u`.
    ///
    /// `P` is computed from the inputs, absorbed into `transcript` and stored in the proof.
    pub fn prove(
        transcript: &mut Transcript,
        g: &[Point],
        h: &[Point],
        u: &Point,
        a: Vec<Scalar>,
        b: Vec<Scalar>,
    ) -> Result<Self, Error> {
        let n = a.len();
        check_vector_length(n)?;
        check_equal(n, b.len())?;
        check_equal(n, g.len())?;
        check_equal(n, h.len())?;

        let p = msm_projective(g, &a)? + msm_projective(h, &b)? + *u * inner_product(&a, &b)?;
        transcript.append_point(b"P", &p);

        let rounds = n.trailing_zeros() as usize;
        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);
        let (mut a, mut b, mut g, mut h) = (a, b, g.to_vec(), h.to_vec());
        while a.len() > 1 {
            let half = a.len() / 2;
            let (a_lo, a_hi) = a.split_at(half);
            let (b_lo, b_hi) = b.split_at(half);
            let (g_lo, g_hi) = g.split_at(half);
            let (h_lo, h_hi) = h.split_at(half);

            // Commit to the cross terms
            let c_l = inner_product(a_lo, b_hi)?;
            let c_r = inner_product(a_hi, b_lo)?;
            let l = msm_projective(g_hi, a_lo)? + msm_projective(h_lo, b_hi)? + *u * c_l;
            let r = msm_projective(g_lo, a_hi)? + msm_projective(h_hi, b_lo)? + *u * c_r;
            transcript.append_point(b"L", &l);
            transcript.append_point(b"R", &r);
            let x = transcript.challenge_scalar(b"x");
            let x_inv = x.inverse().ok_or(Error::DegenerateChallenge)?;

            // Fold
            let a_next = fold_scalars(a_lo, a_hi, &x, &x_inv)?;
            let b_next = fold_scalars(b_lo, b_hi, &x_inv, &x)?;
            let g_next = fold_points(g_lo, g_hi, &x_inv, &x)?;
            let h_next = fold_points(h_lo, h_hi, &x, &x_inv)?;
            (a, b, g, h) = (a_next, b_next, g_next, h_next);
            l_vec.push(l);
            r_vec.push(r);
        }

        Ok(Self {
            l: l_vec,
            r: r_vec,
            a: a[0],
            b: b[0],
            p,
        })
    }

    /// Returns the number of rounds.
    pub fn rounds(&self) -> usize {
        self.l.len()
    }

    /// Ensures the proof has the shape of an argument over `n` elements.
    pub fn check_shape(&self, n: usize) -> Result<(), Error> {
        check_vector_length(n)?;
        check_equal(self.l.len(), self.r.len())?;
        check_equal(n.trailing_zeros() as usize, self.l.len())
    }

    /// Verifies the argument by folding the generators round by round.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        g: &[Point],
        h: &[Point],
        u: &Point,
    ) -> Result<(), Error> {
        let n = g.len();
        check_equal(n, h.len())?;
        self.check_shape(n)?;

        transcript.append_point(b"P", &self.p);
        let (mut g, mut h, mut p) = (g.to_vec(), h.to_vec(), self.p);
        for (l, r) in self.l.iter().zip(&self.r) {
            transcript.append_point(b"L", l);
            transcript.append_point(b"R", r);
            let x = transcript.challenge_scalar(b"x");
            let x_inv = x.inverse().ok_or(Error::DegenerateChallenge)?;

            let half = g.len() / 2;
            let g_next = fold_points(&g[..half], &g[half..], &x_inv, &x)?;
            let h_next = fold_points(&h[..half], &h[half..], &x, &x_inv)?;
            (g, h) = (g_next, h_next);
            p = *l * x.square() + p + *r * x_inv.square();
        }

        let expected = g[0] * self.a + h[0] * self.b + *u * (self.a * self.b);
        if expected != p {
            return Err(Error::AlgebraicCheckFailed("inner product argument"));
        }
        Ok(())
    }

    /// Replays the challenges of the argument and derives the coefficients of the folded
    /// generators.
    pub fn verification_scalars(
        &self,
        transcript: &mut Transcript,
        n: usize,
    ) -> Result<VerificationScalars, Error> {
        self.check_shape(n)?;

        transcript.append_point(b"P", &self.p);
        let mut challenges = Vec::with_capacity(self.rounds());
        for (l, r) in self.l.iter().zip(&self.r) {
            transcript.append_point(b"L", l);
            transcript.append_point(b"R", r);
            challenges.push(transcript.challenge_scalar(b"x"));
        }
        let inverses = challenges
            .iter()
            .map(|x| x.inverse().ok_or(Error::DegenerateChallenge))
            .collect::<Result<Vec<_>, _>>()?;

        let x_sq: Vec<Scalar> = challenges.iter().map(|x| x.square()).collect();
        let x_inv_sq: Vec<Scalar> = inverses.iter().map(|x| x.square()).collect();

        // s_0 = prod_j x_j^-1, and setting the bit of round j multiplies by x_j^2
        let rounds = self.rounds();
        let mut s = Vec::with_capacity(n);
        s.push(inverses.iter().product::<Scalar>());
        for i in 1..n {
            let lg_i = (usize::BITS - 1 - i.leading_zeros()) as usize;
            let k = 1 << lg_i;
            s.push(s[i - k] * x_sq[rounds - 1 - lg_i]);
        }

        Ok(VerificationScalars { x_sq, x_inv_sq, s })
    }

    /// Verifies the argument with a single multi-scalar multiplication over the unfolded
    /// generators.
    pub fn verify_faster(
        &self,
        transcript: &mut Transcript,
        g: &[Point],
        h: &[Point],
        u: &Point,
    ) -> Result<(), Error> {
        let n = g.len();
        check_equal(n, h.len())?;
        let scalars = self.verification_scalars(transcript, n)?;

        let mut points = Vec::with_capacity(2 * n + 2 + 2 * self.rounds());
        let mut coefficients = Vec::with_capacity(points.capacity());
        for (i, (g_i, h_i)) in g.iter().zip(h).enumerate() {
            points.push(*g_i);
            coefficients.push(self.a * scalars.s[i]);
            points.push(*h_i);
            coefficients.push(self.b * scalars.s_inv(i));
        }
        points.push(*u);
        coefficients.push(self.a * self.b);
        points.push(self.p);
        coefficients.push(-Scalar::one());
        for (j, (l, r)) in self.l.iter().zip(&self.r).enumerate() {
            points.push(*l);
            coefficients.push(-scalars.x_sq[j]);
            points.push(*r);
            coefficients.push(-scalars.x_inv_sq[j]);
        }

        if !msm_projective(&points, &coefficients)?.is_zero() {
            return Err(Error::AlgebraicCheckFailed("inner product argument"));
        }
        Ok(())
    }
}

impl Write for InnerProductProof {
    fn write(&self, buf: &mut impl BufMut) {
        debug_assert!(
            self.l.len() <= MAX_ROUNDS && self.l.len() == self.r.len(),
            "write: invalid round count"
        );
        (self.l.len() as u8).write(buf);
        for l in &self.l {
            write_point(l, buf);
        }
        for r in &self.r {
            write_point(r, buf);
        }
        write_scalar(&self.a, buf);
        write_scalar(&self.b, buf);
        write_point(&self.p, buf);
    }
}

impl Read for InnerProductProof {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let rounds = u8::read(buf)? as usize;
        if rounds > MAX_ROUNDS {
            return Err(CodecError::Invalid("InnerProductProof", "too many rounds"));
        }
        let l = (0..rounds)
            .map(|_| read_point(buf))
            .collect::<Result<Vec<_>, _>>()?;
        let r = (0..rounds)
            .map(|_| read_point(buf))
            .collect::<Result<Vec<_>, _>>()?;
        let a = read_scalar(buf)?;
        let b = read_scalar(buf)?;
        let p = read_point(buf)?;
        Ok(Self { l, r, a, b, p })
    }
}

impl EncodeSize for InnerProductProof {
    fn encode_size(&self) -> usize {
        1 + (self.l.len() + self.r.len() + 1) * POINT_LENGTH + 2 * SCALAR_LENGTH
    }
}
