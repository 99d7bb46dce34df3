//! Aggregated range proofs.
//!
//! For `count` committed values `V_j = v_j * B + gamma_j * B~` the prover pads to
//! `m = count.next_power_of_two()` values (at least one), bit-decomposes them into `aL` (length
//! `n = 64 * m`) with `aR = aL - 1`, and commits to the bits (`A`) and to random blinding vectors
//! (`S`). The challenges `y`, `z` define
//!
//! ```text
//! l(X) = (aL - z) + sL * X
//! r(X) = y^n o (aR + z + sR * X) + sum_j z^(2+j) * (0^(64j) || 2^64 || 0^(64(m-j-1)))
//! ```
//!
//! whose inner product `t(X) = t0 + t1 * X + t2 * X^2` has `t0 = sum_j z^(2+j) * v_j + delta(y, z)`.
//! The prover commits to `t1`, `t2` (`T1`, `T2`), opens `l(x)`, `r(x)` at the challenge `x` with
//! the inner-product argument and reveals `tHat = t(x)` with its blinding `tauX` and the blinding
//! `mu` of `A + x * S`.
//!
//! The verifier checks
//!
//! ```text
//! tHat * B + tauX * B~ == sum_j z^(2+j) * V_j + delta(y, z) * B + x * T1 + x^2 * T2
//! P == A + x * S - mu * B~ - z * sum(g) + sum_i (z + z^(2+j) * 2^(i mod 64) * y^-i) * h_i + tHat * u'
//! ```
//!
//! where `P` is the commitment of the inner-product argument (over `g` and `h'_i = y^-i * h_i`)
//! and `u' = w * u` for a final challenge `w`.

use super::{
    curve::{
        self, random_nonzero_scalar, read_point, read_scalar, write_point, write_scalar, Point, Scalar,
        POINT_LENGTH,
    },
    generators::{generators, Generators},
    ipa::{InnerProductProof, VerificationScalars},
    transcript::Transcript,
    util::{fold_scalars, inner_product, msm, msm_projective, powers, sum},
    Error, MAX_EXP, MAX_OUTPUT_COIN,
};
use crate::field::SCALAR_LENGTH;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, One, UniformRand, Zero};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error as CodecError, Read, ReadExt, Write};
use rand::{CryptoRng, RngCore};
use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

/// Returns the number of values a proof over `count` values is padded to.
fn padded_count(count: usize) -> usize {
    count.max(1).next_power_of_two()
}

/// The secret inputs of a range proof: values and their blinding factors.
#[derive(Clone)]
pub struct AggregatedRangeWitness {
    values: Vec<u64>,
    blindings: Vec<Scalar>,
}

impl AggregatedRangeWitness {
    /// Pairs every value with its blinding factor.
    pub fn new(values: Vec<u64>, blindings: Vec<Scalar>) -> Result<Self, Error> {
        if values.len() != blindings.len() {
            return Err(Error::VectorLengthMismatch {
                expected: values.len(),
                actual: blindings.len(),
            });
        }
        if values.len() > MAX_OUTPUT_COIN {
            return Err(Error::ProofSizeExceeded(values.len()));
        }
        Ok(Self { values, blindings })
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the witness holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the Pedersen commitment of every value.
    pub fn commitments(&self) -> Vec<Point> {
        let gens = generators();
        self.values
            .iter()
            .zip(&self.blindings)
            .map(|(value, blinding)| gens.commit(*value, blinding))
            .collect()
    }
}

/// Challenges replayed from the public part of a proof.
struct Challenges {
    y: Scalar,
    y_inv: Scalar,
    z: Scalar,
    x: Scalar,
    w: Scalar,
    /// Padded number of values.
    m: usize,
    /// Length of the bit vectors.
    n: usize,
}

/// A proof that every committed value lies in `[0, 2^64)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedRangeProof {
    /// Pedersen commitment of every value.
    pub commitments: Vec<Point>,
    /// Commitment to the bit vectors.
    pub a: Point,
    /// Commitment to the blinding vectors.
    pub s: Point,
    /// Commitment to the linear coefficient of `t(X)`.
    pub t1: Point,
    /// Commitment to the quadratic coefficient of `t(X)`.
    pub t2: Point,
    /// Blinding of `tHat`.
    pub tau_x: Scalar,
    /// Evaluation `t(x)`.
    pub t_hat: Scalar,
    /// Blinding of `A + x * S`.
    pub mu: Scalar,
    /// Argument that `tHat = <l(x), r(x)>`.
    pub inner_product: InnerProductProof,
}

impl AggregatedRangeProof {
    /// Proves that every value of `witness` is in range.
    pub fn prove<R: RngCore + CryptoRng>(
        witness: &AggregatedRangeWitness,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let count = witness.len();
        if count > MAX_OUTPUT_COIN {
            return Err(Error::ProofSizeExceeded(count));
        }
        let gens = generators();
        let m = padded_count(count);
        let n = MAX_EXP * m;
        let (g, h) = (gens.g(n), gens.h(n));
        let commitments = witness.commitments();

        // Bit-decompose the padded values
        let mut a_l = Vec::with_capacity(n);
        let mut a_r = Vec::with_capacity(n);
        for j in 0..m {
            let value = witness.values.get(j).copied().unwrap_or(0);
            for i in 0..MAX_EXP {
                let bit = Scalar::from((value >> i) & 1);
                a_l.push(bit);
                a_r.push(bit - Scalar::one());
            }
        }

        // Commit to the bits and to the blinding vectors
        let alpha = Scalar::rand(rng);
        let rho = Scalar::rand(rng);
        let s_l: Vec<Scalar> = (0..n).map(|_| Scalar::rand(rng)).collect();
        let s_r: Vec<Scalar> = (0..n).map(|_| Scalar::rand(rng)).collect();
        let a = gens.b_blinding * alpha + msm(g, &a_l)? + msm(h, &a_r)?;
        let s = gens.b_blinding * rho + msm(g, &s_l)? + msm(h, &s_r)?;

        let mut transcript = Transcript::new(&gens.cs);
        transcript.append_u64(b"m", count as u64);
        for commitment in &commitments {
            transcript.append_point(b"V", commitment);
        }
        transcript.append_point(b"A", &a);
        transcript.append_point(b"S", &s);
        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");
        let y_inv = y.inverse().ok_or(Error::DegenerateChallenge)?;

        // Coefficients of l(X) and r(X)
        let y_pow = powers(&y, n);
        let z_pow = powers(&z, m + 2);
        let two_pow = powers(&Scalar::from(2u64), MAX_EXP);
        let l0: Vec<Scalar> = a_l.iter().map(|bit| *bit - z).collect();
        let l1 = s_l;
        let r0: Vec<Scalar> = (0..n)
            .map(|i| y_pow[i] * (a_r[i] + z) + z_pow[2 + i / MAX_EXP] * two_pow[i % MAX_EXP])
            .collect();
        let r1: Vec<Scalar> = s_r.iter().zip(&y_pow).map(|(s, y)| *s * y).collect();

        // Commit to t1 and t2
        let t1 = inner_product(&l0, &r1)? + inner_product(&l1, &r0)?;
        let t2 = inner_product(&l1, &r1)?;
        let tau1 = Scalar::rand(rng);
        let tau2 = Scalar::rand(rng);
        let t1_commitment = gens.b * t1 + gens.b_blinding * tau1;
        let t2_commitment = gens.b * t2 + gens.b_blinding * tau2;
        transcript.append_point(b"T1", &t1_commitment);
        transcript.append_point(b"T2", &t2_commitment);
        let x = transcript.challenge_scalar(b"x");

        // Evaluate at x
        let l = fold_scalars(&l0, &l1, &Scalar::one(), &x)?;
        let r = fold_scalars(&r0, &r1, &Scalar::one(), &x)?;
        let t_hat = inner_product(&l, &r)?;
        let mut tau_x = tau2 * x.square() + tau1 * x;
        for (j, blinding) in witness.blindings.iter().enumerate() {
            tau_x += z_pow[2 + j] * blinding;
        }
        let mu = alpha + rho * x;
        transcript.append_scalar(b"tau_x", &tau_x);
        transcript.append_scalar(b"t_hat", &t_hat);
        transcript.append_scalar(b"mu", &mu);
        let w = transcript.challenge_scalar(b"w");
        if w.is_zero() {
            return Err(Error::DegenerateChallenge);
        }

        // Compress l(x) and r(x) over g and h'
        let g: Vec<Point> = g.iter().map(|g| g.into_group()).collect();
        let h_prime: Vec<Point> = h
            .iter()
            .zip(powers(&y_inv, n))
            .map(|(h, y)| *h * y)
            .collect();
        let u_prime = gens.u * w;
        let inner_product =
            InnerProductProof::prove(&mut transcript, &g, &h_prime, &u_prime, l, r)?;

        Ok(Self {
            commitments,
            a,
            s,
            t1: t1_commitment,
            t2: t2_commitment,
            tau_x,
            t_hat,
            mu,
            inner_product,
        })
    }

    /// Checks the structure of the proof: the number of values, the shape of the
    /// inner-product argument and the validity of every point.
    pub fn validate_sanity(&self) -> Result<(), Error> {
        let count = self.commitments.len();
        if count > MAX_OUTPUT_COIN {
            return Err(Error::ProofSizeExceeded(count));
        }
        self.inner_product
            .check_shape(MAX_EXP * padded_count(count))?;

        let mut points = self.commitments.clone();
        points.extend([self.a, self.s, self.t1, self.t2, self.inner_product.p]);
        points.extend(&self.inner_product.l);
        points.extend(&self.inner_product.r);
        for point in Point::normalize_batch(&points) {
            if !point.is_on_curve() {
                return Err(curve::Error::NotOnCurve.into());
            }
            if !point.is_in_correct_subgroup_assuming_on_curve() {
                return Err(curve::Error::NotInSubgroup.into());
            }
        }
        Ok(())
    }

    /// Replays the transcript up to (and including) the challenge `w`.
    fn challenges(&self, gens: &Generators) -> Result<(Transcript, Challenges), Error> {
        self.validate_sanity()?;
        let count = self.commitments.len();
        let m = padded_count(count);

        let mut transcript = Transcript::new(&gens.cs);
        transcript.append_u64(b"m", count as u64);
        for commitment in &self.commitments {
            transcript.append_point(b"V", commitment);
        }
        transcript.append_point(b"A", &self.a);
        transcript.append_point(b"S", &self.s);
        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");
        transcript.append_point(b"T1", &self.t1);
        transcript.append_point(b"T2", &self.t2);
        let x = transcript.challenge_scalar(b"x");
        transcript.append_scalar(b"tau_x", &self.tau_x);
        transcript.append_scalar(b"t_hat", &self.t_hat);
        transcript.append_scalar(b"mu", &self.mu);
        let w = transcript.challenge_scalar(b"w");

        let y_inv = y.inverse().ok_or(Error::DegenerateChallenge)?;
        let challenges = Challenges {
            y,
            y_inv,
            z,
            x,
            w,
            m,
            n: MAX_EXP * m,
        };
        Ok((transcript, challenges))
    }

    /// Returns `delta(y, z) = (z - z^2) * sum(y^n) - sum_j z^(3+j) * (2^64 - 1)`.
    fn delta(c: &Challenges) -> Scalar {
        let sum_y: Scalar = powers(&c.y, c.n).iter().sum();
        let sum_two = Scalar::from(u64::MAX);
        let z_pow = powers(&c.z, c.m + 3);
        let correction: Scalar = z_pow[3..].iter().map(|z| *z * sum_two).sum();
        (c.z - c.z.square()) * sum_y - correction
    }

    /// Adds `weight * (tHat * B + tauX * B~ - sum_j z^(2+j) * V_j - delta * B - x * T1 - x^2 * T2)`.
    fn accumulate_commitment_check(&self, c: &Challenges, weight: &Scalar, acc: &mut Accumulator) {
        let z_pow = powers(&c.z, c.m + 2);
        acc.b += *weight * (self.t_hat - Self::delta(c));
        acc.b_blinding += *weight * self.tau_x;
        for (commitment, z) in self.commitments.iter().zip(&z_pow[2..]) {
            acc.push(*commitment, -*weight * z);
        }
        acc.push(self.t1, -*weight * c.x);
        acc.push(self.t2, -*weight * c.x.square());
    }

    /// Adds `weight` times the inner-product equation, with `P` expanded in terms of the proof.
    fn accumulate_inner_product_check(
        &self,
        c: &Challenges,
        scalars: &VerificationScalars,
        weight: &Scalar,
        acc: &mut Accumulator,
    ) {
        let ipa = &self.inner_product;
        let y_inv_pow = powers(&c.y_inv, c.n);
        let z_pow = powers(&c.z, c.m + 2);
        let two_pow = powers(&Scalar::from(2u64), MAX_EXP);
        for i in 0..c.n {
            let offset = z_pow[2 + i / MAX_EXP] * two_pow[i % MAX_EXP];
            acc.g[i] += *weight * (ipa.a * scalars.s[i] + c.z);
            acc.h[i] += *weight * ((ipa.b * scalars.s_inv(i) - offset) * y_inv_pow[i] - c.z);
        }
        acc.u += *weight * c.w * (ipa.a * ipa.b - self.t_hat);
        acc.b_blinding += *weight * self.mu;
        acc.push(self.a, -*weight);
        acc.push(self.s, -*weight * c.x);
        for (j, (l, r)) in ipa.l.iter().zip(&ipa.r).enumerate() {
            acc.push(*l, -*weight * scalars.x_sq[j]);
            acc.push(*r, -*weight * scalars.x_inv_sq[j]);
        }
    }

    /// Replays the proof and adds both of its equations, weighted by `alpha` and `beta`.
    fn accumulate(&self, alpha: &Scalar, beta: &Scalar) -> Result<Accumulator, Error> {
        let gens = generators();
        let (mut transcript, c) = self.challenges(gens)?;
        let scalars = self
            .inner_product
            .verification_scalars(&mut transcript, c.n)?;
        let mut acc = Accumulator::new(c.n);
        self.accumulate_commitment_check(&c, alpha, &mut acc);
        self.accumulate_inner_product_check(&c, &scalars, beta, &mut acc);
        Ok(acc)
    }

    /// Verifies the proof, folding the generators round by round in the inner-product argument.
    pub fn verify(&self) -> Result<(), Error> {
        let gens = generators();
        let (mut transcript, c) = self.challenges(gens)?;

        // Check tHat against the value commitments and T1, T2
        let z_pow = powers(&c.z, c.m + 2);
        let lhs = gens.b * self.t_hat + gens.b_blinding * self.tau_x;
        let rhs = msm_projective(&self.commitments, &z_pow[2..2 + self.commitments.len()])?
            + gens.b * Self::delta(&c)
            + self.t1 * c.x
            + self.t2 * c.x.square();
        if lhs != rhs {
            trace!("commitment consistency check failed");
            return Err(Error::AlgebraicCheckFailed("commitment consistency"));
        }

        // Recompute P and compare it with the commitment of the argument
        let (g, h) = (gens.g(c.n), gens.h(c.n));
        let y_inv_pow = powers(&c.y_inv, c.n);
        let two_pow = powers(&Scalar::from(2u64), MAX_EXP);
        let h_coefficients: Vec<Scalar> = (0..c.n)
            .map(|i| c.z + z_pow[2 + i / MAX_EXP] * two_pow[i % MAX_EXP] * y_inv_pow[i])
            .collect();
        let u_prime = gens.u * c.w;
        let p = self.a + self.s * c.x - gens.b_blinding * self.mu - sum(g) * c.z
            + msm(h, &h_coefficients)?
            + u_prime * self.t_hat;
        if p != self.inner_product.p {
            trace!("inner product commitment check failed");
            return Err(Error::AlgebraicCheckFailed("inner product commitment"));
        }

        // Verify the argument over g and h'
        let g: Vec<Point> = g.iter().map(|g| g.into_group()).collect();
        let h_prime: Vec<Point> = h.iter().zip(&y_inv_pow).map(|(h, y)| *h * y).collect();
        self.inner_product
            .verify(&mut transcript, &g, &h_prime, &u_prime)
    }

    /// Verifies the proof with one multi-scalar multiplication per equation and without folding
    /// generators.
    ///
    /// Accepts and rejects exactly the same proofs as [AggregatedRangeProof::verify].
    pub fn verify_faster(&self) -> Result<(), Error> {
        let gens = generators();
        let (mut transcript, c) = self.challenges(gens)?;
        let one = Scalar::one();

        let mut acc = Accumulator::new(0);
        self.accumulate_commitment_check(&c, &one, &mut acc);
        if !acc.is_satisfied(gens)? {
            trace!("commitment consistency check failed");
            return Err(Error::AlgebraicCheckFailed("commitment consistency"));
        }

        let scalars = self
            .inner_product
            .verification_scalars(&mut transcript, c.n)?;
        let mut acc = Accumulator::new(c.n);
        self.accumulate_inner_product_check(&c, &scalars, &one, &mut acc);
        if !acc.is_satisfied(gens)? {
            trace!("inner product check failed");
            return Err(Error::AlgebraicCheckFailed("inner product argument"));
        }
        Ok(())
    }

    /// Serializes the proof.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode().to_vec()
    }

    /// Deserializes a proof, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::decode(bytes).map_err(Error::from)
    }
}

impl Write for AggregatedRangeProof {
    fn write(&self, buf: &mut impl BufMut) {
        debug_assert!(
            self.commitments.len() <= MAX_OUTPUT_COIN,
            "write: too many commitments"
        );
        (self.commitments.len() as u8).write(buf);
        for commitment in &self.commitments {
            write_point(commitment, buf);
        }
        write_point(&self.a, buf);
        write_point(&self.s, buf);
        write_point(&self.t1, buf);
        write_point(&self.t2, buf);
        write_scalar(&self.tau_x, buf);
        write_scalar(&self.t_hat, buf);
        write_scalar(&self.mu, buf);
        self.inner_product.write(buf);
    }
}

impl Read for AggregatedRangeProof {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let count = u8::read(buf)? as usize;
        if count > MAX_OUTPUT_COIN {
            return Err(CodecError::Invalid(
                "AggregatedRangeProof",
                "too many commitments",
            ));
        }
        let commitments = (0..count)
            .map(|_| read_point(buf))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            commitments,
            a: read_point(buf)?,
            s: read_point(buf)?,
            t1: read_point(buf)?,
            t2: read_point(buf)?,
            tau_x: read_scalar(buf)?,
            t_hat: read_scalar(buf)?,
            mu: read_scalar(buf)?,
            inner_product: InnerProductProof::read(buf)?,
        })
    }
}

impl EncodeSize for AggregatedRangeProof {
    fn encode_size(&self) -> usize {
        1 + (self.commitments.len() + 4) * POINT_LENGTH
            + 3 * SCALAR_LENGTH
            + self.inner_product.encode_size()
    }
}

/// Returns the serialized length of a proof over `num_values` values.
pub fn estimate_proof_size(num_values: usize) -> Result<usize, Error> {
    if num_values > MAX_OUTPUT_COIN {
        return Err(Error::ProofSizeExceeded(num_values));
    }
    let rounds = (MAX_EXP * padded_count(num_values)).trailing_zeros() as usize;
    let outer = 1 + (num_values + 4) * POINT_LENGTH + 3 * SCALAR_LENGTH;
    let inner = 1 + (2 * rounds + 1) * POINT_LENGTH + 2 * SCALAR_LENGTH;
    Ok(outer + inner)
}

/// Coefficients of a pending multi-scalar multiplication over the generators and free points.
struct Accumulator {
    g: Vec<Scalar>,
    h: Vec<Scalar>,
    b: Scalar,
    b_blinding: Scalar,
    u: Scalar,
    points: Vec<Point>,
    scalars: Vec<Scalar>,
}

impl Accumulator {
    fn new(n: usize) -> Self {
        Self {
            g: vec![Scalar::zero(); n],
            h: vec![Scalar::zero(); n],
            b: Scalar::zero(),
            b_blinding: Scalar::zero(),
            u: Scalar::zero(),
            points: Vec::new(),
            scalars: Vec::new(),
        }
    }

    fn push(&mut self, point: Point, scalar: Scalar) {
        self.points.push(point);
        self.scalars.push(scalar);
    }

    /// Adds `other` (which must not be longer than `self`) to `self`.
    fn merge(&mut self, other: Accumulator) {
        for (acc, s) in self.g.iter_mut().zip(&other.g) {
            *acc += s;
        }
        for (acc, s) in self.h.iter_mut().zip(&other.h) {
            *acc += s;
        }
        self.b += other.b;
        self.b_blinding += other.b_blinding;
        self.u += other.u;
        self.points.extend(other.points);
        self.scalars.extend(other.scalars);
    }

    /// Returns whether the accumulated combination is the identity.
    fn is_satisfied(&self, gens: &Generators) -> Result<bool, Error> {
        let n = self.g.len();
        let mut points = self.points.clone();
        let mut scalars = self.scalars.clone();
        points.extend([gens.b, gens.b_blinding, gens.u]);
        scalars.extend([self.b, self.b_blinding, self.u]);
        let total = msm(gens.g(n), &self.g)? + msm(gens.h(n), &self.h)?
            + msm_projective(&points, &scalars)?;
        Ok(total.is_zero())
    }
}

fn accumulate_member(
    index: usize,
    proof: &AggregatedRangeProof,
    alpha: &Scalar,
    beta: &Scalar,
) -> Result<Accumulator, Error> {
    proof
        .accumulate(alpha, beta)
        .map_err(|err| Error::BatchMember {
            index,
            source: Box::new(err),
        })
}

/// Verifies many proofs with a single multi-scalar multiplication.
///
/// Each proof's two equations are weighted by fresh random scalars and summed, so the batch
/// passes only if (with overwhelming probability) every proof is valid. Structural problems are
/// reported with the index of the offending proof. A failed equation is reported for the batch
/// as a whole.
pub fn verify_batch<R: RngCore + CryptoRng>(
    rng: &mut R,
    proofs: &[AggregatedRangeProof],
    concurrency: usize,
) -> Result<(), Error> {
    if proofs.is_empty() {
        return Ok(());
    }
    for (index, proof) in proofs.iter().enumerate() {
        if let Err(err) = proof.validate_sanity() {
            debug!(index, ?err, "batch member failed structural checks");
            return Err(Error::BatchMember {
                index,
                source: Box::new(err),
            });
        }
    }

    let weights: Vec<(Scalar, Scalar)> = proofs
        .iter()
        .map(|_| (random_nonzero_scalar(rng), random_nonzero_scalar(rng)))
        .collect();
    let n = proofs
        .iter()
        .map(|proof| MAX_EXP * padded_count(proof.commitments.len()))
        .max()
        .unwrap_or(MAX_EXP);
    debug!(proofs = proofs.len(), n, "verifying batch");

    // If concurrency is not required, replay proofs sequentially
    let concurrency = std::cmp::min(concurrency, proofs.len());
    let sequential = || {
        proofs
            .iter()
            .zip(&weights)
            .enumerate()
            .map(|(index, (proof, (alpha, beta)))| accumulate_member(index, proof, alpha, beta))
            .collect::<Result<Vec<_>, _>>()
    };
    let accumulators = if concurrency <= 1 {
        sequential()?
    } else {
        match ThreadPoolBuilder::new().num_threads(concurrency).build() {
            Ok(pool) => pool.install(|| {
                proofs
                    .par_iter()
                    .zip(&weights)
                    .enumerate()
                    .map(|(index, (proof, (alpha, beta)))| {
                        accumulate_member(index, proof, alpha, beta)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })?,
            Err(err) => {
                warn!(?err, concurrency, "unable to build thread pool");
                sequential()?
            }
        }
    };

    let mut total = Accumulator::new(n);
    for acc in accumulators {
        total.merge(acc);
    }
    if !total.is_satisfied(generators())? {
        trace!(proofs = proofs.len(), "batch check failed");
        return Err(Error::AlgebraicCheckFailed("batch"));
    }
    Ok(())
}
