//! Signing, verification and combination of committee-weighted signatures.
//!
//! A signer `i` signs `m` as `sigma_i = (a_i * sk_i) * H(m)` where `a_i` is its committee weight
//! (see [super::aggregate]). Shares combine by point addition and the sum over a signer set `S`
//! verifies against `sum_{i in S} a_i * pk_i`.

use super::{
    aggregate::{aggregate_public_key, check_index, check_signers, per_signer_weight},
    cache::AggregationCache,
    group::{pairing, G1, G2},
    keys::{PublicKey, SecretKey, Signature},
    Error,
};

/// Produces signer `index`'s weighted signature share over `message`.
pub fn sign(
    message: &[u8],
    secret: &[u8],
    index: usize,
    committee: &[PublicKey],
) -> Result<Signature, Error> {
    let secret = SecretKey::from_bytes(secret)?;
    check_index(committee, index)?;

    let mut scalar = per_signer_weight(committee, index)?;
    scalar.mul(secret.scalar());

    let mut point = G1::hash(message);
    point.mul(&scalar);
    Ok(Signature::from_point(&point))
}

/// Checks `e(sigma, G2) == e(H(m), pk)`, computing both pairings in parallel.
fn pairing_check(signature: &G1, message: &[u8], public: &G2) -> bool {
    let hashed = G1::hash(message);
    let (lhs, rhs) = rayon::join(
        || pairing(signature, &G2::one()),
        || pairing(&hashed, public),
    );
    lhs == rhs
}

/// Verifies a combined signature over `message` by the committee members at `signers`.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify. Errors are reserved for
/// malformed input: invalid signer sets or signatures that do not decompress. A closed cache is
/// bypassed.
pub fn verify(
    signature: &Signature,
    message: &[u8],
    signers: &[usize],
    committee: &[PublicKey],
    cache: Option<&AggregationCache>,
    concurrency: usize,
) -> Result<bool, Error> {
    check_signers(committee, signers)?;
    let point = signature.decompress()?;
    let public = aggregate_public_key(committee, signers, cache, concurrency)?;
    Ok(pairing_check(&point, message, &public))
}

/// Sums signature shares.
///
/// The combination of shares from a signer set `S` verifies against `S`, regardless of the
/// order in which shares are provided.
pub fn combine(signatures: &[Signature]) -> Result<Signature, Error> {
    let mut sum = G1::zero();
    for signature in signatures {
        sum.add(&signature.decompress()?);
    }
    Ok(Signature::from_point(&sum))
}

/// Produces a plain (unweighted) BLS signature `sk * H(m)`.
pub fn sign_unweighted(message: &[u8], secret: &[u8]) -> Result<Signature, Error> {
    let secret = SecretKey::from_bytes(secret)?;
    let mut point = G1::hash(message);
    point.mul(secret.scalar());
    Ok(Signature::from_point(&point))
}

/// Verifies a plain (unweighted) BLS signature against a single public key.
pub fn verify_unweighted(
    signature: &Signature,
    message: &[u8],
    public: &PublicKey,
) -> Result<bool, Error> {
    let point = signature.decompress()?;
    Ok(pairing_check(&point, message, public.point()))
}
