//! Committee-weighted public key aggregation.
//!
//! Each signer `i` of an ordered committee `pk_0..pk_{n-1}` carries the weight
//! `a_i = reduce(SHA-256(pk_i || pk_0 || ... || pk_{n-1}))`. Changing any member, or the order of
//! the committee, changes every weight. The aggregate public key of a signer set `S` is
//! `sum_{i in S} a_i * pk_i`.

use super::{
    cache::{AggregationCache, CacheKey},
    group::{Scalar, G2},
    keys::PublicKey,
    Error,
};
use crate::field::{hash_parts, reduce_mod_order_by_rehash};
use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::{debug, warn};

/// Concatenates the encodings of every committee member, in committee order.
pub fn combined_committee_bytes(committee: &[PublicKey]) -> Vec<u8> {
    let mut combined = Vec::with_capacity(committee.iter().map(|pk| pk.as_bytes().len()).sum());
    for pk in committee {
        combined.extend_from_slice(pk.as_bytes());
    }
    combined
}

/// Returns `SHA-256(pk_index || combined)`, the pre-image of a signer's weight.
fn weight_digest(signer: &PublicKey, combined: &[u8]) -> CacheKey {
    hash_parts(&[signer.as_bytes(), combined])
}

/// Ensures the committee is non-empty and `index` addresses one of its members.
pub(super) fn check_index(committee: &[PublicKey], index: usize) -> Result<(), Error> {
    if committee.is_empty() {
        return Err(Error::InvalidCommitteeInfo("empty committee"));
    }
    if index >= committee.len() {
        return Err(Error::InvalidCommitteeInfo("signer index out of range"));
    }
    Ok(())
}

/// Ensures `signers` is a non-empty set of in-range indices no larger than the committee.
pub(super) fn check_signers(committee: &[PublicKey], signers: &[usize]) -> Result<(), Error> {
    if committee.is_empty() {
        return Err(Error::InvalidCommitteeInfo("empty committee"));
    }
    if signers.is_empty() {
        return Err(Error::InvalidCommitteeInfo("no signers"));
    }
    if signers.len() > committee.len() {
        return Err(Error::InvalidCommitteeInfo("more signers than committee members"));
    }
    if signers.iter().any(|index| *index >= committee.len()) {
        return Err(Error::InvalidCommitteeInfo("signer index out of range"));
    }
    Ok(())
}

/// Derives the weight of signer `index` in `committee`.
pub fn per_signer_weight(committee: &[PublicKey], index: usize) -> Result<Scalar, Error> {
    check_index(committee, index)?;
    let combined = combined_committee_bytes(committee);
    Ok(reduce_mod_order_by_rehash(&weight_digest(
        &committee[index],
        &combined,
    )))
}

/// Computes `a_i * pk_i`, consulting `cache` first when one is provided.
///
/// A cache that cannot serve a lookup (closed or poisoned) counts as a miss.
fn weighted_public_key(
    signer: &PublicKey,
    combined: &[u8],
    cache: Option<&AggregationCache>,
) -> G2 {
    let digest = weight_digest(signer, combined);
    if let Some(cache) = cache {
        match cache.get(&digest) {
            Ok(Some(point)) => return point,
            Ok(None) => {}
            Err(err) => debug!(?err, "weighted key cache unavailable"),
        }
    }

    let weight: Scalar = reduce_mod_order_by_rehash(&digest);
    let mut point = *signer.point();
    point.mul(&weight);

    if let Some(cache) = cache {
        if let Err(err) = cache.insert(digest, point) {
            debug!(?err, "unable to cache weighted key");
        }
    }
    point
}

/// Computes the aggregate public key of `signers` (indices into `committee`).
///
/// Weighted keys are computed on up to `concurrency` threads and summed afterwards. When
/// `cache` is provided, weighted keys are read from and written to it.
pub fn aggregate_public_key(
    committee: &[PublicKey],
    signers: &[usize],
    cache: Option<&AggregationCache>,
    concurrency: usize,
) -> Result<G2, Error> {
    check_signers(committee, signers)?;
    let combined = combined_committee_bytes(committee);
    let compute = |index: &usize| weighted_public_key(&committee[*index], &combined, cache);

    // If concurrency is not required, compute weighted keys sequentially
    let concurrency = std::cmp::min(concurrency, signers.len());
    let weighted: Vec<G2> = if concurrency <= 1 {
        signers.iter().map(compute).collect()
    } else {
        match ThreadPoolBuilder::new().num_threads(concurrency).build() {
            Ok(pool) => pool.install(|| signers.par_iter().map(compute).collect()),
            Err(err) => {
                warn!(?err, concurrency, "unable to build thread pool");
                signers.iter().map(compute).collect()
            }
        }
    };

    let mut aggregate = G2::zero();
    for point in &weighted {
        aggregate.add(point);
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::{cache::Config, keys::keygen};

    fn committee(n: usize) -> Vec<PublicKey> {
        (0..n)
            .map(|i| keygen(&(i as u64).to_be_bytes()).1)
            .collect()
    }

    #[test]
    fn test_weight_depends_on_committee_order() {
        let c = committee(3);
        let w0 = per_signer_weight(&c, 0).unwrap();

        let mut swapped = c.clone();
        swapped.swap(1, 2);
        assert_ne!(per_signer_weight(&swapped, 0).unwrap(), w0);

        let mut replaced = c.clone();
        replaced[2] = keygen(b"replacement").1;
        assert_ne!(per_signer_weight(&replaced, 0).unwrap(), w0);
    }

    #[test]
    fn test_weight_matches_definition() {
        let c = committee(2);
        let mut preimage = c[1].as_bytes().to_vec();
        preimage.extend_from_slice(c[0].as_bytes());
        preimage.extend_from_slice(c[1].as_bytes());
        let expected: Scalar =
            reduce_mod_order_by_rehash(&crate::field::hash(&preimage));
        assert_eq!(per_signer_weight(&c, 1).unwrap(), expected);
    }

    #[test]
    fn test_aggregate_matches_manual_sum() {
        let c = committee(5);
        let signers = [0, 2, 4];
        let mut expected = G2::zero();
        for i in signers {
            let mut p = *c[i].point();
            p.mul(&per_signer_weight(&c, i).unwrap());
            expected.add(&p);
        }
        for concurrency in [1, 2, 8] {
            let aggregate = aggregate_public_key(&c, &signers, None, concurrency).unwrap();
            assert_eq!(aggregate, expected);
        }
    }

    #[test]
    fn test_aggregate_with_cache() {
        let c = committee(4);
        let cache = AggregationCache::new(Config::default());
        let uncached = aggregate_public_key(&c, &[0, 1, 2, 3], None, 1).unwrap();
        let first = aggregate_public_key(&c, &[0, 1, 2, 3], Some(&cache), 4).unwrap();
        assert_eq!(cache.len().unwrap(), 4);
        let second = aggregate_public_key(&c, &[0, 1, 2, 3], Some(&cache), 1).unwrap();
        assert_eq!(first, uncached);
        assert_eq!(second, uncached);

        // Weights are bound to the committee, so a different committee misses
        let other = committee(3);
        aggregate_public_key(&other, &[0], Some(&cache), 1).unwrap();
        assert_eq!(cache.len().unwrap(), 5);

        // A closed cache is bypassed but keeps rejecting direct use
        cache.close();
        let bypassed = aggregate_public_key(&c, &[0, 1, 2, 3], Some(&cache), 2).unwrap();
        assert_eq!(bypassed, uncached);
        assert!(matches!(cache.get(&[0u8; 32]), Err(Error::CacheClosed)));
        assert!(matches!(cache.len(), Err(Error::CacheClosed)));
    }

    #[test]
    fn test_invalid_signers() {
        let c = committee(3);
        for signers in [&[][..], &[3][..], &[0, 1, 2, 0][..]] {
            assert!(matches!(
                aggregate_public_key(&c, signers, None, 1),
                Err(Error::InvalidCommitteeInfo(_))
            ));
        }
        assert!(matches!(
            aggregate_public_key(&[], &[0], None, 1),
            Err(Error::InvalidCommitteeInfo("empty committee"))
        ));
        assert!(matches!(
            per_signer_weight(&c, 3),
            Err(Error::InvalidCommitteeInfo("signer index out of range"))
        ));
    }
}
