//! Membership-biased strand combination for weighted minimisers.
//!
//! The weighted minimiser walks the forward and reverse-complement hash
//! streams of one sequence in lockstep. Per position it normally keeps the
//! smaller of the two strand hashes (the canonical choice); when either
//! strand hash is flagged by an externally owned membership set, it keeps the
//! *larger* one instead, which biases the downstream window minimum away from
//! flagged k-mers. A flagged k-mer can still be selected when every other
//! candidate in its window is flagged too.

use std::collections::{BTreeSet, HashSet};

use crate::core::minimiser::{seeded, Minimiser, Seeded};
use crate::error::{Result, WindmerError};

/// Externally owned set of unfavourable hash values.
///
/// The operator only probes the set; it is consulted exactly twice per
/// position (once per strand) and must be side-effect free.
pub trait MembershipSet {
    /// True if `hash` is flagged as unfavourable.
    fn contains(&self, hash: u64) -> bool;
}

impl<M: MembershipSet + ?Sized> MembershipSet for &M {
    fn contains(&self, hash: u64) -> bool {
        (**self).contains(hash)
    }
}

impl MembershipSet for HashSet<u64> {
    fn contains(&self, hash: u64) -> bool {
        HashSet::contains(self, &hash)
    }
}

impl MembershipSet for BTreeSet<u64> {
    fn contains(&self, hash: u64) -> bool {
        BTreeSet::contains(self, &hash)
    }
}

impl MembershipSet for roaring::RoaringTreemap {
    fn contains(&self, hash: u64) -> bool {
        roaring::RoaringTreemap::contains(self, hash)
    }
}

/// Adapter that turns a plain closure into a [`MembershipSet`].
///
/// Coherence rules out a direct blanket impl for `Fn(u64) -> bool` next to
/// the impls for the std set types, so closures go through this wrapper:
///
/// ```
/// use windmer::{weighted_minimiser_hash, Predicate};
///
/// let sampled = weighted_minimiser_hash(
///     [26u64, 105, 97],
///     [91u64, 150, 182],
///     2,
///     Predicate(|hash| hash == 97),
///     0,
/// );
/// assert!(sampled.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Predicate<F>(pub F);

impl<F: Fn(u64) -> bool> MembershipSet for Predicate<F> {
    fn contains(&self, hash: u64) -> bool {
        (self.0)(hash)
    }
}

/// Lockstep per-position combiner of two strand hash streams.
///
/// Emits `max(f, r)` when either strand hash is in the membership set and
/// `min(f, r)` otherwise. Ends as soon as either upstream ends.
#[derive(Debug, Clone)]
pub struct WeightedCombiner<I1, I2, M> {
    forward: I1,
    reverse: I2,
    membership: M,
}

impl<I1, I2, M> WeightedCombiner<I1, I2, M>
where
    I1: Iterator<Item = u64>,
    I2: Iterator<Item = u64>,
    M: MembershipSet,
{
    pub(crate) fn new(forward: I1, reverse: I2, membership: M) -> Self {
        Self {
            forward,
            reverse,
            membership,
        }
    }
}

impl<I1, I2, M> Iterator for WeightedCombiner<I1, I2, M>
where
    I1: Iterator<Item = u64>,
    I2: Iterator<Item = u64>,
    M: MembershipSet,
{
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let forward = self.forward.next()?;
        let reverse = match self.reverse.next() {
            Some(value) => value,
            None => return None,
        };
        // Both strands are probed unconditionally; the predicate is consulted
        // exactly twice per position.
        let flagged = self.membership.contains(forward) | self.membership.contains(reverse);
        if flagged {
            Some(forward.max(reverse))
        } else {
            Some(forward.min(reverse))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo1, hi1) = self.forward.size_hint();
        let (lo2, hi2) = self.reverse.size_hint();
        let hi = match (hi1, hi2) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        (lo1.min(lo2), hi)
    }
}

/// The operator produced by [`weighted_minimiser_hash`]: per-window minima
/// over the seeded, membership-combined strand stream.
pub type WeightedMinimiser<I1, I2, M> = Minimiser<WeightedCombiner<Seeded<I1>, Seeded<I2>, M>>;

/// Build a weighted minimiser over forward and reverse-complement hash
/// streams: seed both strands, combine per position under the membership
/// bias, then take deduplicated per-window minima.
///
/// Membership is tested on the *seeded* hashes, so a set built from raw
/// hash values belongs with `seed = 0`.
///
/// # Errors
/// `LengthMismatch` if the strand streams report different lengths.
/// `InvalidArgument` if `window_values` is 0 (the window must span at least
/// the k-mer itself).
pub fn weighted_minimiser_hash<I1, I2, M>(
    forward: I1,
    reverse: I2,
    window_values: usize,
    membership: M,
    seed: u64,
) -> Result<WeightedMinimiser<I1::IntoIter, I2::IntoIter, M>>
where
    I1: IntoIterator<Item = u64>,
    I2: IntoIterator<Item = u64>,
    I1::IntoIter: ExactSizeIterator,
    I2::IntoIter: ExactSizeIterator,
    M: MembershipSet,
{
    if window_values == 0 {
        return Err(WindmerError::invalid_argument(
            "window_values must be at least 1: the window cannot be smaller than the k-mer",
        ));
    }
    let forward = forward.into_iter();
    let reverse = reverse.into_iter();
    if forward.len() != reverse.len() {
        return Err(WindmerError::length_mismatch(forward.len(), reverse.len()));
    }
    log::debug!(
        "weighted minimiser: window_values={}, stream_len={}, seed={:#x}",
        window_values,
        forward.len(),
        seed
    );
    let combined = WeightedCombiner::new(seeded(forward, seed), seeded(reverse, seed), membership);
    Ok(Minimiser::new_unchecked(combined, window_values))
}
