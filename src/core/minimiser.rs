//! Streaming minimiser operators.
//!
//! A minimiser is the smallest value inside a sliding window of `w` hash
//! values. The operators here are single-pass pull iterators: each `next()`
//! advances the upstream one value at a time and loops internally until the
//! per-window minimum changes (or the upstream ends), so consecutive windows
//! that share a minimum produce a single emission.
//!
//! Emission rule, per window shift:
//! - if the value that left the window was the cached minimum, the minimum is
//!   recomputed and emitted, *even when the recomputed minimum happens to
//!   equal the previous one* (windows with distinct minimum occurrences are
//!   distinct samples);
//! - if the newly arrived value is strictly smaller than the cached minimum,
//!   it becomes the minimum and is emitted;
//! - otherwise the window shift is silent.

use crate::core::window::WindowBuffer;
use crate::error::{Result, WindmerError};

/// Streaming per-window minima of one hash stream, deduplicated.
///
/// Construct through [`minimiser`]; the window size is validated there.
/// The iterator owns its upstream; clones have independent window state and
/// positions (the shared source, if any, sits behind the upstream iterator).
#[derive(Clone)]
pub struct Minimiser<I: Iterator>
where
    I::Item: Copy + Ord,
{
    upstream: I,
    window: WindowBuffer<I::Item>,
    current_min: Option<I::Item>,
    window_values: usize,
    primed: bool,
    done: bool,
}

impl<I: Iterator> Minimiser<I>
where
    I::Item: Copy + Ord,
{
    /// Build without argument validation; callers are the factory functions.
    pub(crate) fn new_unchecked(upstream: I, window_values: usize) -> Self {
        Self {
            upstream,
            window: WindowBuffer::with_capacity(window_values),
            current_min: None,
            window_values,
            primed: false,
            done: false,
        }
    }

    /// Fill the first window and compute its minimum.
    ///
    /// Pulls up to `window_values` values. A stream shorter than the window
    /// clamps the window to the stream length (one value is still emitted);
    /// an empty stream produces no window at all.
    fn prime(&mut self) -> Option<I::Item> {
        self.primed = true;
        for _ in 0..self.window_values {
            match self.upstream.next() {
                Some(value) => self.window.push_back(value),
                None => break,
            }
        }
        if self.window.is_empty() {
            self.done = true;
            return None;
        }
        self.current_min = self.window.min();
        self.current_min
    }
}

impl<I: Iterator> Iterator for Minimiser<I>
where
    I::Item: Copy + Ord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }
        if !self.primed {
            return self.prime();
        }
        loop {
            let new_value = match self.upstream.next() {
                Some(value) => value,
                None => {
                    self.done = true;
                    return None;
                }
            };
            let evicted = self.window.pop_front();
            self.window.push_back(new_value);

            if self.current_min == evicted {
                // The minimum left the window; rescan and always emit.
                self.current_min = self.window.min();
                return self.current_min;
            }
            if let Some(min) = self.current_min {
                if new_value < min {
                    self.current_min = Some(new_value);
                    return self.current_min;
                }
            }
            // Minimum unchanged, keep shifting.
        }
    }
}

/// Lockstep element-wise minimum of two hash streams.
///
/// Both upstreams advance together on every step; iteration ends as soon as
/// either ends, so the combined stream is total even if the two lengths
/// disagree (the factories reject that case up front).
#[derive(Debug, Clone)]
pub struct StrandMin<I1, I2> {
    first: I1,
    second: I2,
}

impl<I1, I2, T> Iterator for StrandMin<I1, I2>
where
    T: Copy + Ord,
    I1: Iterator<Item = T>,
    I2: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match (self.first.next(), self.second.next()) {
            (Some(a), Some(b)) => Some(if b < a { b } else { a }),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo1, hi1) = self.first.size_hint();
        let (lo2, hi2) = self.second.size_hint();
        let hi = match (hi1, hi2) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        (lo1.min(lo2), hi)
    }
}

/// Per-window minima over the element-wise minimum of two equal-length streams.
pub type DualMinimiser<I1, I2> = Minimiser<StrandMin<I1, I2>>;

/// XOR-seeding stage: scrambles the order of a hash stream without changing
/// which values are distinct. Seed `0` is the identity.
#[derive(Debug, Clone)]
pub struct Seeded<I> {
    upstream: I,
    seed: u64,
}

impl<I: Iterator<Item = u64>> Iterator for Seeded<I> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.upstream.next().map(|hash| hash ^ self.seed)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

impl<I: ExactSizeIterator<Item = u64>> ExactSizeIterator for Seeded<I> {}

/// Apply a seed to every hash of a stream. See [`crate::DEFAULT_SEED`].
pub fn seeded<I>(hashes: I, seed: u64) -> Seeded<I::IntoIter>
where
    I: IntoIterator<Item = u64>,
{
    Seeded {
        upstream: hashes.into_iter(),
        seed,
    }
}

/// Build a single-stream minimiser over `hashes` with `window_values` values
/// per window.
///
/// # Errors
/// `InvalidArgument` if `window_values` is 0 or 1: a one-value window would
/// return the input unchanged. Use [`dual_minimiser`] if a one-value window
/// over two combined streams is what you need.
pub fn minimiser<I>(hashes: I, window_values: usize) -> Result<Minimiser<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: Copy + Ord,
{
    if window_values < 2 {
        return Err(WindmerError::invalid_argument(format!(
            "window_values must be at least 2 for a single-stream minimiser (got {})",
            window_values
        )));
    }
    log::debug!("minimiser: window_values={}", window_values);
    Ok(Minimiser::new_unchecked(hashes.into_iter(), window_values))
}

/// Build a minimiser over the element-wise minimum of two equal-length
/// streams (typically forward and reverse-complement strand hashes).
///
/// # Errors
/// `LengthMismatch` if the two streams report different lengths.
/// `InvalidArgument` if `window_values` is 0.
pub fn dual_minimiser<I1, I2, T>(
    first: I1,
    second: I2,
    window_values: usize,
) -> Result<DualMinimiser<I1::IntoIter, I2::IntoIter>>
where
    T: Copy + Ord,
    I1: IntoIterator<Item = T>,
    I2: IntoIterator<Item = T>,
    I1::IntoIter: ExactSizeIterator,
    I2::IntoIter: ExactSizeIterator,
{
    if window_values == 0 {
        return Err(WindmerError::invalid_argument(
            "window_values must be at least 1 for a dual-stream minimiser",
        ));
    }
    let first = first.into_iter();
    let second = second.into_iter();
    if first.len() != second.len() {
        return Err(WindmerError::length_mismatch(first.len(), second.len()));
    }
    log::debug!(
        "dual minimiser: window_values={}, stream_len={}",
        window_values,
        first.len()
    );
    Ok(Minimiser::new_unchecked(
        StrandMin { first, second },
        window_values,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_minimiser(values: &[u64], w: usize) -> Vec<u64> {
        minimiser(values.iter().copied(), w)
            .expect("valid window")
            .collect()
    }

    #[test]
    fn test_single_stream_example() {
        // Windows of 4: [28,100,9,23] -> 9, then 4 and 1 arrive as strictly
        // smaller newcomers; the trailing windows keep 1 as their minimum.
        let values = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
        assert_eq!(collect_minimiser(&values, 4), vec![9, 4, 1]);
    }

    #[test]
    fn test_single_stream_dedup() {
        // [6,27,44,50] -> 6, [27,44,50,9] -> 9 (6 left the window).
        let values = [6u64, 27, 44, 50, 9];
        assert_eq!(collect_minimiser(&values, 4), vec![6, 9]);
    }

    #[test]
    fn test_all_equal_emits_every_window() {
        // 17 equal values, w=4: 14 windows. Every shift evicts the cached
        // minimum from the front, which forces a rescan and an emission.
        let values = [0u64; 17];
        let out = collect_minimiser(&values, 4);
        assert_eq!(out.len(), 14);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_recompute_on_eviction_even_if_equal() {
        // 3 at position 0 leaves the window while another 3 is still inside:
        // the recomputed minimum equals the old one but is emitted again.
        // Windows: [3,8,3] -> 3, [8,3,9] -> 3 (re-emitted), [3,9,10] -> silent.
        let values = [3u64, 8, 3, 9, 10];
        assert_eq!(collect_minimiser(&values, 3), vec![3, 3]);
    }

    #[test]
    fn test_window_longer_than_stream_clamps() {
        let values = [5u64, 3, 9];
        assert_eq!(collect_minimiser(&values, 20), vec![3]);
    }

    #[test]
    fn test_window_equal_to_stream() {
        let values = [5u64, 3, 9];
        assert_eq!(collect_minimiser(&values, 3), vec![3]);
    }

    #[test]
    fn test_empty_input() {
        let values: [u64; 0] = [];
        assert!(collect_minimiser(&values, 4).is_empty());
    }

    #[test]
    fn test_window_of_one_rejected() {
        let values = [1u64, 2, 3];
        assert!(matches!(
            minimiser(values.iter().copied(), 1),
            Err(WindmerError::InvalidArgument(_))
        ));
        assert!(matches!(
            minimiser(values.iter().copied(), 0),
            Err(WindmerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_iterator_is_fused_after_end() {
        let values = [4u64, 2, 7, 9];
        let mut it = minimiser(values.iter().copied(), 2).expect("valid window");
        assert_eq!(it.next(), Some(2));
        assert_eq!(it.next(), Some(7)); // 2 leaves, rescan emits 7
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_clone_has_independent_position() {
        let values = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
        let mut it = minimiser(values.iter().copied(), 4).expect("valid window");
        assert_eq!(it.next(), Some(9));
        let mut copy = it.clone();
        assert_eq!(it.next(), Some(4));
        assert_eq!(copy.next(), Some(4));
        assert_eq!(it.next(), Some(1));
        assert_eq!(copy.next(), Some(1));
    }

    // 4-mer hashes of ACGGCGACGTTTAG (A=0, C=1, G=2, T=3, base 4) and the
    // hashes of each k-mer's reverse complement at the same position.
    const FWD_HASHES: [u64; 11] = [26, 105, 166, 152, 97, 134, 27, 111, 191, 252, 242];
    const RC_HASHES: [u64; 11] = [91, 150, 101, 217, 182, 109, 27, 6, 1, 192, 112];

    #[test]
    fn test_dual_stream_strand_hashes() {
        let out: Vec<u64> = dual_minimiser(FWD_HASHES, RC_HASHES, 5)
            .expect("equal lengths")
            .collect();
        assert_eq!(out, vec![26, 97, 27, 6, 1]);
    }

    #[test]
    fn test_dual_stream_commutes() {
        let a: Vec<u64> = dual_minimiser(FWD_HASHES, RC_HASHES, 5)
            .expect("equal lengths")
            .collect();
        let b: Vec<u64> = dual_minimiser(RC_HASHES, FWD_HASHES, 5)
            .expect("equal lengths")
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dual_stream_window_of_one_allowed() {
        // With w=1 the dual minimiser degenerates to the element-wise
        // minimum; every window evicts its own minimum, so nothing dedups.
        let out: Vec<u64> = dual_minimiser([9u64, 2, 5], [1u64, 8, 5], 1)
            .expect("equal lengths")
            .collect();
        assert_eq!(out, vec![1, 2, 5]);
    }

    #[test]
    fn test_dual_stream_length_mismatch() {
        let first = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
        let second = [30u64, 2, 11, 101, 199, 73, 34, 900];
        match dual_minimiser(first, second, 4) {
            Err(WindmerError::LengthMismatch { first: 9, second: 8 }) => {}
            other => panic!("Expected LengthMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_seeded_zero_is_identity() {
        let values = [28u64, 100, 9];
        let out: Vec<u64> = seeded(values, 0).collect();
        assert_eq!(out, vec![28, 100, 9]);
    }

    #[test]
    fn test_seeded_round_trips() {
        let values = [28u64, 100, 9];
        let seed = 0x5555_5555_5555_5555;
        let out: Vec<u64> = seeded(seeded(values, seed), seed).collect();
        assert_eq!(out, vec![28, 100, 9]);
    }

    #[test]
    fn test_seeded_keeps_exact_size() {
        let it = seeded([1u64, 2, 3], crate::constants::DEFAULT_SEED);
        assert_eq!(it.len(), 3);
    }

    #[test]
    fn test_seeded_minimiser_runs_are_deterministic() {
        let values = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
        let run = || -> Vec<u64> {
            minimiser(seeded(values, 0), 4)
                .expect("valid window")
                .collect()
        };
        assert_eq!(run(), run());
        assert_eq!(run(), vec![9, 4, 1]);
    }
}
