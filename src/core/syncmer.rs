//! Streaming syncmer operator.
//!
//! A syncmer is a k-mer selected because the smallest of its internal s-mers
//! sits at a designated offset. The operator consumes two parallel hash
//! streams derived from the same sequence: the k-mer hashes and the s-mer
//! hashes, where each k-mer at position `i` spans the s-mers at positions
//! `i ..= i + shifts` (`shifts` = k - s). It keeps a window of `shifts + 1`
//! s-mer values and emits the k-mer whose window qualifies under the policy.
//!
//! Tie handling follows robust winnowing: minima are scanned under `<=` so
//! the rightmost occurrence is the canonical one, which keeps selection
//! stable across shifts in repeat regions. The two policies treat ties
//! differently:
//!
//! - `Offset(t)` compares values, so an offset that merely ties with the
//!   window minimum still qualifies (an all-equal window qualifies at every
//!   offset).
//! - `Closed` accepts a tie only at the front. After the first window, the
//!   suffix slot qualifies solely through a newly arrived s-mer that is
//!   *strictly* smaller than every other value in the window; a newcomer
//!   that ties the minimum stays silent. The first window is the exception:
//!   priming accepts the minimum value at either endpoint.

use serde::{Deserialize, Serialize};

use crate::core::window::WindowBuffer;
use crate::error::{Result, WindmerError};

/// Which s-mer window offsets qualify a k-mer as a syncmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncmerPolicy {
    /// The smallest s-mer must sit at this single offset (0 = prefix,
    /// `shifts` = suffix, anything between is an open syncmer).
    Offset(usize),
    /// The smallest s-mer must sit at either end of the window
    /// (offsets 0 or `shifts`): closed syncmers.
    Closed,
}

/// Streaming syncmer selection over paired k-mer/s-mer hash streams.
///
/// Construct through [`syncmer`]. Iteration ends when the k-mer stream ends;
/// the s-mer stream is never read past the values the current window needs,
/// and an input too short for one full window yields an empty output.
#[derive(Clone)]
pub struct Syncmer<K, S>
where
    K: Iterator,
    S: Iterator<Item = K::Item>,
    K::Item: Copy + Ord,
{
    kmers: K,
    smers: S,
    window: WindowBuffer<K::Item>,
    shifts: usize,
    policy: SyncmerPolicy,
    primed: bool,
    done: bool,
}

impl<K, S> Syncmer<K, S>
where
    K: Iterator,
    S: Iterator<Item = K::Item>,
    K::Item: Copy + Ord,
{
    /// Emission check for the first window: the minimum value at the
    /// qualifying offset(s), ties included at both endpoints.
    fn first_window_qualifies(&self) -> bool {
        let min = match self.window.robust_min() {
            Some(min) => min,
            None => return false,
        };
        match self.policy {
            SyncmerPolicy::Offset(offset) => self.window.get(offset) == Some(min),
            SyncmerPolicy::Closed => {
                self.window.front() == Some(min) || self.window.get(self.shifts) == Some(min)
            }
        }
    }

    /// Shift the window by one s-mer and report whether the new window
    /// qualifies.
    ///
    /// For `Closed`, the suffix slot only qualifies through a strictly
    /// smaller newcomer: `new_smer` is compared against the minimum of the
    /// values it joins, before it enters the window. A tie at the suffix
    /// does not emit; a front that holds the minimum value does.
    fn shift_window(&mut self, new_smer: K::Item) -> bool {
        match self.policy {
            SyncmerPolicy::Offset(offset) => {
                self.window.pop_front();
                self.window.push_back(new_smer);
                match self.window.robust_min() {
                    Some(min) => self.window.get(offset) == Some(min),
                    None => false,
                }
            }
            SyncmerPolicy::Closed => {
                self.window.pop_front();
                let min_rest = self.window.robust_min();
                self.window.push_back(new_smer);
                match min_rest {
                    Some(rest) if new_smer < rest => true,
                    _ => {
                        let min = self.window.robust_min();
                        min.is_some() && self.window.front() == min
                    }
                }
            }
        }
    }

    /// Fill the first s-mer window (`shifts + 1` values) and line up the
    /// first k-mer. Returns the first emission, if the first window qualifies.
    fn prime(&mut self) -> Option<Option<K::Item>> {
        self.primed = true;
        for _ in 0..=self.shifts {
            match self.smers.next() {
                Some(value) => self.window.push_back(value),
                None => {
                    self.done = true;
                    return Some(None);
                }
            }
        }
        let kmer = match self.kmers.next() {
            Some(kmer) => kmer,
            None => {
                self.done = true;
                return Some(None);
            }
        };
        if self.first_window_qualifies() {
            return Some(Some(kmer));
        }
        None
    }
}

impl<K, S> Iterator for Syncmer<K, S>
where
    K: Iterator,
    S: Iterator<Item = K::Item>,
    K::Item: Copy + Ord,
{
    type Item = K::Item;

    fn next(&mut self) -> Option<K::Item> {
        if self.done {
            return None;
        }
        if !self.primed {
            if let Some(result) = self.prime() {
                return result;
            }
            // First window did not qualify; fall through and keep shifting.
        }
        loop {
            let kmer = match self.kmers.next() {
                Some(kmer) => kmer,
                None => {
                    self.done = true;
                    return None;
                }
            };
            let new_smer = match self.smers.next() {
                Some(value) => value,
                None => {
                    self.done = true;
                    return None;
                }
            };
            if self.shift_window(new_smer) {
                return Some(kmer);
            }
        }
    }
}

/// Build a syncmer operator over paired k-mer and s-mer hash streams.
///
/// `shifts` is the number of window shifts, i.e. k - s; the s-mer window
/// holds `shifts + 1` values. The s-mer stream is expected to run `shifts`
/// values longer than the k-mer stream (both derived from one sequence).
///
/// # Errors
/// `InvalidArgument` if `shifts` is 0 (the s-mer length must be smaller than
/// the k-mer length) or a policy offset lies outside the window.
pub fn syncmer<K, S, T>(
    kmers: K,
    smers: S,
    shifts: usize,
    policy: SyncmerPolicy,
) -> Result<Syncmer<K::IntoIter, S::IntoIter>>
where
    T: Copy + Ord,
    K: IntoIterator<Item = T>,
    S: IntoIterator<Item = T>,
{
    if shifts == 0 {
        return Err(WindmerError::invalid_argument(
            "syncmer windows need at least one shift: the s-mer length must be \
             smaller than the k-mer length",
        ));
    }
    if let SyncmerPolicy::Offset(offset) = policy {
        if offset > shifts {
            return Err(WindmerError::invalid_argument(format!(
                "syncmer offset {} lies outside the s-mer window (0..={})",
                offset, shifts
            )));
        }
    }
    log::debug!("syncmer: shifts={}, policy={:?}", shifts, policy);
    Ok(Syncmer {
        kmers: kmers.into_iter(),
        smers: smers.into_iter(),
        window: WindowBuffer::with_capacity(shifts + 1),
        shifts,
        policy,
        primed: false,
        done: false,
    })
}
