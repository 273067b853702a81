//! Streaming sub-sequence sampling over lazy hash streams.
//!
//! windmer reduces a long stream of comparable hash values (typically rolling
//! k-mer hashes of a DNA sequence) to a much smaller, position-stable summary
//! by selecting one representative per sliding window. All operators are
//! single-pass pull iterators: they advance their upstream one value per step,
//! hold at most one window of state, and validate every parameter at
//! construction so that iteration itself can never fail.
//!
//! - [`minimiser`] — deduplicated per-window minima of one hash stream.
//! - [`dual_minimiser`] — the same over the element-wise minimum of two
//!   equal-length streams (forward and reverse-complement strand hashes).
//! - [`weighted_minimiser_hash`] — strand-combined minima where membership of
//!   either strand hash in an external set flips the per-position choice from
//!   `min` to `max`, steering selection away from flagged k-mers.
//! - [`syncmer`] — k-mers whose smallest internal s-mer sits at a configured
//!   window offset.
//!
//! The k-mer hashing itself, alphabet handling and file I/O live upstream;
//! windmer consumes any `Iterator` of totally ordered values and hands back
//! an `Iterator` of the same item type.
//!
//! ```
//! use windmer::{minimiser, seeded};
//!
//! let hashes = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
//! let mins: Vec<u64> = minimiser(seeded(hashes, 0), 4).unwrap().collect();
//! assert_eq!(mins, vec![9, 4, 1]);
//! ```

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::constants::DEFAULT_SEED;
pub use crate::core::minimiser::{
    dual_minimiser, minimiser, seeded, DualMinimiser, Minimiser, Seeded, StrandMin,
};
pub use crate::core::syncmer::{syncmer, Syncmer, SyncmerPolicy};
pub use crate::core::weighted::{
    weighted_minimiser_hash, MembershipSet, Predicate, WeightedCombiner, WeightedMinimiser,
};
pub use crate::core::window::WindowBuffer;
pub use crate::error::{Result, WindmerError};
