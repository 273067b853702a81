//! Sampling profiles loaded from TOML files.
//!
//! A profile fixes the parameters a pipeline would otherwise thread by hand:
//! the window size and seed for minimiser selection and, optionally, the
//! shift count and offset policy for syncmer selection. Profiles are parsed
//! with serde and validated before anything is built from them, so operator
//! construction from a validated profile only fails on stream-level checks
//! (e.g. unequal strand lengths).
//!
//! ```toml
//! [sampling]
//! window = 5
//! seed = 0x5555555555555555
//!
//! [syncmer]
//! shifts = 2
//! policy = "closed"
//! ```
//!
//! Note: TOML integers are signed 64-bit, so the default seed
//! (0x8F3F73B5CF1C9ADE) cannot be written literally; omit `seed` to get it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{DEFAULT_SEED, MAX_PROFILE_SHIFTS, MAX_PROFILE_WINDOW};
use crate::core::minimiser::{dual_minimiser, minimiser, seeded, DualMinimiser, Minimiser, Seeded};
use crate::core::syncmer::{syncmer, Syncmer, SyncmerPolicy};
use crate::core::weighted::{weighted_minimiser_hash, MembershipSet, WeightedMinimiser};
use crate::error::{Result, WindmerError};

/// A parsed sampling profile.
#[derive(Debug, Deserialize)]
pub struct Profile {
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub syncmer: Option<SyncmerSettings>,
}

/// Window and seed settings for the minimiser family.
#[derive(Debug, Deserialize)]
pub struct SamplingSettings {
    /// Values per window.
    pub window: usize,
    /// Seed XORed into every hash; defaults to [`DEFAULT_SEED`].
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Settings for syncmer selection.
#[derive(Debug, Deserialize)]
pub struct SyncmerSettings {
    /// Window shifts (k - s); the s-mer window holds `shifts + 1` values.
    pub shifts: usize,
    /// Qualifying offsets; defaults to closed syncmers.
    #[serde(default = "default_policy")]
    pub policy: SyncmerPolicy,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_policy() -> SyncmerPolicy {
    SyncmerPolicy::Closed
}

/// Read and validate a sampling profile from a TOML file.
pub fn parse_profile(path: &Path) -> Result<Profile> {
    let contents =
        fs::read_to_string(path).map_err(|e| WindmerError::io(path, "read", e))?;

    let profile: Profile =
        toml::from_str(&contents).map_err(|e| WindmerError::profile(path, e.to_string()))?;

    validate_profile(&profile).map_err(|e| match e {
        WindmerError::InvalidArgument(detail) => WindmerError::profile(path, detail),
        other => other,
    })?;

    log::info!(
        "loaded sampling profile: window={}, seed={:#x}, syncmer={}",
        profile.sampling.window,
        profile.sampling.seed,
        profile.syncmer.is_some()
    );
    Ok(profile)
}

/// Validate profile values against the operator preconditions.
pub fn validate_profile(profile: &Profile) -> Result<()> {
    let window = profile.sampling.window;
    if window < 2 {
        return Err(WindmerError::invalid_argument(format!(
            "sampling.window must be at least 2 (got {})",
            window
        )));
    }
    if window > MAX_PROFILE_WINDOW {
        return Err(WindmerError::invalid_argument(format!(
            "sampling.window {} exceeds maximum {}",
            window, MAX_PROFILE_WINDOW
        )));
    }

    if let Some(sync) = &profile.syncmer {
        if sync.shifts == 0 {
            return Err(WindmerError::invalid_argument(
                "syncmer.shifts must be at least 1",
            ));
        }
        if sync.shifts > MAX_PROFILE_SHIFTS {
            return Err(WindmerError::invalid_argument(format!(
                "syncmer.shifts {} exceeds maximum {}",
                sync.shifts, MAX_PROFILE_SHIFTS
            )));
        }
        if let SyncmerPolicy::Offset(offset) = sync.policy {
            if offset > sync.shifts {
                return Err(WindmerError::invalid_argument(format!(
                    "syncmer.policy offset {} lies outside the window (0..={})",
                    offset, sync.shifts
                )));
            }
        }
    }

    Ok(())
}

impl SamplingSettings {
    /// Build a seeded single-stream minimiser with this profile's parameters.
    pub fn build_minimiser<I>(&self, hashes: I) -> Result<Minimiser<Seeded<I::IntoIter>>>
    where
        I: IntoIterator<Item = u64>,
    {
        minimiser(seeded(hashes, self.seed), self.window)
    }

    /// Build a seeded dual-stream minimiser with this profile's parameters.
    pub fn build_dual_minimiser<I1, I2>(
        &self,
        first: I1,
        second: I2,
    ) -> Result<DualMinimiser<Seeded<I1::IntoIter>, Seeded<I2::IntoIter>>>
    where
        I1: IntoIterator<Item = u64>,
        I2: IntoIterator<Item = u64>,
        I1::IntoIter: ExactSizeIterator,
        I2::IntoIter: ExactSizeIterator,
    {
        dual_minimiser(
            seeded(first, self.seed),
            seeded(second, self.seed),
            self.window,
        )
    }

    /// Build a weighted minimiser with this profile's parameters.
    pub fn build_weighted<I1, I2, M>(
        &self,
        forward: I1,
        reverse: I2,
        membership: M,
    ) -> Result<WeightedMinimiser<I1::IntoIter, I2::IntoIter, M>>
    where
        I1: IntoIterator<Item = u64>,
        I2: IntoIterator<Item = u64>,
        I1::IntoIter: ExactSizeIterator,
        I2::IntoIter: ExactSizeIterator,
        M: MembershipSet,
    {
        weighted_minimiser_hash(forward, reverse, self.window, membership, self.seed)
    }
}

impl SyncmerSettings {
    /// Build a syncmer operator with this profile's parameters.
    pub fn build<K, S>(&self, kmers: K, smers: S) -> Result<Syncmer<K::IntoIter, S::IntoIter>>
    where
        K: IntoIterator<Item = u64>,
        S: IntoIterator<Item = u64>,
    {
        syncmer(kmers, smers, self.shifts, self.policy)
    }
}
