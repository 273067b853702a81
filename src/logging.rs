//! Logger setup for pipelines embedding the sampling operators.
//!
//! The operators themselves only log construction parameters at debug level;
//! nothing logs on the per-element path. Hosts that already configure their
//! own `log` backend can skip this module entirely.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Install an `env_logger` writing to stderr with run-relative timestamps.
///
/// `verbose` selects Debug over the default Warn filter; `RUST_LOG` still
/// overrides both. Each line carries the seconds elapsed since this call and
/// the emitting module, e.g. `[   0.07s] DEBUG windmer::core::minimiser: ...`.
pub fn init_logger(verbose: bool) {
    START_TIME.set(Instant::now()).ok();

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| {
            let elapsed = START_TIME.get().map(|t| t.elapsed()).unwrap_or_default();
            writeln!(
                buf,
                "[{:7.2}s] {} {}: {}",
                elapsed.as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
