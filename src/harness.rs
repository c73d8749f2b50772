use std::hint::black_box;
use std::time::Instant;

use crate::error::{BenchError, Result};

/// Full operation cycles run before measurement starts.
pub const DEFAULT_WARMUP_CYCLES: usize = 5;

/// Length of the fixed message signed by signature protocols.
pub const DEFAULT_MESSAGE_LEN: usize = 1024;

/// Byte value the fixed message is filled with.
pub const MESSAGE_BYTE: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            Profile::Quick => 20,
            Profile::Full => 100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    /// Measured iterations per algorithm.
    pub iterations: usize,
    pub warmup_cycles: usize,
    pub message_len: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::from_profile(Profile::Full)
    }
}

impl BenchConfig {
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            profile,
            iterations: profile.iterations(),
            warmup_cycles: DEFAULT_WARMUP_CYCLES,
            message_len: DEFAULT_MESSAGE_LEN,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// A run needs at least one measured iteration.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The deterministic message signed on every iteration.
    pub fn message(&self) -> Vec<u8> {
        vec![MESSAGE_BYTE; self.message_len]
    }
}

/// Local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Run `op` once and return its wall-clock duration in milliseconds with its result.
///
/// Only the call itself is inside the measured window. An `Err` from `op`
/// is returned as-is and its duration discarded.
pub fn time_op<T, E>(op: impl FnOnce() -> std::result::Result<T, E>) -> std::result::Result<(f64, T), E> {
    let start = Instant::now();
    let outcome = black_box(op());
    let elapsed = start.elapsed();
    let value = outcome?;
    Ok((elapsed.as_secs_f64() * 1_000.0, value))
}

/// Run `cycle` `cycles` times, stopping at the first failure.
///
/// On failure returns the 1-based cycle number with the error. Nothing is
/// timed; warmup exists only to prime caches and to surface broken bindings.
pub fn warm_up<E>(
    cycles: usize,
    mut cycle: impl FnMut() -> std::result::Result<(), E>,
) -> std::result::Result<(), (usize, E)> {
    for n in 1..=cycles {
        cycle().map_err(|e| (n, e))?;
    }
    Ok(())
}
