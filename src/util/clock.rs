//! Monotonic nanosecond clock
//!
//! Latencies are bounded by two reads of `CLOCK_MONOTONIC` taken directly through
//! `clock_gettime`, which avoids the extra bookkeeping of `std::time::Instant` and
//! hands back a plain `u64` that can be subtracted and summed without conversion.
//!
//! A clock that cannot be read invalidates every measurement taken after it, so
//! [`MonotonicClock::now`] terminates the process instead of returning an error.
//! [`MonotonicClock::try_now`] is the fallible variant for callers that want the
//! error value.

use thiserror::Error;

/// Nanoseconds per second
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Exit status used when the monotonic clock cannot be read
pub const EXIT_CLOCK_FAILURE: i32 = 3;

/// The monotonic clock could not be read
#[derive(Debug, Error)]
#[error("failed to read CLOCK_MONOTONIC: {source}")]
pub struct ClockError {
    #[source]
    source: std::io::Error,
}

/// Source of monotonic nanosecond timestamps
///
/// Executors are generic over the clock so tests can substitute a scripted one.
pub trait ClockSource: Send {
    /// Current timestamp in nanoseconds
    fn now(&self) -> u64;
}

/// `CLOCK_MONOTONIC` read through libc
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    /// Read the clock, returning the OS error on failure
    #[inline(always)]
    pub fn try_now() -> Result<u64, ClockError> {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        if rc != 0 {
            return Err(ClockError {
                source: std::io::Error::last_os_error(),
            });
        }

        Ok((ts.tv_sec as u64) * NANOS_PER_SEC + (ts.tv_nsec as u64))
    }
}

impl ClockSource for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> u64 {
        match Self::try_now() {
            Ok(nanos) => nanos,
            Err(e) => clock_failure(e),
        }
    }
}

#[cold]
fn clock_failure(err: ClockError) -> ! {
    tracing::error!(error = %err, "monotonic clock unavailable, aborting");
    eprintln!("Error: {}", err);
    std::process::exit(EXIT_CLOCK_FAILURE);
}
