//! Shared utilities: the monotonic clock and diagnostic formatting

pub mod clock;
pub mod time;
