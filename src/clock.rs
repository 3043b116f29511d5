//! Wall-clock and monotonic timestamping for the stats block.
//!
//! `Stat-Req-Arrival` is wall-clock (resolved open question: a `SystemTime`,
//! matching the usual `timeval` `%ld.%06ld` formatting), while
//! `Stat-Req-Dispatch` is a duration derived from a paired monotonic
//! `Instant` so it can never go negative under clock adjustment.

use std::fmt;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A timestamp captured at connection acceptance: wall-clock for display,
/// monotonic for measuring elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct Arrival {
    wall: SystemTime,
    monotonic: Instant,
}

impl Arrival {
    /// Captures "now" on both clocks. Called exactly once per connection,
    /// on the listener thread, immediately after `accept` returns.
    pub fn now() -> Self {
        Self {
            wall: SystemTime::now(),
            monotonic: Instant::now(),
        }
    }

    /// The wall-clock arrival time, formatted as `Stat-Req-Arrival` wants it.
    pub fn as_timeval(&self) -> TimeVal {
        TimeVal::from_system_time(self.wall)
    }

    /// Elapsed time since this arrival was captured, i.e. the dispatch
    /// latency once the worker dequeues the connection.
    pub fn elapsed(&self) -> Duration {
        self.monotonic.elapsed()
    }
}

/// A `seconds.microseconds` pair, formatted exactly as `%ld.%06ld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeVal {
    pub secs: i64,
    pub micros: u32,
}

impl TimeVal {
    fn from_system_time(t: SystemTime) -> Self {
        let dur = t.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self {
            secs: dur.as_secs() as i64,
            micros: dur.subsec_micros(),
        }
    }

    /// Builds a `TimeVal` from an elapsed [`Duration`] (used for
    /// `Stat-Req-Dispatch`, which has no epoch, just a magnitude).
    pub fn from_duration(d: Duration) -> Self {
        Self {
            secs: d.as_secs() as i64,
            micros: d.subsec_micros(),
        }
    }
}

impl fmt::Display for TimeVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}
