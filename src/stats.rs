//! Per-worker counters and the per-request stats block they feed.

use std::time::Duration;

use crate::clock::{Arrival, TimeVal};

/// The three kinds of 2xx response whose worker counter advances by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Dynamic,
    Post,
}

/// Counters owned exclusively by one worker thread.
///
/// No other thread ever reads or writes these fields: they are emitted in
/// the same request whose handling updated them, so there is nothing to
/// synchronize.
#[derive(Debug, Default)]
pub struct WorkerCounters {
    pub id: usize,
    pub count: u64,
    pub static_n: u64,
    pub dynamic_n: u64,
    pub post_n: u64,
}

impl WorkerCounters {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Called once per dequeued connection, before the handler runs, so
    /// `thread_count` in the emitted headers is inclusive of the current
    /// request (invariant 2 in the design's testable properties).
    pub fn begin_request(&mut self) {
        self.count += 1;
    }

    /// Called by the handler only on a successful (2xx) response of the
    /// given kind. Error responses leave all three kind counters alone.
    pub fn record_success(&mut self, kind: Kind) {
        match kind {
            Kind::Static => self.static_n += 1,
            Kind::Dynamic => self.dynamic_n += 1,
            Kind::Post => self.post_n += 1,
        }
    }

    /// Snapshots the current counters plus timing into a [`StatsRecord`]
    /// for one request. `dispatch` is the duration from arrival to the
    /// moment the worker dequeued the connection — captured by the caller
    /// right after `dequeue`, not recomputed here, so it never includes
    /// request-read or handler runtime (CGI in particular).
    pub fn snapshot(&self, arrival: Arrival, dispatch: Duration) -> StatsRecord {
        StatsRecord {
            arrival: arrival.as_timeval(),
            dispatch: TimeVal::from_duration(dispatch),
            thread_id: self.id,
            thread_count: self.count,
            thread_static: self.static_n,
            thread_dynamic: self.dynamic_n,
            thread_post: self.post_n,
        }
    }
}

/// The full stats block for one completed request, as emitted on the wire
/// and appended (verbatim, as the same bytes) to the in-memory log.
#[derive(Debug, Clone, Copy)]
pub struct StatsRecord {
    pub arrival: TimeVal,
    pub dispatch: TimeVal,
    pub thread_id: usize,
    pub thread_count: u64,
    pub thread_static: u64,
    pub thread_dynamic: u64,
    pub thread_post: u64,
}

impl StatsRecord {
    /// Renders the `Stat-*` header block, CRLF-terminated, with the
    /// trailing blank line that separates headers from the body.
    pub fn header_block(&self) -> Vec<u8> {
        format!(
            "Stat-Req-Arrival:: {}\r\n\
             Stat-Req-Dispatch:: {}\r\n\
             Stat-Thread-Id:: {}\r\n\
             Stat-Thread-Count:: {}\r\n\
             Stat-Thread-Static:: {}\r\n\
             Stat-Thread-Dynamic:: {}\r\n\
             Stat-Thread-Post:: {}\r\n\
             \r\n",
            self.arrival,
            self.dispatch,
            self.thread_id,
            self.thread_count,
            self.thread_static,
            self.thread_dynamic,
            self.thread_post,
        )
        .into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_request_is_inclusive_of_current() {
        let mut c = WorkerCounters::new(0);
        c.begin_request();
        assert_eq!(c.count, 1);
        c.begin_request();
        assert_eq!(c.count, 2);
    }

    #[test]
    fn kind_counters_track_only_successes() {
        let mut c = WorkerCounters::new(0);
        c.begin_request();
        c.record_success(Kind::Static);
        c.begin_request(); // a 404, say — no record_success call
        assert_eq!(c.count, 2);
        assert_eq!(c.static_n, 1);
        assert_eq!(c.dynamic_n, 0);
        assert_eq!(c.post_n, 0);
    }

    #[test]
    fn header_block_has_double_colon_and_trailing_blank_line() {
        let c = WorkerCounters::new(3);
        let record = c.snapshot(Arrival::now(), Duration::from_millis(5));
        let block = record.header_block();
        let text = String::from_utf8(block).unwrap();
        assert!(text.starts_with("Stat-Req-Arrival:: "));
        assert!(text.contains("Stat-Thread-Id:: 3\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn invariant_count_covers_kinds() {
        let mut c = WorkerCounters::new(0);
        for _ in 0..5 {
            c.begin_request();
        }
        c.record_success(Kind::Static);
        c.record_success(Kind::Dynamic);
        c.record_success(Kind::Post);
        assert!(c.count >= c.static_n + c.dynamic_n + c.post_n);
    }
}
