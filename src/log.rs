//! The in-memory, append-only request log returned verbatim by `POST`.

use std::sync::Mutex;

/// Grow-only log of completed-request stat blocks.
///
/// Guarded by a single mutex (§5: "Request log: guarded by one mutex").
/// Appends happen after a 2xx GET response's stats are finalised; `POST`
/// never appends its own entry (resolved open question in the design).
pub struct RequestLog {
    blocks: Mutex<Vec<u8>>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
        }
    }

    /// Appends the exact bytes of one stat block. Called only for 2xx
    /// static/dynamic responses, after the response has been written.
    pub fn append(&self, block: &[u8]) {
        let mut guard = self.blocks.lock().expect("request log mutex poisoned");
        guard.extend_from_slice(block);
    }

    /// Takes a consistent snapshot of the log for a `POST` response body.
    ///
    /// The lock is held only for the copy; the snapshot is handed back to
    /// the caller to write out unlocked, so a concurrent append can't be
    /// observed as a torn write and can't block other workers' snapshots
    /// for longer than a `memcpy`.
    pub fn snapshot(&self) -> Vec<u8> {
        self.blocks.lock().expect("request log mutex poisoned").clone()
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_prior_appends_in_order() {
        let log = RequestLog::new();
        log.append(b"first\r\n\r\n");
        log.append(b"second\r\n\r\n");
        assert_eq!(log.snapshot(), b"first\r\n\r\nsecond\r\n\r\n".to_vec());
    }

    #[test]
    fn second_snapshot_is_superset_of_first() {
        let log = RequestLog::new();
        log.append(b"a\r\n\r\n");
        let first = log.snapshot();
        log.append(b"b\r\n\r\n");
        let second = log.snapshot();
        assert!(second.starts_with(&first));
        assert_ne!(first, second);
    }

    #[test]
    fn empty_log_snapshots_empty() {
        let log = RequestLog::new();
        assert!(log.snapshot().is_empty());
    }
}
