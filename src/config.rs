//! CLI argument parsing and validated server configuration.
//!
//! Argument parsing itself is an external collaborator (the design's core
//! is the intake/dispatch engine, not argv handling) but a runnable binary
//! still needs it, so it lives here as a small, hand-rolled parser rather
//! than pulling in a full CLI framework for three positional integers.

use std::fmt;

use crate::errors::StartupError;

/// Validated startup configuration: `server <port> <threads> <queue_size>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub threads: usize,
    pub queue_size: usize,
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "port={} threads={} queue_size={}",
            self.port, self.threads, self.queue_size
        )
    }
}

impl ServerConfig {
    /// Parses `args` (expected to be `env::args().skip(1)`-style, i.e. not
    /// including argv[0]) into a validated configuration.
    pub fn from_args<I, S>(args: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let [port, threads, queue_size] = parts.as_slice() else {
            return Err(StartupError::InvalidArgs(format!(
                "expected 3 arguments, got {}",
                parts.len()
            )));
        };

        let port: u16 = port
            .parse()
            .map_err(|_| StartupError::InvalidArgs(format!("invalid port: {port}")))?;

        let threads: usize = threads
            .parse()
            .map_err(|_| StartupError::InvalidArgs(format!("invalid thread count: {threads}")))?;
        if threads < 1 {
            return Err(StartupError::InvalidArgs("threads must be >= 1".into()));
        }

        let queue_size: usize = queue_size.parse().map_err(|_| {
            StartupError::InvalidArgs(format!("invalid queue size: {queue_size}"))
        })?;
        if queue_size < 1 {
            return Err(StartupError::InvalidArgs("queue_size must be >= 1".into()));
        }

        Ok(Self {
            port,
            threads,
            queue_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_args() {
        let cfg = ServerConfig::from_args(["7777", "4", "8"]).unwrap();
        assert_eq!(
            cfg,
            ServerConfig {
                port: 7777,
                threads: 4,
                queue_size: 8
            }
        );
    }

    #[test]
    fn rejects_wrong_arg_count() {
        assert!(ServerConfig::from_args(["7777", "4"]).is_err());
        assert!(ServerConfig::from_args(["7777", "4", "8", "9"]).is_err());
    }

    #[test]
    fn rejects_zero_threads_or_queue() {
        assert!(ServerConfig::from_args(["7777", "0", "8"]).is_err());
        assert!(ServerConfig::from_args(["7777", "4", "0"]).is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(ServerConfig::from_args(["abc", "4", "8"]).is_err());
    }
}
