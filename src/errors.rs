//! Error hierarchy.
//!
//! The server draws a hard line between two error kinds, matching the
//! propagation policy in the design: [`StartupError`] is fatal and
//! terminates the process from `main`; [`HandlerError`] is recovered at
//! the worker boundary and converted into a `404`/`501` response, never
//! propagated past a single connection.

use std::io;
use std::net::SocketAddr;

/// Errors that can occur before the server starts serving traffic.
///
/// Every variant here ends the process with a non-zero exit code.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("usage: server <port> <threads> <queue_size>: {0}")]
    InvalidArgs(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to configure listening socket: {0}")]
    SocketConfig(#[source] io::Error),

    #[error("failed to resolve document root: {0}")]
    DocRoot(#[source] io::Error),
}

/// Errors arising while servicing a single connection.
///
/// Every variant is recovered by the handler into an HTTP error response;
/// none of these ever unwind out of the worker loop.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("unrecognized or unsupported HTTP method")]
    UnknownMethod,

    #[error("malformed request line or headers")]
    MalformedRequest,

    #[error("path does not resolve to a readable file")]
    NotFound,

    #[error("CGI script failed to execute")]
    CgiExecFailed(#[source] io::Error),

    #[error("I/O error while reading the request")]
    Io(#[from] io::Error),
}

impl HandlerError {
    /// Maps a handler-level error to the status code emitted for it.
    ///
    /// Every variant resolves to either 404 or 501 — the only error
    /// statuses this server emits.
    pub(crate) fn status(&self) -> crate::http::types::StatusCode {
        use crate::http::types::StatusCode;
        match self {
            HandlerError::UnknownMethod => StatusCode::NotImplemented,
            HandlerError::MalformedRequest => StatusCode::NotImplemented,
            HandlerError::NotFound | HandlerError::CgiExecFailed(_) => StatusCode::NotFound,
            HandlerError::Io(_) => StatusCode::NotFound,
        }
    }
}
