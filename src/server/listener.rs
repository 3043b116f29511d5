//! The listening socket and the accept loop that feeds the intake queue.

use std::net::{SocketAddr, TcpListener};

use socket2::{Domain, Socket, Type};

use crate::clock::Arrival;
use crate::errors::StartupError;
use crate::server::queue::{ConnectionHandle, Queue};

/// Backlog passed to `listen(2)`. Chosen generously relative to any
/// realistic `queue_size`, since the OS accept backlog and the
/// application-level intake queue serve different purposes: the kernel
/// backlog absorbs bursts before `accept` is even called.
const LISTEN_BACKLOG: i32 = 1024;

/// Binds and configures the listening socket: `SO_REUSEADDR` so a
/// restarted server doesn't fail on `TIME_WAIT` sockets from the previous
/// run, and an explicit backlog independent of the platform default.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    let domain = Domain::for_address(addr);
    let socket = Socket::new(domain, Type::STREAM, None).map_err(StartupError::SocketConfig)?;
    socket.set_reuse_address(true).map_err(StartupError::SocketConfig)?;
    socket
        .bind(&addr.into())
        .map_err(|source| StartupError::Bind { addr, source })?;
    socket
        .listen(LISTEN_BACKLOG)
        .map_err(StartupError::SocketConfig)?;
    Ok(socket.into())
}

/// Accepts connections forever, stamping each with its arrival time and
/// handing it to `queue`. Transient accept errors are logged and do not
/// stop the loop; the loop only ends if every worker has dropped its
/// receiver (which does not happen during normal operation — the server
/// runs until signalled, per the design's non-goals).
pub fn run(listener: TcpListener, queue: Queue) {
    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                let arrival = Arrival::now();
                tracing::debug!(%peer, "accepted connection");
                if queue.enqueue(ConnectionHandle { stream, arrival }).is_err() {
                    tracing::error!("intake queue has no workers left; listener stopping");
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(%err, "transient error accepting connection");
            }
        }
    }
}
