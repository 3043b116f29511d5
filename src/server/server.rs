//! Ties the listener, the intake queue, the worker pool, and the shared
//! request log into one runnable server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::StartupError;
use crate::handler::Handler;
use crate::log::RequestLog;
use crate::server::{listener, queue::Queue, worker};

/// A fully wired, not-yet-running server.
pub struct Server {
    config: ServerConfig,
    handler: Arc<Handler>,
    log: Arc<RequestLog>,
}

impl Server {
    /// Builds a server that will serve `doc_root` once [`Server::run`] is
    /// called.
    pub fn new(config: ServerConfig, doc_root: PathBuf) -> Self {
        Self {
            config,
            handler: Arc::new(Handler::new(doc_root)),
            log: Arc::new(RequestLog::new()),
        }
    }

    /// Binds the listening socket, spawns the worker pool, and runs the
    /// accept loop on the calling thread. Returns only on a startup
    /// failure — the accept loop itself runs until the process is
    /// signalled (no graceful shutdown; see the design's non-goals).
    pub fn run(self) -> Result<(), StartupError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let tcp_listener = listener::bind(addr)?;
        let queue = Queue::bounded(self.config.queue_size);

        tracing::info!(config = %self.config, local_addr = %addr, "server starting");

        let workers: Vec<_> = (0..self.config.threads)
            .map(|id| worker::spawn(id, queue.clone(), Arc::clone(&self.handler), Arc::clone(&self.log)))
            .collect();

        listener::run(tcp_listener, queue);

        for w in workers {
            let _ = w.join();
        }
        Ok(())
    }
}
