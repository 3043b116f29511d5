//! The worker thread loop: dequeue, dispatch, write, repeat.
//!
//! Each worker owns its [`WorkerCounters`] exclusively, so no
//! synchronization is needed around the per-thread statistics — only the
//! queue and the log are shared across workers.

use std::io::{BufReader, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::handler::Handler;
use crate::http::request;
use crate::log::RequestLog;
use crate::server::queue::{ConnectionHandle, Queue};
use crate::stats::WorkerCounters;

/// Spawns one worker thread servicing `queue` forever.
///
/// A handler-level panic while servicing a connection is caught at this
/// boundary (see the design's propagation policy): it is logged, the
/// connection is dropped, and the worker moves on to the next one rather
/// than taking the whole process down.
pub fn spawn(id: usize, queue: Queue, handler: Arc<Handler>, log: Arc<RequestLog>) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("worker-{id}"))
        .spawn(move || {
            let mut counters = WorkerCounters::new(id);
            loop {
                let conn = match queue.dequeue() {
                    Ok(conn) => conn,
                    Err(_) => {
                        tracing::info!(worker = id, "intake queue closed, worker exiting");
                        return;
                    }
                };
                // Measured the instant the connection is dequeued, before
                // request parsing or handler work (CGI in particular) can
                // inflate it — this is `Stat-Req-Dispatch`.
                let dispatch = conn.arrival.elapsed();

                let handler = &handler;
                let log = &log;
                let counters = &mut counters;
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    service_connection(conn, dispatch, handler, log, counters)
                }));

                if let Err(panic) = result {
                    let message = panic_message(&panic);
                    tracing::error!(worker = id, %message, "handler panicked; connection dropped");
                }
            }
        })
        .expect("failed to spawn worker thread")
}

fn service_connection(
    conn: ConnectionHandle,
    dispatch: Duration,
    handler: &Handler,
    log: &RequestLog,
    counters: &mut WorkerCounters,
) {
    let mut reader = BufReader::new(&conn.stream);
    let parsed = request::parse(&mut reader);
    let response_bytes = handler.dispatch(parsed, counters, log, conn.arrival, dispatch);

    let mut stream = &conn.stream;
    if let Err(err) = stream.write_all(&response_bytes) {
        tracing::warn!(worker = counters.id, %err, "failed to write response; abandoning connection");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
