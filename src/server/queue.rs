//! The bounded FIFO intake queue between the listener and the worker pool.
//!
//! Realizes the "mutex + two condvars" queue shape with a bounded MPMC
//! channel: a full queue blocks the listener's `enqueue` (backpressure,
//! not drop-newest/drop-oldest), and an empty queue blocks a worker's
//! `dequeue`. `crossbeam::channel` guarantees FIFO delivery order, which
//! is the one correctness property a generic "any concurrent queue" could
//! violate.

use std::net::TcpStream;

use crossbeam::channel::{self, Receiver, RecvError, SendError, Sender};

use crate::clock::Arrival;

/// One accepted connection, stamped with its arrival time, as it travels
/// from the listener to whichever worker dequeues it.
pub struct ConnectionHandle {
    pub stream: TcpStream,
    pub arrival: Arrival,
}

/// A cheaply-clonable handle to one bounded intake queue.
///
/// Cloning shares the same underlying channel (it does not create a new
/// queue) — the listener holds one clone to produce, each worker holds
/// one clone to consume.
#[derive(Clone)]
pub struct Queue {
    sender: Sender<ConnectionHandle>,
    receiver: Receiver<ConnectionHandle>,
}

impl Queue {
    /// Creates a queue with room for `capacity` pending connections.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Enqueues a connection, blocking the caller while the queue is full.
    /// Fails only once every worker has dropped its receiver.
    pub fn enqueue(&self, conn: ConnectionHandle) -> Result<(), SendError<ConnectionHandle>> {
        self.sender.send(conn)
    }

    /// Dequeues the next connection in FIFO order, blocking while the
    /// queue is empty. Fails once the listener's sender is dropped and
    /// the queue has drained.
    pub fn dequeue(&self) -> Result<ConnectionHandle, RecvError> {
        self.receiver.recv()
    }

    /// The number of connections currently waiting (not yet dequeued).
    pub fn len(&self) -> usize {
        self.sender.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};
    use std::time::Duration;

    fn dummy_stream() -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let _ = listener.accept().unwrap();
        client
    }

    #[test]
    fn fifo_order_is_preserved() {
        let queue = Queue::bounded(4);
        for _ in 0..3 {
            queue.enqueue(ConnectionHandle {
                stream: dummy_stream(),
                arrival: Arrival::now(),
            })
            .unwrap();
        }
        assert_eq!(queue.len(), 3);
        for _ in 0..3 {
            queue.dequeue().unwrap();
        }
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn full_queue_blocks_enqueue_until_dequeued() {
        let queue = Queue::bounded(1);
        queue
            .enqueue(ConnectionHandle {
                stream: dummy_stream(),
                arrival: Arrival::now(),
            })
            .unwrap();

        let producer = queue.clone();
        let handle = std::thread::spawn(move || {
            producer
                .enqueue(ConnectionHandle {
                    stream: dummy_stream(),
                    arrival: Arrival::now(),
                })
                .unwrap();
        });

        std::thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());

        queue.dequeue().unwrap();
        handle.join().unwrap();
    }
}
