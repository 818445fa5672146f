//! FIFO queues connecting the coordinator and its workers.
//!
//! Both shared structures of the system are the same shape: an unbounded
//! tokio mpsc channel whose receiver sits behind a mutex, so any number of
//! producers enqueue without blocking and concurrent consumers are mutually
//! exclusive on dequeue.

use std::time::Duration;

use specforge_core::{Outcome, Spec};
use tokio::sync::{mpsc, Mutex};

/// Queue of pending Specs awaiting dispatch.
pub type WorkQueue = FifoQueue<Spec>;

/// Queue accumulating completed Outcomes.
pub type ResultSink = FifoQueue<Outcome>;

/// Unbounded FIFO queue with timeout-bounded retrieval.
pub struct FifoQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: Mutex<mpsc::UnboundedReceiver<T>>,
}

impl<T> FifoQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Append an item to the tail. Never blocks.
    pub fn put(&self, item: T) {
        // The receiver lives inside self, so the channel cannot be closed
        // while the queue is alive.
        let _ = self.tx.send(item);
    }

    /// Take the oldest pending item, waiting at most `timeout`.
    ///
    /// `None` means no item arrived in time; callers treat it as a retry
    /// signal, not an error. Concurrent callers never observe the same
    /// item twice.
    pub async fn get(&self, timeout: Duration) -> Option<T> {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
    }

    /// Take the oldest pending item, waiting indefinitely.
    pub async fn recv(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = FifoQueue::new();
        queue.put(1);
        queue.put(2);
        queue.put(3);

        assert_eq!(queue.get(Duration::from_millis(10)).await, Some(1));
        assert_eq!(queue.get(Duration::from_millis(10)).await, Some(2));
        assert_eq!(queue.get(Duration::from_millis(10)).await, Some(3));
    }

    #[tokio::test]
    async fn test_empty_get_times_out() {
        let queue: FifoQueue<i32> = FifoQueue::new();
        assert_eq!(queue.get(Duration::from_millis(10)).await, None);
    }

    #[tokio::test]
    async fn test_get_wakes_on_put() {
        let queue = Arc::new(FifoQueue::new());

        let getter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.get(Duration::from_secs(5)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.put(42);

        assert_eq!(getter.await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_concurrent_getters_never_share_an_item() {
        let queue = Arc::new(FifoQueue::new());
        queue.put("a");
        queue.put("b");

        let first = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.get(Duration::from_secs(1)).await })
        };
        let second = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.get(Duration::from_secs(1)).await })
        };

        let mut taken = vec![
            first.await.unwrap().unwrap(),
            second.await.unwrap().unwrap(),
        ];
        taken.sort();
        assert_eq!(taken, vec!["a", "b"]);
    }
}
