//! Redraw synchronizer.
//!
//! Any context may call [`RedrawHandle::request_redraw`]; exactly one
//! [`RedrawReceiver`] (owned by the UI runtime) turns pending requests into
//! draws. A request is a tick with no payload.
//!
//! The channel has capacity one, so:
//! - a request never blocks the caller (`try_send`)
//! - a request made while one is already pending is coalesced into it
//! - a request made before the consumer starts waits in the buffer

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Creates a connected producer/consumer pair.
pub fn channel() -> (RedrawHandle, RedrawReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (RedrawHandle { tx }, RedrawReceiver { rx })
}

/// Producer side. Cheap to clone and safe to send to background tasks.
#[derive(Debug, Clone)]
pub struct RedrawHandle {
    tx: mpsc::Sender<()>,
}

impl RedrawHandle {
    /// Asks for a repaint. Fire-and-forget.
    pub fn request_redraw(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::trace!("redraw already pending, coalesced");
            }
            Err(TrySendError::Closed(())) => {
                tracing::trace!("redraw requested after consumer shut down");
            }
        }
    }
}

/// Consumer side. Only the UI owner holds this.
#[derive(Debug)]
pub struct RedrawReceiver {
    rx: mpsc::Receiver<()>,
}

impl RedrawReceiver {
    /// Drains every pending request without blocking.
    ///
    /// Returns `true` if at least one request was pending, meaning exactly one
    /// draw is now due.
    pub fn take_pending(&mut self) -> bool {
        let mut pending = false;
        loop {
            match self.rx.try_recv() {
                Ok(()) => pending = true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn test_requests_before_consumer_are_buffered() {
        let (handle, mut receiver) = channel();
        handle.request_redraw();
        assert!(receiver.take_pending());
        assert!(!receiver.take_pending());
    }

    #[test]
    fn test_pending_requests_coalesce_into_one_draw() {
        let (handle, mut receiver) = channel();
        for _ in 0..10 {
            handle.request_redraw();
        }
        assert!(receiver.take_pending());
        assert!(!receiver.take_pending());
    }

    #[test]
    fn test_request_after_consumer_dropped_is_noop() {
        let (handle, receiver) = channel();
        drop(receiver);
        handle.request_redraw();
    }

    #[test]
    fn test_requests_during_draws_are_never_dropped() {
        const PRODUCERS: usize = 8;
        const REQUESTS_EACH: usize = 200;

        let (handle, mut receiver) = channel();
        let issued = Arc::new(AtomicUsize::new(0));
        let producers_done = Arc::new(AtomicBool::new(false));
        let drawing = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));

        let consumer = {
            let issued = Arc::clone(&issued);
            let producers_done = Arc::clone(&producers_done);
            let drawing = Arc::clone(&drawing);
            let overlapped = Arc::clone(&overlapped);
            thread::spawn(move || {
                let mut draws = 0usize;
                let mut last_seen = 0usize;
                loop {
                    let done = producers_done.load(Ordering::SeqCst);
                    if receiver.take_pending() {
                        if drawing.swap(true, Ordering::SeqCst) {
                            overlapped.store(true, Ordering::SeqCst);
                        }
                        // Everything issued up to here is covered by this draw.
                        last_seen = issued.load(Ordering::SeqCst);
                        draws += 1;
                        thread::sleep(std::time::Duration::from_micros(50));
                        drawing.store(false, Ordering::SeqCst);
                    } else if done {
                        return (draws, last_seen);
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|_| {
                let handle = handle.clone();
                let issued = Arc::clone(&issued);
                thread::spawn(move || {
                    for _ in 0..REQUESTS_EACH {
                        issued.fetch_add(1, Ordering::SeqCst);
                        handle.request_redraw();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }
        producers_done.store(true, Ordering::SeqCst);

        let (draws, last_seen) = consumer.join().unwrap();
        let total = PRODUCERS * REQUESTS_EACH;
        assert!((1..=total).contains(&draws), "draws = {draws}");
        assert_eq!(last_seen, total, "final request was not followed by a draw");
        assert!(!overlapped.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_request_from_task_reaches_polling_consumer() {
        let (handle, mut receiver) = channel();
        tokio::spawn(async move {
            handle.request_redraw();
        })
        .await
        .unwrap();

        assert!(receiver.take_pending());
        assert!(!receiver.take_pending());
    }
}
