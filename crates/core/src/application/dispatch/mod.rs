// Notification Dispatch - bounded fire-and-forget delivery
//
// `leave` hands notices to a NotificationDispatcher, which never blocks and
// never reports delivery results back. A single DispatchWorker drains the
// queue and logs every outcome.

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::domain::Notice;
use crate::port::Notifier;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

/// Outcome counters shared by the dispatcher handle and its worker
#[derive(Default)]
struct DispatchStats {
    queued: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of the dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSnapshot {
    pub queued: u64,
    pub sent: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// Create a dispatcher handle and the worker that serves it
///
/// `capacity` bounds the number of notices waiting for delivery; notices
/// beyond it are dropped (best-effort delivery).
pub fn dispatch_channel(
    notifier: Arc<dyn Notifier>,
    capacity: usize,
) -> (NotificationDispatcher, DispatchWorker) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let stats = Arc::new(DispatchStats::default());
    (
        NotificationDispatcher {
            tx,
            stats: Arc::clone(&stats),
        },
        DispatchWorker {
            rx,
            notifier,
            stats,
        },
    )
}

/// Cheap, cloneable handle used by the application layer
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notice>,
    stats: Arc<DispatchStats>,
}

impl NotificationDispatcher {
    /// Queue a notice for delivery without waiting
    ///
    /// Returns false when the notice was dropped (queue full or worker gone).
    pub fn dispatch(&self, notice: Notice) -> bool {
        let reservation_id = notice.reservation_id;
        let rank = notice.rank;

        match self.tx.try_send(notice) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
                debug!(reservation_id, rank = %rank, "Notice queued");
                true
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(reservation_id, rank = %rank, "Notice queue full, notice dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(reservation_id, rank = %rank, "Dispatcher stopped, notice dropped");
                false
            }
        }
    }

    pub fn stats(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            queued: self.stats.queued.load(Ordering::Relaxed),
            sent: self.stats.sent.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Background consumer of the notice queue
pub struct DispatchWorker {
    rx: mpsc::Receiver<Notice>,
    notifier: Arc<dyn Notifier>,
    stats: Arc<DispatchStats>,
}

impl DispatchWorker {
    /// Deliver notices until shutdown, then drain what is already queued
    ///
    /// Should be spawned with tokio::spawn
    pub async fn run(mut self, mut shutdown: ShutdownToken) {
        info!("Notification dispatcher started");

        loop {
            tokio::select! {
                biased;
                next = self.rx.recv() => match next {
                    Some(notice) => self.deliver(notice).await,
                    None => {
                        info!("All dispatcher handles dropped");
                        break;
                    }
                },
                _ = shutdown.wait() => {
                    self.drain().await;
                    break;
                }
            }
        }

        info!("Notification dispatcher stopped");
    }

    async fn drain(&mut self) {
        self.rx.close();
        let mut drained = 0usize;
        while let Some(notice) = self.rx.recv().await {
            self.deliver(notice).await;
            drained += 1;
        }
        if drained > 0 {
            info!(drained, "Delivered queued notices before shutdown");
        }
    }

    /// One delivery attempt, isolated in its own task so a panicking
    /// notifier cannot take the worker down
    async fn deliver(&self, notice: Notice) {
        let notifier = Arc::clone(&self.notifier);
        let message = notice.message.clone();
        let handle = tokio::task::spawn(async move { notifier.send(&message).await });

        match handle.await {
            Ok(Ok(())) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                info!(
                    reservation_id = notice.reservation_id,
                    rank = %notice.rank,
                    "Notice delivered"
                );
            }
            Ok(Err(e)) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    reservation_id = notice.reservation_id,
                    rank = %notice.rank,
                    error = %e,
                    "Notice delivery failed (not retried)"
                );
            }
            Err(join_err) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    reservation_id = notice.reservation_id,
                    rank = %notice.rank,
                    error = ?join_err,
                    "Notifier panicked"
                );
            }
        }
    }
}
