//! Background location watch tracking the best fix.

use gdrcam_geo::{BestFix, LocationFix};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Bounds on the waits for location fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixTimeouts {
    /// Wait for the first fix
    pub initial: Duration,
    /// Each wait after a fix has arrived
    pub subsequent: Duration,
}

impl FixTimeouts {
    /// Same bound for every wait.
    pub fn uniform(timeout: Duration) -> Self {
        Self { initial: timeout, subsequent: timeout }
    }
}

impl Default for FixTimeouts {
    fn default() -> Self {
        Self { initial: Duration::from_secs(20), subsequent: Duration::from_secs(30) }
    }
}

/// A running watch over a stream of location fixes.
///
/// Dropping the watch without [`stop`](Self::stop) also ends the task.
#[derive(Debug)]
pub struct LocationWatch {
    best: watch::Receiver<BestFix>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<BestFix>,
    timeouts: Arc<AtomicUsize>,
}

impl LocationWatch {
    /// Starts watching `fixes`.
    ///
    /// Waits are bounded by `timeouts.initial` until the first fix arrives,
    /// then by `timeouts.subsequent`. A timeout is logged and the watch keeps
    /// waiting.
    pub fn spawn(fixes: mpsc::Receiver<LocationFix>, timeouts: FixTimeouts) -> Self {
        let (best_tx, best_rx) = watch::channel(BestFix::new());
        let (stop_tx, stop_rx) = oneshot::channel();
        let missed = Arc::new(AtomicUsize::new(0));
        let handle = tokio::spawn(run(fixes, timeouts, Arc::clone(&missed), best_tx, stop_rx));
        Self { best: best_rx, stop: stop_tx, handle, timeouts: missed }
    }

    /// Creates a fix channel and a watch over it.
    pub fn channel(buffer: usize, timeouts: FixTimeouts) -> (mpsc::Sender<LocationFix>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::spawn(rx, timeouts))
    }

    /// Number of waits that timed out so far.
    pub fn timeouts(&self) -> usize {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Current best fix; may still change.
    pub fn current(&self) -> Option<LocationFix> {
        self.best.borrow().get().copied()
    }

    /// Receiver notified whenever the best fix improves.
    pub fn subscribe(&self) -> watch::Receiver<BestFix> {
        self.best.clone()
    }

    /// Stops the watch and waits for it, returning the frozen best fix.
    pub async fn stop(self) -> BestFix {
        let LocationWatch { best, stop, handle, .. } = self;
        // the task may already have ended on its own
        let _ = stop.send(());
        match handle.await {
            Ok(frozen) => frozen,
            Err(e) => {
                warn!(error = %e, "Location watch ended abnormally");
                best.borrow().clone()
            }
        }
    }
}

async fn run(
    mut fixes: mpsc::Receiver<LocationFix>,
    timeouts: FixTimeouts,
    missed: Arc<AtomicUsize>,
    best_tx: watch::Sender<BestFix>,
    mut stop_rx: oneshot::Receiver<()>,
) -> BestFix {
    let mut best = BestFix::new();
    let mut wait = timeouts.initial;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            next = tokio::time::timeout(wait, fixes.recv()) => match next {
                Ok(Some(fix)) => {
                    wait = timeouts.subsequent;
                    if best.offer(fix) {
                        info!(accuracy = ?fix.accuracy, "Location improved");
                        best_tx.send_replace(best.clone());
                    }
                }
                Ok(None) => {
                    debug!("Location source closed");
                    break;
                }
                Err(_) => {
                    missed.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        timeout_secs = wait.as_secs(),
                        first = best.observed() == 0,
                        "Timed out waiting for a location fix"
                    );
                }
            },
        }
    }

    debug!(observed = best.observed(), "Location watch stopped");
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(accuracy: f64) -> LocationFix {
        LocationFix::new(-33.4569, -70.6483, 0).with_accuracy(accuracy)
    }

    #[tokio::test]
    async fn test_stop_freezes_best_fix() {
        let (tx, watch) = LocationWatch::channel(8, FixTimeouts::default());
        let mut updates = watch.subscribe();

        for accuracy in [12.0, 8.5, 20.0, 3.1] {
            tx.send(fix(accuracy)).await.unwrap();
        }
        // wait until 3.1 has been taken
        updates
            .wait_for(|b| b.get().and_then(|f| f.accuracy) == Some(3.1))
            .await
            .unwrap();

        let frozen = watch.stop().await;
        assert_eq!(frozen.get().unwrap().accuracy, Some(3.1));
        assert_eq!(frozen.observed(), 4);

        // later fixes go nowhere
        assert!(tx.send(fix(1.0)).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_waiting() {
        let (tx, watch) = LocationWatch::channel(4, FixTimeouts::uniform(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(5)).await;

        tx.send(fix(7.0)).await.unwrap();
        let mut updates = watch.subscribe();
        updates.wait_for(|b| b.get().is_some()).await.unwrap();

        assert_eq!(watch.current().unwrap().accuracy, Some(7.0));
        assert!(watch.timeouts() >= 4);
        assert_eq!(watch.stop().await.observed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fix_has_its_own_timeout() {
        let timeouts = FixTimeouts {
            initial: Duration::from_secs(1),
            subsequent: Duration::from_secs(10),
        };
        let (tx, watch) = LocationWatch::channel(4, timeouts);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(watch.timeouts(), 3);

        tx.send(fix(7.0)).await.unwrap();
        let mut updates = watch.subscribe();
        updates.wait_for(|b| b.get().is_some()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(watch.timeouts(), 3);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(watch.timeouts(), 4);
        watch.stop().await;
    }

    #[tokio::test]
    async fn test_closed_source_still_stops() {
        let (tx, watch) = LocationWatch::channel(1, FixTimeouts::default());
        tx.send(fix(4.0)).await.unwrap();
        drop(tx);
        let frozen = watch.stop().await;
        assert!(frozen.observed() <= 1);
    }
}
